use chrono::{Duration, Utc};
use parcel_application::services::{CacheTtls, PropertyCacheService, PropertyStore, RetryPolicy};
use parcel_application::use_cases::{
    CreatePropertyUseCase, DeletePropertyUseCase, ListPropertiesUseCase,
    ResolvePropertyByAddressUseCase, ResolvePropertyByIdUseCase, UpdatePropertyUseCase,
};
use parcel_domain::{Address, Building, Property, PropertyDetails};
use std::sync::Arc;

use super::{MockExternalSource, MockFallback, MockPropertyCache, MockPropertyRepository};

pub const STALENESS_DAYS: i64 = 30;

pub fn make_property(property_id: &str, street: &str, city: &str, state: &str, zip: &str) -> Property {
    Property::new(property_id, Address::new(street, city, state, zip)).with_details(
        PropertyDetails {
            building: Some(Building {
                year_built: Some(1998),
                bedrooms: Some(3),
                ..Default::default()
            }),
            ..Default::default()
        },
    )
}

/// A stored property last refreshed `days` ago.
pub fn aged(mut property: Property, days: i64) -> Property {
    let at = Utc::now() - Duration::days(days);
    property.created_at = Some(at);
    property.updated_at = Some(at);
    property
}

pub fn springfield() -> Property {
    make_property("P-100", "123 Main St", "Springfield", "IL", "62704")
}

pub struct Pipeline {
    pub repo: MockPropertyRepository,
    pub cache: MockPropertyCache,
    pub external: MockExternalSource,
    pub fallback: MockFallback,
    pub by_id: ResolvePropertyByIdUseCase,
    pub by_address: ResolvePropertyByAddressUseCase,
    pub create: CreatePropertyUseCase,
    pub update: UpdatePropertyUseCase,
    pub delete: DeletePropertyUseCase,
    pub list: ListPropertiesUseCase,
}

impl Pipeline {
    pub fn new(repo: MockPropertyRepository) -> Self {
        Self::with_fallback(repo, MockFallback::new(None))
    }

    pub fn with_fallback(repo: MockPropertyRepository, fallback: MockFallback) -> Self {
        let cache = MockPropertyCache::new();
        let external = MockExternalSource::new();

        let store = Arc::new(PropertyStore::new(
            Arc::new(repo.clone()),
            RetryPolicy::new(3, std::time::Duration::ZERO),
        ));
        let cache_service = Arc::new(PropertyCacheService::new(
            Arc::new(cache.clone()),
            CacheTtls::default(),
        ));

        Self {
            by_id: ResolvePropertyByIdUseCase::new(
                store.clone(),
                cache_service.clone(),
                Arc::new(fallback.clone()),
            ),
            by_address: ResolvePropertyByAddressUseCase::new(
                store.clone(),
                cache_service.clone(),
                Arc::new(external.clone()),
                Duration::days(STALENESS_DAYS),
            ),
            create: CreatePropertyUseCase::new(store.clone(), cache_service.clone()),
            update: UpdatePropertyUseCase::new(store.clone(), cache_service.clone()),
            delete: DeletePropertyUseCase::new(store.clone(), cache_service.clone()),
            list: ListPropertiesUseCase::new(store, cache_service),
            repo,
            cache,
            external,
            fallback,
        }
    }
}
