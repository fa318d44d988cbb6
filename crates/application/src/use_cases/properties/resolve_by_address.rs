use chrono::{Duration, Utc};
use parcel_domain::cache_key::search_key;
use parcel_domain::{parse, DomainError, ParsedAddress, Property};
use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::ports::{ExternalPropertySource, PropertyResolution, ResolutionSource};
use crate::services::{PropertyCacheService, PropertyStore};
use crate::RequestContext;

/// Resolves a free-text address through the cache, the record store and
/// finally the external provider, refreshing stale stored records.
pub struct ResolvePropertyByAddressUseCase {
    store: Arc<PropertyStore>,
    cache: Arc<PropertyCacheService>,
    external: Arc<dyn ExternalPropertySource>,
    staleness_threshold: Duration,
}

impl ResolvePropertyByAddressUseCase {
    pub fn new(
        store: Arc<PropertyStore>,
        cache: Arc<PropertyCacheService>,
        external: Arc<dyn ExternalPropertySource>,
        staleness_threshold: Duration,
    ) -> Self {
        Self {
            store,
            cache,
            external,
            staleness_threshold,
        }
    }

    #[instrument(skip(self, ctx))]
    pub async fn execute(
        &self,
        ctx: &RequestContext,
        query: &str,
    ) -> Result<PropertyResolution, DomainError> {
        let address = parse(query);
        address.validate()?;

        let key = search_key(&address.street, &address.city);

        if let Some(property) = self.from_cache(ctx, &key, &address).await? {
            return Ok(PropertyResolution::cached(property));
        }

        let existing = self.store.find_by_address(ctx, &address).await?;

        if let Some(property) = existing.as_ref() {
            if property.is_fresh(Utc::now(), self.staleness_threshold) {
                debug!(property_id = %property.property_id, "Fresh record in store");
                self.write_back(&key, property).await;
                return Ok(PropertyResolution::resolved(
                    property.clone(),
                    ResolutionSource::Store,
                ));
            }
            debug!(property_id = %property.property_id, "Stored record is stale, refetching");
        }

        let mut fetched = ctx.run(self.external.resolve(&address)).await?;
        fetched.touch(Utc::now());

        let result = match existing {
            Some(existing) => {
                fetched.adopt_identity(&existing);
                self.store.update(ctx, &fetched).await
            }
            None => self.store.insert_or_overwrite(ctx, fetched).await,
        };

        // The row may have changed even when the store call reports failure.
        self.cache.invalidate_listings().await;
        let property = result?;
        self.write_back(&key, &property).await;

        info!(
            property_id = %property.property_id,
            search_key = %key,
            "Resolved from external source"
        );
        Ok(PropertyResolution::resolved(
            property,
            ResolutionSource::ExternalApi,
        ))
    }

    /// Double lookup: search key to property id, then the property record.
    async fn from_cache(
        &self,
        ctx: &RequestContext,
        key: &str,
        address: &ParsedAddress,
    ) -> Result<Option<Property>, DomainError> {
        let Some(property_id) = self.cache.cached_search(ctx, key).await? else {
            return Ok(None);
        };
        let Some(property) = self.cache.cached_property(ctx, &property_id).await? else {
            return Ok(None);
        };

        // The search key ignores state and zip; reject a hit that contradicts them.
        if !property.address.agrees_with(&address.state, &address.zip) {
            debug!(
                property_id = %property_id,
                search_key = %key,
                "Search key hit for a different state or zip, falling through"
            );
            return Ok(None);
        }

        Ok(Some(property))
    }

    async fn write_back(&self, key: &str, property: &Property) {
        self.cache.write_property(property).await;
        self.cache.register_search(key, &property.property_id).await;
    }
}
