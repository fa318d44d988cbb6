use chrono::Utc;
use parcel_domain::validators::validate_property;
use parcel_domain::{DomainError, Property};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::services::{PropertyCacheService, PropertyStore};
use crate::RequestContext;

pub struct CreatePropertyUseCase {
    store: Arc<PropertyStore>,
    cache: Arc<PropertyCacheService>,
}

impl CreatePropertyUseCase {
    pub fn new(store: Arc<PropertyStore>, cache: Arc<PropertyCacheService>) -> Self {
        Self { store, cache }
    }

    /// Creates a property. An empty `property_id` is replaced with a generated one.
    #[instrument(skip(self, ctx, property), fields(property_id = %property.property_id))]
    pub async fn execute(
        &self,
        ctx: &RequestContext,
        mut property: Property,
    ) -> Result<Property, DomainError> {
        if property.property_id.trim().is_empty() {
            property.property_id = Uuid::new_v4().to_string();
        }
        property.address = property.address.normalized();
        validate_property(&property)?;

        property.id = None;
        property.created_at = None;
        property.touch(Utc::now());

        let result = self.store.create(ctx, &property).await;

        // An interrupted or failed write may still have committed.
        self.cache.invalidate_property(&property.property_id).await;
        self.cache.invalidate_listings().await;

        let created = result?;
        self.cache.write_property(&created).await;

        info!(
            property_id = %created.property_id,
            address = %created.address.normalized,
            "Property created"
        );
        Ok(created)
    }
}
