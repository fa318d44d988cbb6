use chrono::Utc;
use parcel_domain::validators::validate_property;
use parcel_domain::{DomainError, Property};
use std::sync::Arc;
use tracing::{info, instrument};

use crate::services::{PropertyCacheService, PropertyStore};
use crate::RequestContext;

/// Replaces a stored property and purges every cache entry that referenced it.
pub struct UpdatePropertyUseCase {
    store: Arc<PropertyStore>,
    cache: Arc<PropertyCacheService>,
}

impl UpdatePropertyUseCase {
    pub fn new(store: Arc<PropertyStore>, cache: Arc<PropertyCacheService>) -> Self {
        Self { store, cache }
    }

    /// # Errors
    ///
    /// * `DomainError::PropertyNotFound` - If no stored property has `property_id`
    /// * `DomainError::InvalidAddress` / `InvalidProperty` - If required fields are missing
    #[instrument(skip(self, ctx, property))]
    pub async fn execute(
        &self,
        ctx: &RequestContext,
        property_id: &str,
        mut property: Property,
    ) -> Result<Property, DomainError> {
        property.property_id = property_id.to_string();
        property.address = property.address.normalized();
        validate_property(&property)?;

        property.updated_at = Some(Utc::now());

        let result = self.store.update(ctx, &property).await;

        // Search keys that resolved to the old address must not survive, even
        // when the store call failed after the write may have committed.
        self.cache.invalidate_property(property_id).await;
        self.cache.invalidate_listings().await;

        let updated = result?;
        self.cache.write_property(&updated).await;

        info!(
            property_id,
            address = %updated.address.normalized,
            "Property updated"
        );
        Ok(updated)
    }
}
