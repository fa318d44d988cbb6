use parcel_domain::validators::validate_property_id;
use parcel_domain::DomainError;
use std::sync::Arc;
use tracing::{info, instrument};

use crate::services::{PropertyCacheService, PropertyStore};
use crate::RequestContext;

pub struct DeletePropertyUseCase {
    store: Arc<PropertyStore>,
    cache: Arc<PropertyCacheService>,
}

impl DeletePropertyUseCase {
    pub fn new(store: Arc<PropertyStore>, cache: Arc<PropertyCacheService>) -> Self {
        Self { store, cache }
    }

    /// Deletes the stored property. Cache keys referencing the id are purged
    /// whatever the store reports, including not-found and interrupted calls.
    #[instrument(skip(self, ctx))]
    pub async fn execute(&self, ctx: &RequestContext, property_id: &str) -> Result<(), DomainError> {
        validate_property_id(property_id)?;

        let result = self.store.delete(ctx, property_id).await;

        self.cache.invalidate_property(property_id).await;
        self.cache.invalidate_listings().await;

        result?;

        info!(property_id, "Property deleted");
        Ok(())
    }
}
