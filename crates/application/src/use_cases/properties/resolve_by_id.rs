use chrono::Utc;
use parcel_domain::validators::validate_property_id;
use parcel_domain::DomainError;
use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::ports::{FallbackProducer, PropertyResolution, ResolutionSource};
use crate::services::{PropertyCacheService, PropertyStore};
use crate::RequestContext;

/// Resolves a property by its external id: cache, then record store, then
/// the first-sight fallback producer.
pub struct ResolvePropertyByIdUseCase {
    store: Arc<PropertyStore>,
    cache: Arc<PropertyCacheService>,
    fallback: Arc<dyn FallbackProducer>,
}

impl ResolvePropertyByIdUseCase {
    pub fn new(
        store: Arc<PropertyStore>,
        cache: Arc<PropertyCacheService>,
        fallback: Arc<dyn FallbackProducer>,
    ) -> Self {
        Self {
            store,
            cache,
            fallback,
        }
    }

    #[instrument(skip(self, ctx))]
    pub async fn execute(
        &self,
        ctx: &RequestContext,
        property_id: &str,
    ) -> Result<PropertyResolution, DomainError> {
        validate_property_id(property_id)?;

        if let Some(property) = self.cache.cached_property(ctx, property_id).await? {
            return Ok(PropertyResolution::cached(property));
        }

        if let Some(property) = self.store.find_by_id(ctx, property_id).await? {
            debug!(property_id, "Resolved from record store");
            self.cache.write_property(&property).await;
            return Ok(PropertyResolution::resolved(property, ResolutionSource::Store));
        }

        self.first_sight(ctx, property_id).await
    }

    async fn first_sight(
        &self,
        ctx: &RequestContext,
        property_id: &str,
    ) -> Result<PropertyResolution, DomainError> {
        let source = self.fallback.source();
        let mut property = ctx
            .run(self.fallback.produce(property_id))
            .await?
            .ok_or_else(|| DomainError::PropertyNotFound(property_id.to_string()))?;

        property.id = None;
        property.property_id = property_id.to_string();
        property.created_at = None;
        property.touch(Utc::now());

        let property = match self.store.create(ctx, &property).await {
            Ok(created) => created,
            Err(DomainError::PropertyConflict(_)) => {
                // A concurrent request created it first; serve theirs.
                let winner = self
                    .store
                    .find_by_id(ctx, property_id)
                    .await?
                    .ok_or_else(|| DomainError::PropertyNotFound(property_id.to_string()))?;
                self.cache.write_property(&winner).await;
                return Ok(PropertyResolution::resolved(winner, ResolutionSource::Store));
            }
            Err(e) => return Err(e),
        };

        // Keys left over from an earlier incarnation of this id must go before
        // the new record is indexed.
        self.cache.invalidate_property(property_id).await;
        self.cache.write_property(&property).await;
        self.cache.invalidate_listings().await;

        info!(property_id, source = %source, "Created property on first sight");
        Ok(PropertyResolution::resolved(property, source))
    }
}
