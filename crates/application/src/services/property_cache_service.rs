use parcel_domain::cache_key::{listing_key, property_key};
use parcel_domain::config::CacheConfig;
use parcel_domain::{DomainError, Property};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::ports::{PropertyCache, PropertyPage};
use crate::RequestContext;

#[derive(Debug, Clone, Copy)]
pub struct CacheTtls {
    pub property: Duration,
    pub search: Duration,
    pub key_set: Duration,
    pub listing: Duration,
}

impl From<&CacheConfig> for CacheTtls {
    fn from(config: &CacheConfig) -> Self {
        Self {
            property: config.property_ttl(),
            search: config.search_ttl(),
            key_set: config.key_set_ttl(),
            listing: config.listing_ttl(),
        }
    }
}

impl Default for CacheTtls {
    fn default() -> Self {
        Self::from(&CacheConfig::default())
    }
}

/// Best-effort view of the cache used by the resolution pipeline and the
/// mutation path.
///
/// Reads turn every cache failure (including undecodable payloads) into a
/// miss; writes and invalidations log failures and carry on. The only errors
/// that escape are the request context firing during a read.
pub struct PropertyCacheService {
    cache: Arc<dyn PropertyCache>,
    ttls: CacheTtls,
}

impl PropertyCacheService {
    pub fn new(cache: Arc<dyn PropertyCache>, ttls: CacheTtls) -> Self {
        Self { cache, ttls }
    }

    pub fn ttls(&self) -> CacheTtls {
        self.ttls
    }

    pub async fn cached_property(
        &self,
        ctx: &RequestContext,
        property_id: &str,
    ) -> Result<Option<Property>, DomainError> {
        let key = property_key(property_id);
        let Some(payload) = self.read(ctx, &key).await? else {
            return Ok(None);
        };

        match serde_json::from_str::<Property>(&payload) {
            Ok(property) => Ok(Some(property)),
            Err(e) => {
                warn!(key = %key, error = %e, "Undecodable cached property, treating as miss");
                Ok(None)
            }
        }
    }

    /// Returns the property id a search key last resolved to.
    pub async fn cached_search(
        &self,
        ctx: &RequestContext,
        search_key: &str,
    ) -> Result<Option<String>, DomainError> {
        Ok(self
            .read(ctx, search_key)
            .await?
            .filter(|id| !id.is_empty()))
    }

    pub async fn cached_listing(
        &self,
        ctx: &RequestContext,
        offset: u64,
        limit: u64,
    ) -> Result<Option<PropertyPage>, DomainError> {
        let key = listing_key(offset, limit);
        let Some(payload) = self.read(ctx, &key).await? else {
            return Ok(None);
        };

        match serde_json::from_str::<PropertyPage>(&payload) {
            Ok(page) => Ok(Some(page)),
            Err(e) => {
                warn!(key = %key, error = %e, "Undecodable cached listing, treating as miss");
                Ok(None)
            }
        }
    }

    pub async fn write_property(&self, property: &Property) {
        let payload = match serde_json::to_string(property) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(property_id = %property.property_id, error = %e, "Failed to encode property for cache");
                return;
            }
        };

        if let Err(e) = self
            .cache
            .cache_property(
                &property.property_id,
                &payload,
                self.ttls.property,
                self.ttls.key_set,
            )
            .await
        {
            warn!(property_id = %property.property_id, error = %e, "Cache write failed");
        }
    }

    pub async fn register_search(&self, search_key: &str, property_id: &str) {
        if let Err(e) = self
            .cache
            .register_search_result(search_key, property_id, self.ttls.search, self.ttls.key_set)
            .await
        {
            warn!(search_key, property_id, error = %e, "Search key registration failed");
        }
    }

    pub async fn write_listing(&self, offset: u64, limit: u64, page: &PropertyPage) {
        let key = listing_key(offset, limit);
        let payload = match serde_json::to_string(page) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(key = %key, error = %e, "Failed to encode listing for cache");
                return;
            }
        };

        if let Err(e) = self
            .cache
            .cache_listing(&key, &payload, self.ttls.listing)
            .await
        {
            warn!(key = %key, error = %e, "Listing cache write failed");
        }
    }

    pub async fn invalidate_property(&self, property_id: &str) {
        match self.cache.invalidate_property(property_id).await {
            Ok(purged) => debug!(property_id, purged, "Property cache invalidated"),
            Err(e) => warn!(property_id, error = %e, "Property cache invalidation failed"),
        }
    }

    pub async fn invalidate_listings(&self) {
        match self.cache.invalidate_listings().await {
            Ok(purged) => debug!(purged, "Listing cache invalidated"),
            Err(e) => warn!(error = %e, "Listing cache invalidation failed"),
        }
    }

    async fn read(&self, ctx: &RequestContext, key: &str) -> Result<Option<String>, DomainError> {
        match ctx.run(self.cache.get(key)).await {
            Ok(Some(value)) => {
                debug!(key, "Cache HIT");
                Ok(Some(value))
            }
            Ok(None) => {
                debug!(key, "Cache MISS");
                Ok(None)
            }
            Err(e @ (DomainError::Cancelled | DomainError::DeadlineExceeded)) => Err(e),
            Err(e) => {
                warn!(key, error = %e, "Cache read failed, treating as miss");
                Ok(None)
            }
        }
    }
}
