use async_trait::async_trait;
use parcel_domain::DomainError;
use std::time::Duration;

/// Distributed key-value cache in front of the record store.
///
/// Besides plain get/set/delete, the multi-key operations must be applied
/// atomically by the engine (one round trip, never observed half-applied).
/// Key layout comes from `parcel_domain::cache_key`.
#[async_trait]
pub trait PropertyCache: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, DomainError>;

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), DomainError>;

    async fn delete(&self, key: &str) -> Result<(), DomainError>;

    /// Sets `search_key -> property_id` with `ttl` and adds `search_key` to the
    /// property's key set, refreshing the key set expiry to `key_set_ttl`.
    async fn register_search_result(
        &self,
        search_key: &str,
        property_id: &str,
        ttl: Duration,
        key_set_ttl: Duration,
    ) -> Result<(), DomainError>;

    /// Sets `property:{property_id}` to `payload` and registers that key in the
    /// property's key set.
    async fn cache_property(
        &self,
        property_id: &str,
        payload: &str,
        ttl: Duration,
        key_set_ttl: Duration,
    ) -> Result<(), DomainError>;

    /// Deletes every key in the property's key set, then the key set itself.
    /// Returns the number of member keys removed.
    async fn invalidate_property(&self, property_id: &str) -> Result<u64, DomainError>;

    /// Sets a paginated listing page and registers it in the listing index.
    async fn cache_listing(
        &self,
        listing_key: &str,
        payload: &str,
        ttl: Duration,
    ) -> Result<(), DomainError>;

    /// Deletes every listing page in the listing index, then the index.
    async fn invalidate_listings(&self) -> Result<u64, DomainError>;
}
