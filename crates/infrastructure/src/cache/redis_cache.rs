use async_trait::async_trait;
use parcel_application::ports::PropertyCache;
use parcel_domain::cache_key::{key_set_key, property_key, LISTING_INDEX_KEY};
use parcel_domain::DomainError;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Script};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, info, instrument};

use super::scripts::{PURGE_INDEX, STORE_AND_INDEX};

/// Upper bound on a single cache round trip.
const OPERATION_TIMEOUT: Duration = Duration::from_secs(2);

/// Redis-backed cache. Multi-key writes and invalidations run as Lua
/// scripts so they are never observed half-applied.
pub struct RedisPropertyCache {
    conn: ConnectionManager,
    store_and_index: Script,
    purge_index: Script,
}

impl RedisPropertyCache {
    pub async fn connect(url: &str) -> Result<Self, DomainError> {
        let client = redis::Client::open(url).map_err(cache_error)?;
        let conn = tokio::time::timeout(OPERATION_TIMEOUT, ConnectionManager::new(client))
            .await
            .map_err(|_| DomainError::CacheError(format!("Timed out connecting to {url}")))?
            .map_err(cache_error)?;

        info!("Connected to Redis cache");
        Ok(Self {
            conn,
            store_and_index: Script::new(STORE_AND_INDEX),
            purge_index: Script::new(PURGE_INDEX),
        })
    }

    async fn run_store_and_index(
        &self,
        key: &str,
        value: &str,
        index: &str,
        ttl: Duration,
        index_ttl: Duration,
    ) -> Result<(), DomainError> {
        let mut conn = self.conn.clone();
        let mut invocation = self.store_and_index.prepare_invoke();
        invocation
            .key(key)
            .key(index)
            .arg(value)
            .arg(ttl_secs(ttl))
            .arg(ttl_secs(index_ttl));

        let _: i64 = bounded(invocation.invoke_async(&mut conn)).await?;
        Ok(())
    }

    async fn run_purge_index(&self, index: &str) -> Result<u64, DomainError> {
        let mut conn = self.conn.clone();
        let mut invocation = self.purge_index.prepare_invoke();
        invocation.key(index);

        let purged: i64 = bounded(invocation.invoke_async(&mut conn)).await?;
        Ok(purged.max(0) as u64)
    }
}

fn cache_error(e: redis::RedisError) -> DomainError {
    DomainError::CacheError(e.to_string())
}

/// Redis rejects a zero expiry; round sub-second TTLs up.
fn ttl_secs(ttl: Duration) -> u64 {
    ttl.as_secs().max(1)
}

async fn bounded<T>(
    fut: impl Future<Output = redis::RedisResult<T>>,
) -> Result<T, DomainError> {
    tokio::time::timeout(OPERATION_TIMEOUT, fut)
        .await
        .map_err(|_| DomainError::CacheError("Redis operation timed out".into()))?
        .map_err(cache_error)
}

#[async_trait]
impl PropertyCache for RedisPropertyCache {
    async fn get(&self, key: &str) -> Result<Option<String>, DomainError> {
        let mut conn = self.conn.clone();
        bounded(conn.get::<_, Option<String>>(key)).await
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), DomainError> {
        let mut conn = self.conn.clone();
        bounded(conn.set_ex::<_, _, ()>(key, value, ttl_secs(ttl))).await
    }

    async fn delete(&self, key: &str) -> Result<(), DomainError> {
        let mut conn = self.conn.clone();
        bounded(conn.del::<_, ()>(key)).await
    }

    #[instrument(skip(self, ttl, key_set_ttl))]
    async fn register_search_result(
        &self,
        search_key: &str,
        property_id: &str,
        ttl: Duration,
        key_set_ttl: Duration,
    ) -> Result<(), DomainError> {
        self.run_store_and_index(
            search_key,
            property_id,
            &key_set_key(property_id),
            ttl,
            key_set_ttl,
        )
        .await
    }

    #[instrument(skip(self, payload, ttl, key_set_ttl))]
    async fn cache_property(
        &self,
        property_id: &str,
        payload: &str,
        ttl: Duration,
        key_set_ttl: Duration,
    ) -> Result<(), DomainError> {
        self.run_store_and_index(
            &property_key(property_id),
            payload,
            &key_set_key(property_id),
            ttl,
            key_set_ttl,
        )
        .await
    }

    #[instrument(skip(self))]
    async fn invalidate_property(&self, property_id: &str) -> Result<u64, DomainError> {
        let purged = self.run_purge_index(&key_set_key(property_id)).await?;
        debug!(property_id, purged, "Purged property key set");
        Ok(purged)
    }

    #[instrument(skip(self, payload, ttl))]
    async fn cache_listing(
        &self,
        listing_key: &str,
        payload: &str,
        ttl: Duration,
    ) -> Result<(), DomainError> {
        self.run_store_and_index(listing_key, payload, LISTING_INDEX_KEY, ttl, ttl)
            .await
    }

    #[instrument(skip(self))]
    async fn invalidate_listings(&self) -> Result<u64, DomainError> {
        self.run_purge_index(LISTING_INDEX_KEY).await
    }
}
