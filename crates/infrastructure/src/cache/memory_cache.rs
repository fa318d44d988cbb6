use ahash::{AHashMap, AHashSet};
use async_trait::async_trait;
use parcel_application::ports::PropertyCache;
use parcel_domain::cache_key::{key_set_key, property_key, LISTING_INDEX_KEY};
use parcel_domain::DomainError;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

struct Entry<T> {
    value: T,
    expires_at: Instant,
}

impl<T> Entry<T> {
    fn new(value: T, ttl: Duration) -> Self {
        Self {
            value,
            expires_at: Instant::now() + ttl,
        }
    }

    fn is_live(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

#[derive(Default)]
struct CacheState {
    values: AHashMap<String, Entry<String>>,
    sets: AHashMap<String, Entry<AHashSet<String>>>,
}

impl CacheState {
    fn store_and_index(
        &mut self,
        key: &str,
        value: &str,
        index: &str,
        ttl: Duration,
        index_ttl: Duration,
    ) {
        let now = Instant::now();
        self.values
            .insert(key.to_string(), Entry::new(value.to_string(), ttl));

        let set = self
            .sets
            .entry(index.to_string())
            .or_insert_with(|| Entry::new(AHashSet::new(), index_ttl));
        if !set.is_live(now) {
            set.value.clear();
        }
        set.value.insert(key.to_string());
        set.expires_at = now + index_ttl;
    }

    fn purge_index(&mut self, index: &str) -> u64 {
        let Some(set) = self.sets.remove(index) else {
            return 0;
        };
        for key in &set.value {
            self.values.remove(key);
        }
        set.value.len() as u64
    }
}

/// In-process cache engine with per-key TTLs.
///
/// A single mutex guards values and key sets together, which makes every
/// multi-key operation atomic with respect to readers.
#[derive(Default)]
pub struct MemoryPropertyCache {
    state: Mutex<CacheState>,
}

impl MemoryPropertyCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops expired values and key sets. Returns the number of entries removed.
    pub async fn evict_expired(&self) -> usize {
        let now = Instant::now();
        let mut state = self.state.lock().await;
        let before = state.values.len() + state.sets.len();
        state.values.retain(|_, entry| entry.is_live(now));
        state.sets.retain(|_, entry| entry.is_live(now));
        let removed = before - (state.values.len() + state.sets.len());
        if removed > 0 {
            debug!(removed, "Evicted expired cache entries");
        }
        removed
    }

    /// Drops every value and key set.
    pub async fn clear(&self) {
        let mut state = self.state.lock().await;
        state.values.clear();
        state.sets.clear();
    }

    pub async fn len(&self) -> usize {
        self.state.lock().await.values.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Live members of a key set.
    pub async fn members(&self, set_key: &str) -> Vec<String> {
        let now = Instant::now();
        let state = self.state.lock().await;
        let mut members: Vec<String> = state
            .sets
            .get(set_key)
            .filter(|entry| entry.is_live(now))
            .map(|entry| entry.value.iter().cloned().collect())
            .unwrap_or_default();
        members.sort();
        members
    }
}

#[async_trait]
impl PropertyCache for MemoryPropertyCache {
    async fn get(&self, key: &str) -> Result<Option<String>, DomainError> {
        let now = Instant::now();
        let mut state = self.state.lock().await;
        match state.values.get(key) {
            Some(entry) if entry.is_live(now) => Ok(Some(entry.value.clone())),
            Some(_) => {
                state.values.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), DomainError> {
        self.state
            .lock()
            .await
            .values
            .insert(key.to_string(), Entry::new(value.to_string(), ttl));
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), DomainError> {
        self.state.lock().await.values.remove(key);
        Ok(())
    }

    async fn register_search_result(
        &self,
        search_key: &str,
        property_id: &str,
        ttl: Duration,
        key_set_ttl: Duration,
    ) -> Result<(), DomainError> {
        self.state.lock().await.store_and_index(
            search_key,
            property_id,
            &key_set_key(property_id),
            ttl,
            key_set_ttl,
        );
        Ok(())
    }

    async fn cache_property(
        &self,
        property_id: &str,
        payload: &str,
        ttl: Duration,
        key_set_ttl: Duration,
    ) -> Result<(), DomainError> {
        self.state.lock().await.store_and_index(
            &property_key(property_id),
            payload,
            &key_set_key(property_id),
            ttl,
            key_set_ttl,
        );
        Ok(())
    }

    async fn invalidate_property(&self, property_id: &str) -> Result<u64, DomainError> {
        Ok(self
            .state
            .lock()
            .await
            .purge_index(&key_set_key(property_id)))
    }

    async fn cache_listing(
        &self,
        listing_key: &str,
        payload: &str,
        ttl: Duration,
    ) -> Result<(), DomainError> {
        self.state
            .lock()
            .await
            .store_and_index(listing_key, payload, LISTING_INDEX_KEY, ttl, ttl);
        Ok(())
    }

    async fn invalidate_listings(&self) -> Result<u64, DomainError> {
        Ok(self.state.lock().await.purge_index(LISTING_INDEX_KEY))
    }
}
