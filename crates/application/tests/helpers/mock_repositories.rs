use async_trait::async_trait;
use parcel_application::ports::{
    ExternalPropertySource, FallbackProducer, PropertyCache, PropertyPage, PropertyRepository,
    ResolutionSource,
};
use parcel_domain::cache_key::{key_set_key, property_key, LISTING_INDEX_KEY};
use parcel_domain::{DomainError, ParsedAddress, Property};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

// ============================================================================
// Mock PropertyRepository
// ============================================================================

#[derive(Clone, Default)]
pub struct MockPropertyRepository {
    properties: Arc<RwLock<Vec<Property>>>,
    next_id: Arc<AtomicUsize>,
    transient_failures: Arc<AtomicU32>,
    should_fail: Arc<RwLock<bool>>,
    ack_delay: Arc<RwLock<Option<Duration>>>,
    pub creates: Arc<AtomicUsize>,
    pub updates: Arc<AtomicUsize>,
    pub lookups: Arc<AtomicUsize>,
}

impl MockPropertyRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn with_properties(properties: Vec<Property>) -> Self {
        let repo = Self::new();
        for property in properties {
            repo.insert(property).await;
        }
        repo
    }

    /// Stores a property as-is, bypassing the create path.
    pub async fn insert(&self, mut property: Property) -> Property {
        if property.id.is_none() {
            property.id = Some(self.next_id.fetch_add(1, Ordering::SeqCst) as i64 + 1);
        }
        self.properties.write().await.push(property.clone());
        property
    }

    pub async fn get(&self, property_id: &str) -> Option<Property> {
        self.properties
            .read()
            .await
            .iter()
            .find(|p| p.property_id == property_id)
            .cloned()
    }

    pub async fn count(&self) -> usize {
        self.properties.read().await.len()
    }

    /// The next `n` calls fail with a retryable error.
    pub fn fail_transiently(&self, n: u32) {
        self.transient_failures.store(n, Ordering::SeqCst);
    }

    pub async fn set_should_fail(&self, should_fail: bool) {
        *self.should_fail.write().await = should_fail;
    }

    /// Writes are applied immediately but only acknowledged after `delay`.
    pub async fn set_ack_delay(&self, delay: Duration) {
        *self.ack_delay.write().await = Some(delay);
    }

    async fn acknowledge(&self) {
        if let Some(delay) = *self.ack_delay.read().await {
            tokio::time::sleep(delay).await;
        }
    }

    async fn check_failure(&self) -> Result<(), DomainError> {
        if *self.should_fail.read().await {
            return Err(DomainError::DatabaseError("Mock repository failed".to_string()));
        }
        let remaining = self.transient_failures.load(Ordering::SeqCst);
        if remaining > 0 {
            self.transient_failures.store(remaining - 1, Ordering::SeqCst);
            return Err(DomainError::StoreUnavailable("Mock connection reset".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl PropertyRepository for MockPropertyRepository {
    async fn find_by_id(&self, property_id: &str) -> Result<Option<Property>, DomainError> {
        self.check_failure().await?;
        self.lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self.get(property_id).await)
    }

    async fn find_by_address(
        &self,
        address: &ParsedAddress,
    ) -> Result<Option<Property>, DomainError> {
        self.check_failure().await?;
        self.lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .properties
            .read()
            .await
            .iter()
            .find(|p| {
                p.address.street == address.street
                    && p.address.city == address.city
                    && (address.state.is_empty() || p.address.state == address.state)
                    && (address.zip.is_empty() || p.address.zip == address.zip)
            })
            .cloned())
    }

    async fn find_with_pagination(
        &self,
        offset: u64,
        limit: u64,
    ) -> Result<PropertyPage, DomainError> {
        self.check_failure().await?;
        let mut all = self.properties.read().await.clone();
        all.sort_by(|a, b| a.address.street.cmp(&b.address.street));
        let total = all.len() as u64;
        let items = all
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect();
        Ok(PropertyPage { items, total })
    }

    async fn create(&self, property: &Property) -> Result<Property, DomainError> {
        self.check_failure().await?;
        if self.get(&property.property_id).await.is_some() {
            return Err(DomainError::PropertyConflict(property.property_id.clone()));
        }
        self.creates.fetch_add(1, Ordering::SeqCst);
        let mut created = property.clone();
        created.id = None;
        let created = self.insert(created).await;
        self.acknowledge().await;
        Ok(created)
    }

    async fn update(&self, property: &Property) -> Result<Property, DomainError> {
        self.check_failure().await?;
        let updated = {
            let mut properties = self.properties.write().await;
            let stored = properties
                .iter_mut()
                .find(|p| p.property_id == property.property_id)
                .ok_or_else(|| DomainError::PropertyNotFound(property.property_id.clone()))?;

            let id = stored.id;
            let created_at = stored.created_at;
            *stored = property.clone();
            stored.id = id;
            stored.created_at = created_at;
            stored.clone()
        };
        self.updates.fetch_add(1, Ordering::SeqCst);
        self.acknowledge().await;
        Ok(updated)
    }

    async fn delete(&self, property_id: &str) -> Result<(), DomainError> {
        self.check_failure().await?;
        {
            let mut properties = self.properties.write().await;
            let before = properties.len();
            properties.retain(|p| p.property_id != property_id);
            if properties.len() == before {
                return Err(DomainError::PropertyNotFound(property_id.to_string()));
            }
        }
        self.acknowledge().await;
        Ok(())
    }
}

// ============================================================================
// Mock PropertyCache
// ============================================================================

#[derive(Default)]
struct CacheState {
    values: HashMap<String, String>,
    sets: HashMap<String, HashSet<String>>,
}

#[derive(Clone, Default)]
pub struct MockPropertyCache {
    state: Arc<RwLock<CacheState>>,
    fail_reads: Arc<RwLock<bool>>,
    fail_writes: Arc<RwLock<bool>>,
    pub reads: Arc<AtomicUsize>,
}

impl MockPropertyCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_fail_reads(&self, fail: bool) {
        *self.fail_reads.write().await = fail;
    }

    pub async fn set_fail_writes(&self, fail: bool) {
        *self.fail_writes.write().await = fail;
    }

    pub async fn contains(&self, key: &str) -> bool {
        self.state.read().await.values.contains_key(key)
    }

    pub async fn value(&self, key: &str) -> Option<String> {
        self.state.read().await.values.get(key).cloned()
    }

    pub async fn members(&self, set_key: &str) -> HashSet<String> {
        self.state
            .read()
            .await
            .sets
            .get(set_key)
            .cloned()
            .unwrap_or_default()
    }

    pub async fn has_set(&self, set_key: &str) -> bool {
        self.state.read().await.sets.contains_key(set_key)
    }

    /// Writes a raw value without registering it anywhere.
    pub async fn put_raw(&self, key: &str, value: &str) {
        self.state
            .write()
            .await
            .values
            .insert(key.to_string(), value.to_string());
    }

    async fn check_write(&self) -> Result<(), DomainError> {
        if *self.fail_writes.read().await {
            return Err(DomainError::CacheError("Mock cache write failed".to_string()));
        }
        Ok(())
    }

    async fn store_and_index(&self, key: &str, value: &str, index: &str) -> Result<(), DomainError> {
        self.check_write().await?;
        let mut state = self.state.write().await;
        state.values.insert(key.to_string(), value.to_string());
        state
            .sets
            .entry(index.to_string())
            .or_default()
            .insert(key.to_string());
        Ok(())
    }

    async fn purge_index(&self, index: &str) -> Result<u64, DomainError> {
        self.check_write().await?;
        let mut state = self.state.write().await;
        let members = state.sets.remove(index).unwrap_or_default();
        for member in &members {
            state.values.remove(member);
        }
        Ok(members.len() as u64)
    }
}

#[async_trait]
impl PropertyCache for MockPropertyCache {
    async fn get(&self, key: &str) -> Result<Option<String>, DomainError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if *self.fail_reads.read().await {
            return Err(DomainError::CacheError("Mock cache read failed".to_string()));
        }
        Ok(self.value(key).await)
    }

    async fn set(&self, key: &str, value: &str, _ttl: Duration) -> Result<(), DomainError> {
        self.check_write().await?;
        self.put_raw(key, value).await;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), DomainError> {
        self.check_write().await?;
        self.state.write().await.values.remove(key);
        Ok(())
    }

    async fn register_search_result(
        &self,
        search_key: &str,
        property_id: &str,
        _ttl: Duration,
        _key_set_ttl: Duration,
    ) -> Result<(), DomainError> {
        self.store_and_index(search_key, property_id, &key_set_key(property_id))
            .await
    }

    async fn cache_property(
        &self,
        property_id: &str,
        payload: &str,
        _ttl: Duration,
        _key_set_ttl: Duration,
    ) -> Result<(), DomainError> {
        self.store_and_index(&property_key(property_id), payload, &key_set_key(property_id))
            .await
    }

    async fn invalidate_property(&self, property_id: &str) -> Result<u64, DomainError> {
        self.purge_index(&key_set_key(property_id)).await
    }

    async fn cache_listing(
        &self,
        listing_key: &str,
        payload: &str,
        _ttl: Duration,
    ) -> Result<(), DomainError> {
        self.store_and_index(listing_key, payload, LISTING_INDEX_KEY)
            .await
    }

    async fn invalidate_listings(&self) -> Result<u64, DomainError> {
        self.purge_index(LISTING_INDEX_KEY).await
    }
}

// ============================================================================
// Mock ExternalPropertySource
// ============================================================================

#[derive(Clone, Default)]
pub struct MockExternalSource {
    responses: Arc<RwLock<HashMap<String, Property>>>,
    should_fail: Arc<RwLock<bool>>,
    delay: Arc<RwLock<Option<Duration>>>,
    pub calls: Arc<AtomicUsize>,
}

impl MockExternalSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the record returned for a normalized street.
    pub async fn set_response(&self, street: &str, property: Property) {
        self.responses
            .write()
            .await
            .insert(street.to_string(), property);
    }

    pub async fn set_should_fail(&self, should_fail: bool) {
        *self.should_fail.write().await = should_fail;
    }

    pub async fn set_delay(&self, delay: Duration) {
        *self.delay.write().await = Some(delay);
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ExternalPropertySource for MockExternalSource {
    async fn resolve(&self, address: &ParsedAddress) -> Result<Property, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = *self.delay.read().await {
            tokio::time::sleep(delay).await;
        }

        if *self.should_fail.read().await {
            return Err(DomainError::external("search", "provider returned HTTP 503"));
        }

        self.responses
            .read()
            .await
            .get(&address.street)
            .cloned()
            .ok_or_else(|| DomainError::external("search", "no match for address"))
    }
}

// ============================================================================
// Mock FallbackProducer
// ============================================================================

#[derive(Clone)]
pub struct MockFallback {
    template: Arc<RwLock<Option<Property>>>,
    pub calls: Arc<AtomicUsize>,
}

impl MockFallback {
    pub fn new(template: Option<Property>) -> Self {
        Self {
            template: Arc::new(RwLock::new(template)),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FallbackProducer for MockFallback {
    async fn produce(&self, _property_id: &str) -> Result<Option<Property>, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.template.read().await.clone())
    }

    fn source(&self) -> ResolutionSource {
        ResolutionSource::Bootstrap
    }
}
