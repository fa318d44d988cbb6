use parcel_application::ports::PropertyCache;
use parcel_domain::config::CacheConfig;
use parcel_infrastructure::cache::{MemoryPropertyCache, RedisPropertyCache};
use std::sync::Arc;
use tracing::{error, info};

/// Selected cache engine. The in-process engine is kept typed so the
/// eviction job can sweep it.
pub enum CacheBackend {
    Redis(Arc<RedisPropertyCache>),
    Memory(Arc<MemoryPropertyCache>),
}

impl CacheBackend {
    pub fn port(&self) -> Arc<dyn PropertyCache> {
        match self {
            Self::Redis(cache) => cache.clone(),
            Self::Memory(cache) => cache.clone(),
        }
    }
}

pub async fn init_cache(cfg: &CacheConfig) -> anyhow::Result<CacheBackend> {
    match cfg.url.as_deref() {
        Some(url) => {
            let cache = RedisPropertyCache::connect(url).await.map_err(|e| {
                error!("Failed to connect to cache: {}", e);
                anyhow::anyhow!(e)
            })?;
            Ok(CacheBackend::Redis(Arc::new(cache)))
        }
        None => {
            info!("No cache URL configured, using in-process cache");
            Ok(CacheBackend::Memory(Arc::new(MemoryPropertyCache::new())))
        }
    }
}
