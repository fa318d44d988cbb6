use parcel_infrastructure::cache::MemoryPropertyCache;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Periodically drops expired entries from the in-process cache, which
/// otherwise only discards them when they are read.
pub struct CacheEvictionJob {
    cache: Arc<MemoryPropertyCache>,
    interval_secs: u64,
    shutdown: CancellationToken,
}

impl CacheEvictionJob {
    pub fn new(cache: Arc<MemoryPropertyCache>) -> Self {
        Self {
            cache,
            interval_secs: 60,
            shutdown: CancellationToken::new(),
        }
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    pub async fn start(self: Arc<Self>) {
        info!(interval_secs = self.interval_secs, "Starting cache eviction job");

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(self.interval_secs));
            loop {
                tokio::select! {
                    _ = self.shutdown.cancelled() => {
                        info!("CacheEvictionJob: shutting down");
                        break;
                    }
                    _ = interval.tick() => {
                        let removed = self.cache.evict_expired().await;
                        debug!(removed, "Cache eviction pass completed");
                    }
                }
            }
        });
    }
}
