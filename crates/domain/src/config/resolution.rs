use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Producer used when `ResolveByID` finds nothing in cache or store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FallbackMode {
    /// Ask the external provider for the id.
    External,
    /// Synthesize from the bootstrap data set.
    #[default]
    Bootstrap,
}

/// Resolution pipeline policy
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ResolutionConfig {
    /// Stored records older than this are refetched (default: 30)
    #[serde(default = "default_staleness_days")]
    pub staleness_days: u32,

    /// Attempts for retryable store errors (default: 3)
    #[serde(default = "default_store_retry_attempts")]
    pub store_retry_attempts: u32,

    /// Fixed delay between store attempts in milliseconds (default: 200)
    #[serde(default = "default_store_retry_delay")]
    pub store_retry_delay_ms: u64,

    /// Per-request deadline in milliseconds (default: 30000)
    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,

    #[serde(default)]
    pub fallback: FallbackMode,

    /// JSON file of template properties for the bootstrap fallback
    #[serde(default)]
    pub bootstrap_path: Option<String>,
}

impl Default for ResolutionConfig {
    fn default() -> Self {
        Self {
            staleness_days: default_staleness_days(),
            store_retry_attempts: default_store_retry_attempts(),
            store_retry_delay_ms: default_store_retry_delay(),
            request_timeout_ms: default_request_timeout(),
            fallback: FallbackMode::default(),
            bootstrap_path: None,
        }
    }
}

impl ResolutionConfig {
    pub fn staleness_threshold(&self) -> chrono::Duration {
        chrono::Duration::days(i64::from(self.staleness_days))
    }

    pub fn store_retry_delay(&self) -> Duration {
        Duration::from_millis(self.store_retry_delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

fn default_staleness_days() -> u32 {
    30
}

fn default_store_retry_attempts() -> u32 {
    3
}

fn default_store_retry_delay() -> u64 {
    200
}

fn default_request_timeout() -> u64 {
    30_000
}
