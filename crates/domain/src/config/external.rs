use serde::{Deserialize, Serialize};
use std::time::Duration;

/// External property data provider
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExternalSourceConfig {
    /// Provider API root, e.g. "https://api.provider.example/v1"
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Client-credentials token endpoint
    #[serde(default = "default_token_url")]
    pub token_url: String,

    #[serde(default)]
    pub client_id: String,

    #[serde(default)]
    pub client_secret: String,

    /// Attempts per HTTP step (default: 3)
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Linear backoff unit in milliseconds; attempt n waits n * backoff (default: 500)
    #[serde(default = "default_backoff")]
    pub backoff_ms: u64,

    /// Per-request HTTP timeout in seconds (default: 10)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for ExternalSourceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            token_url: default_token_url(),
            client_id: String::new(),
            client_secret: String::new(),
            max_attempts: default_max_attempts(),
            backoff_ms: default_backoff(),
            timeout_secs: default_timeout(),
        }
    }
}

impl ExternalSourceConfig {
    pub fn backoff(&self) -> Duration {
        Duration::from_millis(self.backoff_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:9400/v1".to_string()
}

fn default_token_url() -> String {
    "http://127.0.0.1:9400/oauth/token".to_string()
}

fn default_max_attempts() -> u32 {
    3
}

fn default_backoff() -> u64 {
    500
}

fn default_timeout() -> u64 {
    10
}
