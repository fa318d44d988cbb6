use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Cache engine configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    /// Redis connection URL. When absent an in-process cache is used.
    #[serde(default)]
    pub url: Option<String>,

    /// TTL of `property:{id}` record entries (default: 1 day)
    #[serde(default = "default_property_ttl")]
    pub property_ttl_secs: u64,

    /// TTL of search-key to property-id mappings (default: 1 day)
    #[serde(default = "default_search_ttl")]
    pub search_ttl_secs: u64,

    /// TTL of per-property key sets; must outlive the entries they index
    /// (default: 2 days)
    #[serde(default = "default_key_set_ttl")]
    pub key_set_ttl_secs: u64,

    /// TTL of paginated listing pages (default: 5 minutes)
    #[serde(default = "default_listing_ttl")]
    pub listing_ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            url: None,
            property_ttl_secs: default_property_ttl(),
            search_ttl_secs: default_search_ttl(),
            key_set_ttl_secs: default_key_set_ttl(),
            listing_ttl_secs: default_listing_ttl(),
        }
    }
}

impl CacheConfig {
    pub fn property_ttl(&self) -> Duration {
        Duration::from_secs(self.property_ttl_secs)
    }

    pub fn search_ttl(&self) -> Duration {
        Duration::from_secs(self.search_ttl_secs)
    }

    pub fn key_set_ttl(&self) -> Duration {
        Duration::from_secs(self.key_set_ttl_secs)
    }

    pub fn listing_ttl(&self) -> Duration {
        Duration::from_secs(self.listing_ttl_secs)
    }
}

fn default_property_ttl() -> u64 {
    86_400
}

fn default_search_ttl() -> u64 {
    86_400
}

fn default_key_set_ttl() -> u64 {
    172_800
}

fn default_listing_ttl() -> u64 {
    300
}
