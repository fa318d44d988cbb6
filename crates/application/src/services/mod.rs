mod property_cache_service;
mod property_store;
mod retry;

pub use property_cache_service::{CacheTtls, PropertyCacheService};
pub use property_store::PropertyStore;
pub use retry::RetryPolicy;
