//! Configuration module for Parcel
//!
//! This module contains all configuration structures organized by concern:
//! - `root`: Main configuration and CLI overrides
//! - `server`: HTTP binding
//! - `database`: Record store settings
//! - `cache`: Cache engine connection and TTLs
//! - `resolution`: Staleness policy, store retries, first-sight fallback
//! - `external`: External data provider credentials and retry bounds
//! - `logging`: Logging settings
//! - `errors`: Configuration errors

pub mod cache;
pub mod database;
pub mod errors;
pub mod external;
pub mod logging;
pub mod resolution;
pub mod root;
pub mod server;

pub use cache::CacheConfig;
pub use database::DatabaseConfig;
pub use errors::ConfigError;
pub use external::ExternalSourceConfig;
pub use logging::{LogFormat, LoggingConfig};
pub use resolution::{FallbackMode, ResolutionConfig};
pub use root::{CliOverrides, Config};
pub use server::ServerConfig;
