use serde::{Deserialize, Serialize};
use std::path::Path;

use super::{
    CacheConfig, ConfigError, DatabaseConfig, ExternalSourceConfig, LoggingConfig,
    ResolutionConfig, ServerConfig,
};

const DEFAULT_CONFIG_FILE: &str = "parcel.toml";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub cache: CacheConfig,

    #[serde(default)]
    pub resolution: ResolutionConfig,

    #[serde(default)]
    pub external: ExternalSourceConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Values passed on the command line; they win over the config file.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub bind_address: Option<String>,
    pub web_port: Option<u16>,
    pub database_path: Option<String>,
    pub cache_url: Option<String>,
    pub log_level: Option<String>,
}

impl Config {
    /// Loads configuration from `config_path`, falling back to `./parcel.toml`
    /// and then to defaults when no path is given.
    pub fn load(config_path: Option<&str>, overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = match config_path {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(DEFAULT_CONFIG_FILE)?
            }
            None => Self::default(),
        };

        config.apply_overrides(overrides);
        Ok(config)
    }

    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_string(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn apply_overrides(&mut self, overrides: CliOverrides) {
        if let Some(bind) = overrides.bind_address {
            self.server.bind_address = bind;
        }
        if let Some(port) = overrides.web_port {
            self.server.web_port = port;
        }
        if let Some(path) = overrides.database_path {
            self.database.path = path;
        }
        if let Some(url) = overrides.cache_url {
            self.cache.url = Some(url);
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.web_port == 0 {
            return Err(ConfigError::Validation("server.web_port cannot be 0".into()));
        }
        if self.database.max_connections == 0 {
            return Err(ConfigError::Validation(
                "database.max_connections must be at least 1".into(),
            ));
        }

        let cache = &self.cache;
        if cache.property_ttl_secs == 0 || cache.search_ttl_secs == 0 {
            return Err(ConfigError::Validation("cache TTLs must be positive".into()));
        }
        if cache.key_set_ttl_secs < cache.property_ttl_secs.max(cache.search_ttl_secs) {
            return Err(ConfigError::Validation(
                "cache.key_set_ttl_secs must be at least as long as the entries it indexes".into(),
            ));
        }

        let resolution = &self.resolution;
        if resolution.staleness_days == 0 {
            return Err(ConfigError::Validation(
                "resolution.staleness_days must be at least 1".into(),
            ));
        }
        if resolution.store_retry_attempts == 0 {
            return Err(ConfigError::Validation(
                "resolution.store_retry_attempts must be at least 1".into(),
            ));
        }

        let external = &self.external;
        if external.max_attempts == 0 {
            return Err(ConfigError::Validation(
                "external.max_attempts must be at least 1".into(),
            ));
        }
        for (name, url) in [("base_url", &external.base_url), ("token_url", &external.token_url)] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ConfigError::Validation(format!(
                    "external.{name} must start with http:// or https://"
                )));
            }
        }

        match self.logging.level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
            other => Err(ConfigError::Validation(format!(
                "logging.level '{other}' is not one of trace, debug, info, warn, error"
            ))),
        }
    }
}
