use serde::{Deserialize, Serialize};

/// Record store configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// Path to SQLite database file (default: "./parcel.db")
    #[serde(default = "default_db_path")]
    pub path: String,

    /// Maximum pooled connections (default: 8)
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Directory holding SQL migrations (default: "./migrations")
    #[serde(default = "default_migrations")]
    pub migrations: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            max_connections: default_max_connections(),
            migrations: default_migrations(),
        }
    }
}

impl DatabaseConfig {
    pub fn url(&self) -> String {
        if self.path.starts_with("sqlite:") {
            self.path.clone()
        } else {
            format!("sqlite:{}", self.path)
        }
    }
}

fn default_db_path() -> String {
    "./parcel.db".to_string()
}

fn default_max_connections() -> u32 {
    8
}

fn default_migrations() -> String {
    "./migrations".to_string()
}
