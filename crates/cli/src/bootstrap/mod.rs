pub mod cache;
pub mod config;
pub mod database;
pub mod logging;

pub use cache::init_cache;
pub use config::load_config;
pub use database::init_database;
pub use logging::init_logging;
