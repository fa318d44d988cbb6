pub mod cache;
pub mod database;
pub mod external;
pub mod fallback;
pub mod repositories;
