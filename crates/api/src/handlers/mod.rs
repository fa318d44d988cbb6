pub mod health;
pub mod properties;

pub use health::health_check;
