mod property_cache;
mod property_repository;
mod property_source;
mod resolution;

pub use property_cache::PropertyCache;
pub use property_repository::{PropertyPage, PropertyRepository};
pub use property_source::{ExternalPropertySource, FallbackProducer};
pub use resolution::{PropertyResolution, ResolutionSource};
