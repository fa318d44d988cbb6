use async_trait::async_trait;
use parcel_domain::{DomainError, ParsedAddress, Property};

use super::ResolutionSource;

/// Slow, rate-limited external provider of property records.
///
/// Implementations are pure producers: they never touch the cache or the
/// record store.
#[async_trait]
pub trait ExternalPropertySource: Send + Sync {
    /// Resolves an address to the provider's identifier and returns the
    /// mapped detail record. The record's `property_id` is the provider id.
    async fn resolve(&self, address: &ParsedAddress) -> Result<Property, DomainError>;
}

/// Producer consulted when an id is unknown to both cache and store.
#[async_trait]
pub trait FallbackProducer: Send + Sync {
    /// Produces a record for `property_id`, or `None` when the producer has
    /// nothing to offer.
    async fn produce(&self, property_id: &str) -> Result<Option<Property>, DomainError>;

    fn source(&self) -> ResolutionSource;
}
