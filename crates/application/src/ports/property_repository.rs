use async_trait::async_trait;
use parcel_domain::{DomainError, ParsedAddress, Property};
use serde::{Deserialize, Serialize};

/// One page of properties plus the total number of stored properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyPage {
    pub items: Vec<Property>,
    pub total: u64,
}

/// Durable system of record for properties.
///
/// Every operation is a single-document write or a single query. Absence is
/// reported as `Ok(None)` for lookups and as `DomainError::PropertyNotFound`
/// for writes, never as a generic failure.
#[async_trait]
pub trait PropertyRepository: Send + Sync {
    /// Looks up a property by its external `property_id`.
    async fn find_by_id(&self, property_id: &str) -> Result<Option<Property>, DomainError>;

    /// Looks up a property by street and city. State and zip are applied as
    /// additional equality filters only when non-empty.
    async fn find_by_address(&self, address: &ParsedAddress)
        -> Result<Option<Property>, DomainError>;

    /// Returns `limit` properties starting at `offset`, ordered by street
    /// ascending, together with the total count.
    async fn find_with_pagination(&self, offset: u64, limit: u64)
        -> Result<PropertyPage, DomainError>;

    /// Inserts a new property and returns it with its surrogate id.
    ///
    /// # Errors
    ///
    /// * `DomainError::PropertyConflict` - If the `property_id` is already stored
    async fn create(&self, property: &Property) -> Result<Property, DomainError>;

    /// Replaces the stored document with the same `property_id`.
    ///
    /// # Errors
    ///
    /// * `DomainError::PropertyNotFound` - If no document matched
    async fn update(&self, property: &Property) -> Result<Property, DomainError>;

    /// # Errors
    ///
    /// * `DomainError::PropertyNotFound` - If no document was removed
    async fn delete(&self, property_id: &str) -> Result<(), DomainError>;
}
