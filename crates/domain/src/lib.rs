//! Parcel Domain Layer
pub mod address;
pub mod cache_key;
pub mod config;
pub mod errors;
pub mod property;
pub mod validators;

pub use address::{normalize, parse, ParsedAddress};
pub use config::{CliOverrides, Config, ConfigError};
pub use errors::DomainError;
pub use property::{
    Address, Building, Lot, Owner, Property, PropertyDetails, Sale, TaxAssessment,
};
