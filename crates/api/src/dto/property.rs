use parcel_application::ports::PropertyResolution;
use parcel_application::use_cases::PropertyListing;
use parcel_domain::{Address, Property, PropertyDetails};
use serde::{Deserialize, Serialize};

/// Response DTO for a resolved property
#[derive(Debug, Clone, Serialize)]
pub struct ResolutionResponse {
    pub property: Property,
    pub source: String,
    pub cache_hit: bool,
}

impl From<PropertyResolution> for ResolutionResponse {
    fn from(resolution: PropertyResolution) -> Self {
        Self {
            property: resolution.property,
            source: resolution.source.as_str().to_string(),
            cache_hit: resolution.cache_hit,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PropertyListResponse {
    pub items: Vec<Property>,
    pub total: u64,
    pub offset: u64,
    pub limit: u64,
    pub cache_hit: bool,
}

impl From<PropertyListing> for PropertyListResponse {
    fn from(listing: PropertyListing) -> Self {
        Self {
            items: listing.items,
            total: listing.total,
            offset: listing.offset,
            limit: listing.limit,
            cache_hit: listing.cache_hit,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AddressRequest {
    pub street: String,
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub zip: String,
}

/// Request DTO for creating or replacing a property
#[derive(Debug, Clone, Deserialize)]
pub struct PropertyRequest {
    /// Ignored on update; generated on create when absent.
    #[serde(default)]
    pub property_id: Option<String>,
    pub address: AddressRequest,
    #[serde(default)]
    pub details: PropertyDetails,
}

impl PropertyRequest {
    pub fn into_property(self) -> Property {
        let address = Address::new(
            &self.address.street,
            &self.address.city,
            &self.address.state,
            &self.address.zip,
        );
        Property::new(self.property_id.unwrap_or_default(), address).with_details(self.details)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    pub offset: Option<u64>,
    pub limit: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchQuery {
    pub address: String,
}
