//! Provider wire schema and its mapping into [`Property`].
//!
//! Bodies are deserialized into these typed structs first; anything that
//! does not fit the schema is rejected as a malformed body before the
//! pipeline ever sees it.

use parcel_domain::validators::validate_property_id;
use parcel_domain::{
    Address, Building, DomainError, Lot, Owner, Property, PropertyDetails, Sale, TaxAssessment,
};
use serde::Deserialize;

/// Checks a provider-supplied record id before it is used as a URL path
/// segment or as a `property_id` in cache keys.
pub fn check_record_id(operation: &str, id: &str) -> Result<(), DomainError> {
    validate_property_id(id)
        .map_err(|e| DomainError::external(operation, format!("record id {id:?} rejected: {e}")))?;
    if id.contains(|c| matches!(c, '/' | '?' | '#' | '%')) {
        return Err(DomainError::external(
            operation,
            format!("record id {id:?} rejected: not a single path segment"),
        ));
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub results: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
pub struct SearchHit {
    pub id: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProviderAddress {
    pub line1: String,
    pub locality: String,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProviderLot {
    pub lot_size_sqft: Option<f64>,
    pub lot_size_acres: Option<f64>,
    pub zoning: Option<String>,
    pub apn: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProviderBuilding {
    pub year_built: Option<i32>,
    pub living_sqft: Option<f64>,
    pub beds: Option<u32>,
    pub baths: Option<f64>,
    pub stories: Option<u32>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProviderOwner {
    #[serde(default)]
    pub names: Vec<String>,
    pub mailing_address: Option<String>,
    pub owner_occupied: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProviderAssessment {
    pub year: Option<i32>,
    pub assessed_total: Option<f64>,
    pub market_total: Option<f64>,
    pub tax_amount: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProviderSale {
    pub date: Option<String>,
    pub price: Option<f64>,
    pub document_type: Option<String>,
}

/// Detail record returned by `GET /properties/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderProperty {
    pub id: String,
    pub address: ProviderAddress,
    #[serde(default)]
    pub lot: Option<ProviderLot>,
    #[serde(default)]
    pub building: Option<ProviderBuilding>,
    #[serde(default)]
    pub owner: Option<ProviderOwner>,
    #[serde(default)]
    pub assessment: Option<ProviderAssessment>,
    #[serde(default)]
    pub last_sale: Option<ProviderSale>,
}

impl ProviderProperty {
    pub fn into_property(self) -> Result<Property, DomainError> {
        check_record_id("detail", &self.id)?;
        if self.address.line1.trim().is_empty() || self.address.locality.trim().is_empty() {
            return Err(DomainError::external(
                "detail",
                format!("record {} has no street or city", self.id),
            ));
        }

        let address = Address::new(
            &self.address.line1,
            &self.address.locality,
            self.address.region.as_deref().unwrap_or_default(),
            self.address.postal_code.as_deref().unwrap_or_default(),
        );

        let details = PropertyDetails {
            lot: self.lot.map(|lot| Lot {
                area_sq_ft: lot.lot_size_sqft,
                acres: lot.lot_size_acres,
                zoning: lot.zoning,
                parcel_number: lot.apn,
            }),
            building: self.building.map(|b| Building {
                year_built: b.year_built,
                living_area_sq_ft: b.living_sqft,
                bedrooms: b.beds,
                bathrooms: b.baths,
                stories: b.stories,
                property_type: b.kind,
            }),
            owner: self.owner.map(|o| Owner {
                names: o.names,
                mailing_address: o.mailing_address,
                owner_occupied: o.owner_occupied,
            }),
            tax: self.assessment.map(|a| TaxAssessment {
                year: a.year,
                assessed_value: a.assessed_total,
                market_value: a.market_total,
                tax_amount: a.tax_amount,
            }),
            last_sale: self.last_sale.map(|s| Sale {
                date: s.date,
                amount: s.price,
                document_type: s.document_type,
            }),
        };

        Ok(Property::new(self.id, address).with_details(details))
    }
}
