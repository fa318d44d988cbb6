use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::address::normalize;

/// Postal address of a property.
///
/// Components are stored in normalized form (uppercase, canonical suffixes);
/// `normalized` is the single-line projection used for display and logging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Address {
    pub street: String,
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub zip: String,
    #[serde(default)]
    pub normalized: String,
}

impl Address {
    pub fn new(street: &str, city: &str, state: &str, zip: &str) -> Self {
        let mut address = Self {
            street: normalize(street),
            city: normalize(city),
            state: normalize(state),
            zip: normalize(zip),
            normalized: String::new(),
        };
        address.normalized = address.one_line();
        address
    }

    /// Re-applies normalization to every component, e.g. after deserializing
    /// caller-supplied input.
    pub fn normalized(self) -> Self {
        Self::new(&self.street, &self.city, &self.state, &self.zip)
    }

    pub fn one_line(&self) -> String {
        let tail = [self.state.as_str(), self.zip.as_str()]
            .iter()
            .filter(|s| !s.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join(" ");

        let mut parts = vec![self.street.as_str(), self.city.as_str()];
        if !tail.is_empty() {
            parts.push(tail.as_str());
        }
        parts
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// False when a non-empty requested state or zip contradicts this address.
    ///
    /// Empty components on either side are treated as unknown and never conflict.
    pub fn agrees_with(&self, state: &str, zip: &str) -> bool {
        let conflicts = |ours: &str, theirs: &str| {
            !ours.is_empty() && !theirs.is_empty() && ours != theirs
        };
        !conflicts(&self.state, state) && !conflicts(&self.zip, zip)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Lot {
    pub area_sq_ft: Option<f64>,
    pub acres: Option<f64>,
    pub zoning: Option<String>,
    pub parcel_number: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Building {
    pub year_built: Option<i32>,
    pub living_area_sq_ft: Option<f64>,
    pub bedrooms: Option<u32>,
    pub bathrooms: Option<f64>,
    pub stories: Option<u32>,
    pub property_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Owner {
    pub names: Vec<String>,
    pub mailing_address: Option<String>,
    pub owner_occupied: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TaxAssessment {
    pub year: Option<i32>,
    pub assessed_value: Option<f64>,
    pub market_value: Option<f64>,
    pub tax_amount: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Sale {
    pub date: Option<String>,
    pub amount: Option<f64>,
    pub document_type: Option<String>,
}

/// Domain attributes carried with a property. The resolution pipeline treats
/// this as an opaque payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PropertyDetails {
    #[serde(default)]
    pub lot: Option<Lot>,
    #[serde(default)]
    pub building: Option<Building>,
    #[serde(default)]
    pub owner: Option<Owner>,
    #[serde(default)]
    pub tax: Option<TaxAssessment>,
    #[serde(default)]
    pub last_sale: Option<Sale>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    /// Surrogate key assigned by the record store.
    pub id: Option<i64>,
    /// Stable external identifier; unique across the record store.
    pub property_id: String,
    pub address: Address,
    #[serde(default)]
    pub details: PropertyDetails,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Property {
    pub fn new(property_id: impl Into<String>, address: Address) -> Self {
        Self {
            id: None,
            property_id: property_id.into(),
            address,
            details: PropertyDetails::default(),
            created_at: None,
            updated_at: None,
        }
    }

    pub fn with_details(mut self, details: PropertyDetails) -> Self {
        self.details = details;
        self
    }

    /// A record is fresh while `now - updated_at` is below `threshold`.
    /// Records without a timestamp are always stale.
    pub fn is_fresh(&self, now: DateTime<Utc>, threshold: Duration) -> bool {
        match self.updated_at {
            Some(updated_at) => now.signed_duration_since(updated_at) < threshold,
            None => false,
        }
    }

    /// Takes over the identity of an existing stored record so that a freshly
    /// fetched record overwrites it in place.
    pub fn adopt_identity(&mut self, existing: &Property) {
        self.id = existing.id;
        self.property_id = existing.property_id.clone();
        self.created_at = existing.created_at;
    }

    pub fn touch(&mut self, now: DateTime<Utc>) {
        if self.created_at.is_none() {
            self.created_at = Some(now);
        }
        self.updated_at = Some(now);
    }
}
