//! Cache key scheme.
//!
//! Keys are derived only from their arguments, so two callers with identical
//! inputs always address the same cache slot.

/// Set of every listing key currently cached; purged on any mutation.
pub const LISTING_INDEX_KEY: &str = "properties:list:keys";

/// `property:{property_id}`
pub fn property_key(property_id: &str) -> String {
    format!("property:{property_id}")
}

/// `properties:search-specific:street:{street}:city:{city}`
///
/// State and zip are left out so that ambiguous inputs for the same
/// street and city share one slot.
pub fn search_key(street: &str, city: &str) -> String {
    format!("properties:search-specific:street:{street}:city:{city}")
}

/// `property:keys:{property_id}`, the reverse index of keys referencing a property.
pub fn key_set_key(property_id: &str) -> String {
    format!("property:keys:{property_id}")
}

/// `properties:list:offset:{offset}:limit:{limit}`
pub fn listing_key(offset: u64, limit: u64) -> String {
    format!("properties:list:offset:{offset}:limit:{limit}")
}
