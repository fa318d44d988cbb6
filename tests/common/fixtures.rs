use serde_json::{json, Value};

pub const SPRINGFIELD_QUERY: &str = "123 Main St, Springfield, IL 62704";

pub fn provider_detail(id: &str, line1: &str, locality: &str, region: &str, postal: &str) -> Value {
    json!({
        "id": id,
        "address": {
            "line1": line1,
            "locality": locality,
            "region": region,
            "postal_code": postal
        },
        "building": { "year_built": 1956, "beds": 3, "baths": 1.5, "type": "SFR" }
    })
}

pub fn property_body(id: &str, street: &str, city: &str, state: &str, zip: &str) -> Value {
    json!({
        "property_id": id,
        "address": { "street": street, "city": city, "state": state, "zip": zip },
        "details": { "building": { "bedrooms": 2 } }
    })
}
