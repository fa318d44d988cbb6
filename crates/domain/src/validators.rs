use crate::address::MISSING_STREET_OR_CITY;
use crate::{DomainError, Property};

const MAX_PROPERTY_ID_LEN: usize = 128;

pub fn validate_property_id(property_id: &str) -> Result<(), DomainError> {
    if property_id.trim().is_empty() {
        return Err(DomainError::InvalidProperty(
            "property_id cannot be empty".to_string(),
        ));
    }
    if property_id.len() > MAX_PROPERTY_ID_LEN {
        return Err(DomainError::InvalidProperty(format!(
            "property_id cannot exceed {MAX_PROPERTY_ID_LEN} characters"
        )));
    }
    if property_id.chars().any(|c| c.is_whitespace() || c == ':') {
        return Err(DomainError::InvalidProperty(
            "property_id cannot contain whitespace or ':'".to_string(),
        ));
    }
    Ok(())
}

/// Required-field check applied by the mutation path before any write.
pub fn validate_property(property: &Property) -> Result<(), DomainError> {
    validate_property_id(&property.property_id)?;

    if property.address.street.trim().is_empty() || property.address.city.trim().is_empty() {
        return Err(DomainError::InvalidAddress(MISSING_STREET_OR_CITY.to_string()));
    }

    if !property.address.state.is_empty() && property.address.state.len() != 2 {
        return Err(DomainError::InvalidAddress(
            "state must be a two-letter code".to_string(),
        ));
    }

    Ok(())
}
