use axum::http::StatusCode;
use parcel_domain::DomainError;
use tracing::{error, warn};

/// Maps a pipeline error to a status code and a caller-safe message.
///
/// Backend failure text is logged here and replaced with a generic body.
pub fn into_response(e: DomainError) -> (StatusCode, String) {
    match e {
        DomainError::InvalidAddress(_) | DomainError::InvalidProperty(_) => {
            (StatusCode::BAD_REQUEST, e.to_string())
        }
        DomainError::PropertyNotFound(_) => (StatusCode::NOT_FOUND, e.to_string()),
        DomainError::PropertyConflict(_) => (StatusCode::CONFLICT, e.to_string()),
        DomainError::ExternalSource { .. } => {
            warn!(error = %e, "External source unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                "Property data provider is unavailable, try again later".to_string(),
            )
        }
        DomainError::Cancelled | DomainError::DeadlineExceeded => {
            warn!(error = %e, "Request did not complete in time");
            (StatusCode::GATEWAY_TIMEOUT, e.to_string())
        }
        DomainError::StoreUnavailable(_)
        | DomainError::DatabaseError(_)
        | DomainError::CacheError(_)
        | DomainError::Serialization(_) => {
            error!(error = %e, "Request failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            )
        }
    }
}
