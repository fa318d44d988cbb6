use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Invalid property: {0}")]
    InvalidProperty(String),

    #[error("Property not found: {0}")]
    PropertyNotFound(String),

    #[error("Property already exists: {0}")]
    PropertyConflict(String),

    #[error("Record store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("External source failed during {operation}: {message}")]
    ExternalSource { operation: String, message: String },

    #[error("Cache error: {0}")]
    CacheError(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Request cancelled")]
    Cancelled,

    #[error("Request deadline exceeded")]
    DeadlineExceeded,
}

impl DomainError {
    pub fn external(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ExternalSource {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Transient infrastructure failures that a bounded retry may recover from.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::StoreUnavailable(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::PropertyNotFound(_))
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::InvalidAddress(_) | Self::InvalidProperty(_))
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}
