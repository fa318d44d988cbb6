use parcel_domain::Property;
use serde::Serialize;
use std::fmt;

/// Tier that produced a resolved property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResolutionSource {
    Cache,
    Store,
    ExternalApi,
    Bootstrap,
}

impl ResolutionSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cache => "CACHE",
            Self::Store => "STORE",
            Self::ExternalApi => "EXTERNAL_API",
            Self::Bootstrap => "BOOTSTRAP",
        }
    }
}

impl fmt::Display for ResolutionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PropertyResolution {
    pub property: Property,
    pub source: ResolutionSource,
    pub cache_hit: bool,
}

impl PropertyResolution {
    pub fn cached(property: Property) -> Self {
        Self {
            property,
            source: ResolutionSource::Cache,
            cache_hit: true,
        }
    }

    pub fn resolved(property: Property, source: ResolutionSource) -> Self {
        Self {
            property,
            source,
            cache_hit: false,
        }
    }
}
