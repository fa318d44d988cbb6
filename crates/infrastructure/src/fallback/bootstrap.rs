use async_trait::async_trait;
use parcel_application::ports::{FallbackProducer, ResolutionSource};
use parcel_domain::{Address, DomainError, Property, PropertyDetails};
use serde::Deserialize;
use tracing::{debug, info};

/// Data set compiled into the binary, used when no file is configured.
const BUILTIN_DATASET: &str = include_str!("../../data/bootstrap.json");

#[derive(Debug, Clone, Deserialize)]
struct Template {
    address: Address,
    #[serde(default)]
    details: PropertyDetails,
}

/// Template properties used to synthesize a record the first time an
/// unknown id is requested.
///
/// The template is picked from a stable hash of the id, so the same id
/// always yields the same record across processes.
pub struct BootstrapDataset {
    templates: Vec<Template>,
}

impl BootstrapDataset {
    pub fn builtin() -> Result<Self, DomainError> {
        Self::from_json(BUILTIN_DATASET)
    }

    pub fn from_file(path: &str) -> Result<Self, DomainError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            DomainError::Serialization(format!("Failed to read bootstrap data set {path}: {e}"))
        })?;
        let dataset = Self::from_json(&content)?;
        info!(path, templates = dataset.len(), "Loaded bootstrap data set");
        Ok(dataset)
    }

    pub fn from_json(content: &str) -> Result<Self, DomainError> {
        let templates: Vec<Template> = serde_json::from_str(content)?;
        if templates.is_empty() {
            return Err(DomainError::Serialization(
                "bootstrap data set has no templates".to_string(),
            ));
        }

        let templates = templates
            .into_iter()
            .map(|t| Template {
                address: t.address.normalized(),
                details: t.details,
            })
            .collect();

        Ok(Self { templates })
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    fn pick(&self, property_id: &str) -> Option<&Template> {
        let index = (fnv1a(property_id.as_bytes()) % self.templates.len() as u64) as usize;
        self.templates.get(index)
    }
}

/// 64-bit FNV-1a; stable across builds and platforms.
fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(0xcbf2_9ce4_8422_2325, |hash, b| {
        (hash ^ u64::from(*b)).wrapping_mul(0x0100_0000_01b3)
    })
}

#[async_trait]
impl FallbackProducer for BootstrapDataset {
    async fn produce(&self, property_id: &str) -> Result<Option<Property>, DomainError> {
        let Some(template) = self.pick(property_id) else {
            return Ok(None);
        };
        debug!(property_id, address = %template.address.normalized, "Synthesizing from template");

        Ok(Some(
            Property::new(property_id, template.address.clone())
                .with_details(template.details.clone()),
        ))
    }

    fn source(&self) -> ResolutionSource {
        ResolutionSource::Bootstrap
    }
}
