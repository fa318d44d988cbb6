use async_trait::async_trait;
use parcel_application::ports::{ExternalPropertySource, FallbackProducer, ResolutionSource};
use parcel_domain::config::ExternalSourceConfig;
use parcel_domain::{DomainError, ParsedAddress, Property};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};

use super::credentials::CredentialProvider;
use super::payload::{check_record_id, ProviderProperty, SearchResponse};

/// Outcome of one failed HTTP step.
#[derive(Debug)]
pub(crate) enum StepError {
    /// Network failure, non-2xx status or malformed body. Retried.
    Transient(String),
    /// The bearer credential was rejected. Retried with a fresh credential.
    Unauthorized,
    /// The provider has no record for the requested identifier. Not retried.
    NotFound,
}

/// Provider client: client-credentials auth, address search, detail fetch.
///
/// Each HTTP step is retried up to `max_attempts` times with linear backoff
/// (attempt `n` waits `n * backoff`). The client never touches the cache or
/// the record store.
pub struct HttpPropertySource {
    http: reqwest::Client,
    base_url: String,
    credentials: CredentialProvider,
    max_attempts: u32,
    backoff: Duration,
}

impl HttpPropertySource {
    pub fn new(config: &ExternalSourceConfig) -> Result<Self, DomainError> {
        let http = reqwest::Client::builder()
            .use_rustls_tls()
            .timeout(config.timeout())
            .pool_max_idle_per_host(4)
            .build()
            .map_err(|e| DomainError::external("client", e.to_string()))?;

        let credentials = CredentialProvider::new(
            http.clone(),
            config.token_url.clone(),
            config.client_id.clone(),
            config.client_secret.clone(),
        );

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            credentials,
            max_attempts: config.max_attempts.max(1),
            backoff: config.backoff(),
        })
    }

    /// Runs `step` until it succeeds, returns `NotFound`, or the attempt
    /// budget is spent. The last attempt's error message is surfaced as-is.
    async fn with_retry<T, F, Fut>(
        &self,
        operation: &'static str,
        mut step: F,
    ) -> Result<Option<T>, DomainError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, StepError>>,
    {
        let mut last_error = String::new();

        for attempt in 1..=self.max_attempts {
            match step().await {
                Ok(value) => return Ok(Some(value)),
                Err(StepError::NotFound) => return Ok(None),
                Err(StepError::Unauthorized) => {
                    self.credentials.invalidate().await;
                    last_error = "credential rejected by provider".to_string();
                }
                Err(StepError::Transient(message)) => last_error = message,
            }

            if attempt < self.max_attempts {
                let delay = self.backoff * attempt;
                warn!(
                    operation,
                    attempt,
                    max_attempts = self.max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    error = %last_error,
                    "Provider request failed, retrying"
                );
                tokio::time::sleep(delay).await;
            }
        }

        error!(
            operation,
            attempts = self.max_attempts,
            error = %last_error,
            "Provider request failed after all attempts"
        );
        Err(DomainError::external(operation, last_error))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T, StepError> {
        let token = self.credentials.bearer().await?;

        let response = self
            .http
            .get(url)
            .bearer_auth(token)
            .query(query)
            .send()
            .await
            .map_err(|e| StepError::Transient(format!("request to {url} failed: {e}")))?;

        match response.status() {
            status if status.is_success() => {}
            StatusCode::UNAUTHORIZED => return Err(StepError::Unauthorized),
            StatusCode::NOT_FOUND => return Err(StepError::NotFound),
            status => {
                return Err(StepError::Transient(format!(
                    "{url} returned HTTP {}",
                    status.as_u16()
                )))
            }
        }

        response
            .json::<T>()
            .await
            .map_err(|e| StepError::Transient(format!("malformed body from {url}: {e}")))
    }

    async fn search(&self, address: &ParsedAddress) -> Result<Option<String>, DomainError> {
        let url = format!("{}/properties/search", self.base_url);
        let query = [
            ("street", address.street.as_str()),
            ("city", address.city.as_str()),
            ("state", address.state.as_str()),
            ("zip", address.zip.as_str()),
        ];

        let response = self
            .with_retry("search", || self.get_json::<SearchResponse>(&url, &query))
            .await?;

        let Some(hit) = response.and_then(|r| r.results.into_iter().next()) else {
            return Ok(None);
        };
        check_record_id("search", &hit.id)?;
        Ok(Some(hit.id))
    }

    async fn detail(&self, provider_id: &str) -> Result<Option<Property>, DomainError> {
        check_record_id("detail", provider_id)?;
        let url = format!("{}/properties/{}", self.base_url, provider_id);

        self.with_retry("detail", || self.get_json::<ProviderProperty>(&url, &[]))
            .await?
            .map(ProviderProperty::into_property)
            .transpose()
    }
}

#[async_trait]
impl ExternalPropertySource for HttpPropertySource {
    #[instrument(skip(self), fields(street = %address.street, city = %address.city))]
    async fn resolve(&self, address: &ParsedAddress) -> Result<Property, DomainError> {
        let provider_id = self.search(address).await?.ok_or_else(|| {
            DomainError::external(
                "search",
                format!("no match for {}, {}", address.street, address.city),
            )
        })?;
        debug!(provider_id = %provider_id, "Provider matched address");

        let property = self.detail(&provider_id).await?.ok_or_else(|| {
            DomainError::external("detail", format!("record {provider_id} disappeared"))
        })?;

        info!(property_id = %property.property_id, "Fetched property from provider");
        Ok(property)
    }
}

#[async_trait]
impl FallbackProducer for HttpPropertySource {
    #[instrument(skip(self))]
    async fn produce(&self, property_id: &str) -> Result<Option<Property>, DomainError> {
        self.detail(property_id).await
    }

    fn source(&self) -> ResolutionSource {
        ResolutionSource::ExternalApi
    }
}
