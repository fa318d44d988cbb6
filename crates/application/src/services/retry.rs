use parcel_domain::DomainError;
use std::future::Future;
use std::time::Duration;
use tracing::{error, warn};

use crate::RequestContext;

/// Bounded fixed-delay retry for transient record store failures.
///
/// Only errors for which [`DomainError::is_retryable`] holds are retried;
/// everything else is returned on the first attempt.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    pub fn no_retry() -> Self {
        Self::new(1, Duration::ZERO)
    }

    pub async fn run<T, F, Fut>(
        &self,
        ctx: &RequestContext,
        operation: &'static str,
        mut op: F,
    ) -> Result<T, DomainError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, DomainError>>,
    {
        let mut attempt = 1;

        loop {
            match ctx.run(op()).await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_retryable() && attempt < self.max_attempts => {
                    warn!(operation, attempt, error = %e, "Transient store error, retrying");
                    ctx.run(async {
                        tokio::time::sleep(self.delay).await;
                        Ok(())
                    })
                    .await?;
                    attempt += 1;
                }
                Err(e) => {
                    if e.is_retryable() {
                        error!(operation, attempts = attempt, error = %e, "Store retries exhausted");
                    }
                    return Err(e);
                }
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_millis(200))
    }
}
