//! Transient-failure retry for zone repositories

use std::time::Duration;

use async_trait::async_trait;

use crate::traits::{RepositoryError, ZoneRepository};
use crate::types::{ZoneBlob, ZoneChange, ZoneLocation};

/// Default number of retries after the first attempt
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Calculate exponential backoff delay
///
/// Backoff strategy: `base`, 2×`base`, 4×`base`, ... (100ms, 200ms, 400ms
/// with the default base). Maximum delay limit is 10 seconds
fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    let capped_attempt = attempt.min(20); // Prevent 2^attempt from overflowing
    let base_ms = u64::try_from(base.as_millis()).unwrap_or(u64::MAX);
    let delay_ms = base_ms.saturating_mul(1_u64 << capped_attempt);
    let delay_ms = delay_ms.min(10_000); // Maximum 10 seconds
    Duration::from_millis(delay_ms)
}

/// Repository decorator that retries [`RepositoryError::Transient`] failures
///
/// Conflicts and missing files are returned at once: repeating the same
/// request cannot fix them.
pub struct RetryingRepository<R> {
    inner: R,
    max_retries: u32,
    base_delay: Duration,
}

impl<R: ZoneRepository> RetryingRepository<R> {
    #[must_use]
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            max_retries: DEFAULT_MAX_RETRIES,
            base_delay: Duration::from_millis(100),
        }
    }

    #[must_use]
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    #[must_use]
    pub fn with_base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }

    async fn pause(&self, operation: &str, attempt: u32, err: &RepositoryError) {
        let delay = backoff_delay(self.base_delay, attempt);
        log::warn!(
            "Zone {} failed (attempt {}/{}), retrying in {:.1}s: {}",
            operation,
            attempt + 1,
            self.max_retries,
            delay.as_secs_f32(),
            err
        );
        tokio::time::sleep(delay).await;
    }
}

#[async_trait]
impl<R: ZoneRepository> ZoneRepository for RetryingRepository<R> {
    async fn fetch(&self, location: &ZoneLocation) -> Result<ZoneBlob, RepositoryError> {
        let mut attempt = 0;
        loop {
            match self.inner.fetch(location).await {
                Err(e) if attempt < self.max_retries && e.is_retryable() => {
                    self.pause("fetch", attempt, &e).await;
                    attempt += 1;
                }
                result => return result,
            }
        }
    }

    async fn commit(
        &self,
        location: &ZoneLocation,
        change: &ZoneChange,
    ) -> Result<(), RepositoryError> {
        let mut attempt = 0;
        loop {
            match self.inner.commit(location, change).await {
                Err(e) if attempt < self.max_retries && e.is_retryable() => {
                    self.pause("commit", attempt, &e).await;
                    attempt += 1;
                }
                result => return result,
            }
        }
    }
}
