//! Business logic service layer

mod record_service;
mod subdomain_service;

pub use record_service::RecordService;
pub use subdomain_service::SubdomainService;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use zone_orchestrator_model::Zone;

use crate::config::GatewayConfig;
use crate::error::{CoreError, CoreResult};
use crate::scope::ScopeRegistry;
use crate::traits::{RepositoryError, ZoneRepository};
use crate::types::{CommitAuthor, ZoneChange, ZoneLocation};

/// Default number of commit attempts per change
pub const DEFAULT_RETRY_LIMIT: u32 = 5;

/// Service context - holds all dependencies
///
/// The platform layer creates this context and injects the repository
/// implementation. All zone reads and changes made through one context are
/// serialized by a single lock held over the whole
/// fetch → edit → serialize → commit sequence.
pub struct ServiceContext {
    /// Persistence gateway
    pub repository: Arc<dyn ZoneRepository>,
    /// Scope routing table
    pub scopes: ScopeRegistry,
    /// Author attached to every commit
    pub author: Option<CommitAuthor>,
    /// Commit attempts before a conflict is reported
    pub retry_limit: u32,
    /// Wait after the n-th conflict is n × this delay
    pub retry_base_delay: Duration,
    zone_lock: Mutex<()>,
}

impl ServiceContext {
    /// Create service context
    #[must_use]
    pub fn new(repository: Arc<dyn ZoneRepository>, scopes: ScopeRegistry) -> Self {
        Self {
            repository,
            scopes,
            author: None,
            retry_limit: DEFAULT_RETRY_LIMIT,
            retry_base_delay: Duration::from_millis(100),
            zone_lock: Mutex::new(()),
        }
    }

    /// Create service context from gateway configuration
    pub fn from_config(
        repository: Arc<dyn ZoneRepository>,
        config: &GatewayConfig,
    ) -> CoreResult<Self> {
        let context = Self::new(repository, config.scope_registry()?)
            .with_author(config.commit_author())
            .with_retry_limit(config.retry_limit);
        Ok(context)
    }

    #[must_use]
    pub fn with_author(mut self, author: Option<CommitAuthor>) -> Self {
        self.author = author;
        self
    }

    #[must_use]
    pub fn with_retry_limit(mut self, retry_limit: u32) -> Self {
        self.retry_limit = retry_limit;
        self
    }

    #[must_use]
    pub fn with_retry_base_delay(mut self, delay: Duration) -> Self {
        self.retry_base_delay = delay;
        self
    }

    /// Resolve the zone file of `zone` in `scope`
    pub fn locate(&self, scope: &str, zone: &str) -> CoreResult<ZoneLocation> {
        self.scopes.resolve(scope, zone)
    }

    /// Fetch and parse a zone
    pub async fn read_zone(&self, scope: &str, zone: &str) -> CoreResult<Zone> {
        let location = self.locate(scope, zone)?;
        let _guard = self.zone_lock.lock().await;
        let blob = self.repository.fetch(&location).await?;
        Ok(Zone::from_slice(&blob.content)?)
    }

    /// Apply `edit` to a zone and commit the result
    ///
    /// On a conflicting commit the zone is fetched again and `edit` is
    /// re-applied to the fresh document, up to `retry_limit` attempts. An
    /// edit that leaves the serialized document unchanged commits nothing.
    pub async fn modify_zone<T, F>(
        &self,
        scope: &str,
        zone: &str,
        message: &str,
        mut edit: F,
    ) -> CoreResult<T>
    where
        F: FnMut(&mut Zone) -> CoreResult<T> + Send,
        T: Send,
    {
        let location = self.locate(scope, zone)?;
        let _guard = self.zone_lock.lock().await;
        let attempts = self.retry_limit.max(1);

        for attempt in 0..attempts {
            let blob = self.repository.fetch(&location).await?;
            let mut document = Zone::from_slice(&blob.content)?;
            let output = edit(&mut document)?;
            let content = document.to_yaml()?;
            if content.as_bytes() == blob.content.as_slice() {
                log::debug!("{location} unchanged, nothing to commit");
                return Ok(output);
            }

            let change = ZoneChange {
                content: content.into_bytes(),
                base_revision: blob.revision,
                message: message.to_string(),
                author: self.author.clone(),
            };
            match self.repository.commit(&location, &change).await {
                Ok(()) => {
                    log::info!("Committed {location}: {message}");
                    return Ok(output);
                }
                Err(RepositoryError::Conflict { detail, .. }) => {
                    let delay = self.retry_base_delay.saturating_mul(attempt + 1);
                    log::warn!(
                        "Commit to {} conflicted (attempt {}/{}), retrying in {:.1}s: {}",
                        location,
                        attempt + 1,
                        attempts,
                        delay.as_secs_f32(),
                        detail
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(CoreError::CommitConflict {
            path: location.file_path,
            attempts,
        })
    }
}

/// Subdomain name as shown in commit messages
fn display_name(name: &str) -> &str {
    if name.is_empty() {
        zone_orchestrator_model::APEX_MARKER
    } else {
        name
    }
}
