//! Test helper module
//!
//! Provides mock repositories and convenient test factory methods.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::scope::{Scope, ScopeRegistry};
use crate::services::ServiceContext;
use crate::traits::{InMemoryZoneRepository, RepositoryError, ZoneRepository};
use crate::types::{ZoneBlob, ZoneChange, ZoneLocation};

// ===== FlakyZoneRepository =====

#[derive(Default)]
struct Faults {
    fetch_failures: u32,
    commit_failures: u32,
    /// Contents another writer commits just before each of our commits
    concurrent_writes: Vec<String>,
    fetch_calls: u32,
    commit_calls: u32,
}

/// In-memory repository with injectable transient failures and concurrent
/// writers.
pub struct FlakyZoneRepository {
    inner: InMemoryZoneRepository,
    faults: RwLock<Faults>,
}

impl FlakyZoneRepository {
    pub fn new() -> Self {
        Self {
            inner: InMemoryZoneRepository::new(),
            faults: RwLock::new(Faults::default()),
        }
    }

    pub fn store(&self) -> &InMemoryZoneRepository {
        &self.inner
    }

    pub async fn put(&self, location: ZoneLocation, content: &str) -> String {
        self.inner.put(location, content).await
    }

    pub async fn fail_next_fetches(&self, count: u32) {
        self.faults.write().await.fetch_failures = count;
    }

    pub async fn fail_next_commits(&self, count: u32) {
        self.faults.write().await.commit_failures = count;
    }

    /// Make another writer replace the zone right before each of our next
    /// commits, one entry per commit.
    pub async fn race_commits_with(&self, contents: &[&str]) {
        self.faults.write().await.concurrent_writes =
            contents.iter().rev().map(|c| (*c).to_string()).collect();
    }

    pub async fn fetch_calls(&self) -> u32 {
        self.faults.read().await.fetch_calls
    }

    pub async fn commit_calls(&self) -> u32 {
        self.faults.read().await.commit_calls
    }
}

#[async_trait]
impl ZoneRepository for FlakyZoneRepository {
    async fn fetch(&self, location: &ZoneLocation) -> Result<ZoneBlob, RepositoryError> {
        {
            let mut faults = self.faults.write().await;
            faults.fetch_calls += 1;
            if faults.fetch_failures > 0 {
                faults.fetch_failures -= 1;
                return Err(RepositoryError::Transient {
                    detail: "connection reset".to_string(),
                });
            }
        }
        self.inner.fetch(location).await
    }

    async fn commit(
        &self,
        location: &ZoneLocation,
        change: &ZoneChange,
    ) -> Result<(), RepositoryError> {
        let concurrent = {
            let mut faults = self.faults.write().await;
            faults.commit_calls += 1;
            if faults.commit_failures > 0 {
                faults.commit_failures -= 1;
                return Err(RepositoryError::Transient {
                    detail: "service unavailable".to_string(),
                });
            }
            faults.concurrent_writes.pop()
        };
        if let Some(content) = concurrent {
            self.inner.put(location.clone(), content).await;
        }
        self.inner.commit(location, change).await
    }
}

impl Default for FlakyZoneRepository {
    fn default() -> Self {
        Self::new()
    }
}

// ===== Factory methods =====

/// Context over `repository` with the default scope at the repository root
/// and no delay between conflict retries.
pub fn create_test_context(repository: Arc<dyn ZoneRepository>) -> Arc<ServiceContext> {
    let mut scopes = ScopeRegistry::default();
    if let Err(e) = scopes.add_scope("", Scope::new("")) {
        log::error!("Failed to register default scope: {e}");
    }
    Arc::new(ServiceContext::new(repository, scopes).with_retry_base_delay(Duration::ZERO))
}
