//! Zone repository abstract Trait

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::types::{CommitAuthor, ZoneBlob, ZoneChange, ZoneLocation};

/// Error returned by a [`ZoneRepository`].
///
/// # Retryable Errors
///
/// Only [`Transient`](Self::Transient) is worth retrying as-is.
/// [`Conflict`](Self::Conflict) means the base revision is stale: the change
/// has to be rebuilt on top of a fresh fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "code")]
pub enum RepositoryError {
    /// No zone file at this path.
    NotFound {
        /// File path of the zone.
        path: String,
    },

    /// The zone changed since the revision the commit was based on.
    Conflict {
        /// File path of the zone.
        path: String,
        /// Error details.
        detail: String,
    },

    /// A temporary failure (network, lock contention, rate limit).
    Transient {
        /// Error details.
        detail: String,
    },

    /// Any other failure.
    Fatal {
        /// Error details.
        detail: String,
    },
}

impl RepositoryError {
    /// Whether it is expected behavior, used for log classification.
    #[must_use]
    pub fn is_expected(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::Conflict { .. })
    }

    /// Whether repeating the same request may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transient { .. })
    }
}

impl std::fmt::Display for RepositoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound { path } => write!(f, "Zone file not found: {path}"),
            Self::Conflict { path, detail } => write!(f, "Conflicting commit to {path}: {detail}"),
            Self::Transient { detail } => write!(f, "Temporary repository failure: {detail}"),
            Self::Fatal { detail } => write!(f, "Repository failure: {detail}"),
        }
    }
}

impl std::error::Error for RepositoryError {}

/// Zone repository Trait
///
/// The persistence gateway behind every service call. A zone file is
/// addressed by a resolved [`ZoneLocation`]; the repository neither parses
/// nor validates its content.
///
/// Implementations:
/// - [`InMemoryZoneRepository`]: tests and embedding
/// - [`FileZoneRepository`](crate::adapters::FileZoneRepository): a directory of zone files
#[async_trait]
pub trait ZoneRepository: Send + Sync {
    /// Fetch the current content and revision of a zone file
    ///
    /// # Arguments
    /// * `location` - Resolved file path and branch
    async fn fetch(&self, location: &ZoneLocation) -> Result<ZoneBlob, RepositoryError>;

    /// Replace a zone file
    ///
    /// # Arguments
    /// * `location` - Resolved file path and branch
    /// * `change` - New content, the revision it was built on, message and author
    ///
    /// # Returns
    /// * `Err(Conflict)` - `change.base_revision` is no longer the current revision
    async fn commit(&self, location: &ZoneLocation, change: &ZoneChange)
    -> Result<(), RepositoryError>;
}

/// One accepted commit, as recorded by [`InMemoryZoneRepository`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRecord {
    pub location: ZoneLocation,
    pub revision: String,
    pub message: String,
    pub author: Option<CommitAuthor>,
    pub committed_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
struct StoredZone {
    content: Vec<u8>,
    revision: String,
}

#[derive(Debug, Default)]
struct InMemoryState {
    zones: HashMap<ZoneLocation, StoredZone>,
    commits: Vec<CommitRecord>,
    next_revision: u64,
}

impl InMemoryState {
    fn bump(&mut self) -> String {
        self.next_revision += 1;
        format!("r{}", self.next_revision)
    }
}

/// In-memory zone repository
///
/// Revisions are a counter (`r1`, `r2`, ...). Every accepted commit is kept
/// in a log for inspection.
#[derive(Clone)]
pub struct InMemoryZoneRepository {
    state: Arc<RwLock<InMemoryState>>,
}

impl InMemoryZoneRepository {
    /// Create an empty repository
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(InMemoryState::default())),
        }
    }

    /// Store a zone file directly, bypassing the revision check.
    pub async fn put(&self, location: ZoneLocation, content: impl Into<Vec<u8>>) -> String {
        let mut state = self.state.write().await;
        let revision = state.bump();
        state.zones.insert(
            location,
            StoredZone {
                content: content.into(),
                revision: revision.clone(),
            },
        );
        revision
    }

    /// Current content of a zone file as text
    pub async fn content(&self, location: &ZoneLocation) -> Option<String> {
        self.state
            .read()
            .await
            .zones
            .get(location)
            .map(|zone| String::from_utf8_lossy(&zone.content).into_owned())
    }

    /// Every accepted commit, oldest first
    pub async fn commits(&self) -> Vec<CommitRecord> {
        self.state.read().await.commits.clone()
    }
}

impl Default for InMemoryZoneRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ZoneRepository for InMemoryZoneRepository {
    async fn fetch(&self, location: &ZoneLocation) -> Result<ZoneBlob, RepositoryError> {
        let state = self.state.read().await;
        let zone = state
            .zones
            .get(location)
            .ok_or_else(|| RepositoryError::NotFound {
                path: location.file_path.clone(),
            })?;
        Ok(ZoneBlob {
            content: zone.content.clone(),
            revision: Some(zone.revision.clone()),
        })
    }

    async fn commit(
        &self,
        location: &ZoneLocation,
        change: &ZoneChange,
    ) -> Result<(), RepositoryError> {
        let mut state = self.state.write().await;
        let current = state.zones.get(location).map(|zone| zone.revision.clone());
        if current != change.base_revision {
            return Err(RepositoryError::Conflict {
                path: location.file_path.clone(),
                detail: format!(
                    "base revision {:?} is not the current revision {current:?}",
                    change.base_revision
                ),
            });
        }
        let revision = state.bump();
        state.zones.insert(
            location.clone(),
            StoredZone {
                content: change.content.clone(),
                revision: revision.clone(),
            },
        );
        state.commits.push(CommitRecord {
            location: location.clone(),
            revision,
            message: change.message.clone(),
            author: change.author.clone(),
            committed_at: Utc::now(),
        });
        Ok(())
    }
}
