//! Zone file addressing and commit payloads

use serde::{Deserialize, Serialize};

/// Where a zone file lives: its path inside the repository and the branch
/// to read and commit on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneLocation {
    pub file_path: String,
    pub branch: String,
}

impl ZoneLocation {
    #[must_use]
    pub fn new(file_path: impl Into<String>, branch: impl Into<String>) -> Self {
        Self {
            file_path: file_path.into(),
            branch: branch.into(),
        }
    }
}

impl std::fmt::Display for ZoneLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.file_path, self.branch)
    }
}

/// Commit author; unset fields fall back to the repository's defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitAuthor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl CommitAuthor {
    /// Whether neither name nor email is set
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none()
    }
}

/// Content of a zone file at a revision
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneBlob {
    pub content: Vec<u8>,
    /// Opaque revision id; `None` when the file does not exist yet.
    pub revision: Option<String>,
}

/// A full replacement of one zone file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneChange {
    pub content: Vec<u8>,
    /// Revision the content was derived from.
    pub base_revision: Option<String>,
    pub message: String,
    pub author: Option<CommitAuthor>,
}
