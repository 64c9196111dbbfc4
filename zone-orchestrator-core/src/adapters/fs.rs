//! Directory-backed zone repository.
//!
//! Zone files live under a root directory at their resolved path. The
//! revision of a file is the SHA-256 of its content, so a commit built on a
//! stale read is detected even when the file was changed by another process.
//! Branches are not modelled: every branch reads and writes the same files.

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use tokio::sync::Mutex;

use crate::traits::{RepositoryError, ZoneRepository};
use crate::types::{ZoneBlob, ZoneChange, ZoneLocation};

/// Zone repository over a local directory
pub struct FileZoneRepository {
    root: PathBuf,
    write_lock: Mutex<()>,
}

fn revision_of(content: &[u8]) -> String {
    hex::encode(Sha256::digest(content))
}

fn io_error(path: &Path, e: &std::io::Error) -> RepositoryError {
    let detail = format!("{}: {e}", path.display());
    match e.kind() {
        ErrorKind::Interrupted | ErrorKind::WouldBlock | ErrorKind::TimedOut => {
            RepositoryError::Transient { detail }
        }
        _ => RepositoryError::Fatal { detail },
    }
}

impl FileZoneRepository {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute path of a zone file. Paths escaping the root are rejected.
    fn path_of(&self, location: &ZoneLocation) -> Result<PathBuf, RepositoryError> {
        let relative = Path::new(&location.file_path);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes || location.file_path.is_empty() {
            return Err(RepositoryError::Fatal {
                detail: format!("zone path '{}' is outside the repository", location.file_path),
            });
        }
        Ok(self.root.join(relative))
    }

    async fn read(path: &Path) -> Result<Option<Vec<u8>>, RepositoryError> {
        match tokio::fs::read(path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error(path, &e)),
        }
    }
}

#[async_trait]
impl ZoneRepository for FileZoneRepository {
    async fn fetch(&self, location: &ZoneLocation) -> Result<ZoneBlob, RepositoryError> {
        let path = self.path_of(location)?;
        let content = Self::read(&path)
            .await?
            .ok_or_else(|| RepositoryError::NotFound {
                path: location.file_path.clone(),
            })?;
        let revision = revision_of(&content);
        log::debug!("Read {} ({} bytes, revision {revision})", path.display(), content.len());
        Ok(ZoneBlob {
            content,
            revision: Some(revision),
        })
    }

    async fn commit(
        &self,
        location: &ZoneLocation,
        change: &ZoneChange,
    ) -> Result<(), RepositoryError> {
        let path = self.path_of(location)?;
        let _guard = self.write_lock.lock().await;

        let current = Self::read(&path).await?.map(|content| revision_of(&content));
        if current != change.base_revision {
            return Err(RepositoryError::Conflict {
                path: location.file_path.clone(),
                detail: format!(
                    "base revision {} but current is {}",
                    change.base_revision.as_deref().unwrap_or("none"),
                    current.as_deref().unwrap_or("none")
                ),
            });
        }

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| io_error(parent, &e))?;
        }
        let mut staging = path.clone().into_os_string();
        staging.push(".tmp");
        let staging = PathBuf::from(staging);
        tokio::fs::write(&staging, &change.content)
            .await
            .map_err(|e| io_error(&staging, &e))?;
        tokio::fs::rename(&staging, &path)
            .await
            .map_err(|e| io_error(&path, &e))?;

        let author = change
            .author
            .as_ref()
            .and_then(|a| a.name.as_deref().or(a.email.as_deref()))
            .unwrap_or("anonymous");
        log::info!(
            "Wrote {} on {} by {}: {}",
            location.file_path,
            location.branch,
            author,
            change.message
        );
        Ok(())
    }
}
