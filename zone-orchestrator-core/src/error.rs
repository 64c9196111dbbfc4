//! Unified error type definition

use serde::Serialize;
use thiserror::Error;

pub use crate::traits::RepositoryError;
pub use zone_orchestrator_model::{ValidationError, ZoneError};

/// Core layer error type
#[derive(Error, Debug, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum CoreError {
    /// Scope is not registered
    #[error("Scope not found: {0}")]
    ScopeNotFound(String),

    /// Scope definition rejected
    #[error("Invalid scope '{name}': {reason}")]
    InvalidScope { name: String, reason: String },

    /// Gateway configuration could not be loaded
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Resource id is not `scope zone name`
    #[error("Malformed resource id: {0}")]
    MalformedId(String),

    /// Zone file does not exist in the repository
    #[error("Zone not found: {0}")]
    ZoneNotFound(String),

    /// Every commit attempt lost against a concurrent writer
    #[error("Commit to {path} kept conflicting after {attempts} attempts")]
    CommitConflict { path: String, attempts: u32 },

    /// Persistence gateway error
    #[error("{0}")]
    Repository(RepositoryError),

    /// Zone document error (converting from model)
    #[error("{0}")]
    Zone(#[from] ZoneError),
}

impl CoreError {
    /// Whether it is expected behavior (user input, resource does not exist, etc.), used for log classification.
    ///
    /// Level `warn` should be used when returning `true` and level `error` when returning `false`.
    /// **Please update this method simultaneously when new variants are added.**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::ScopeNotFound(_)
            | Self::InvalidScope { .. }
            | Self::MalformedId(_)
            | Self::ZoneNotFound(_)
            | Self::CommitConflict { .. } => true,
            Self::Zone(e) => e.is_expected(),
            Self::Repository(e) => e.is_expected(),
            Self::InvalidConfig(_) => false,
        }
    }
}

impl From<RepositoryError> for CoreError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { path } => Self::ZoneNotFound(path),
            other => Self::Repository(other),
        }
    }
}

impl From<ValidationError> for CoreError {
    fn from(err: ValidationError) -> Self {
        Self::Zone(ZoneError::from(err))
    }
}

/// Core layer Result type alias
pub type CoreResult<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_to_zone_not_found() {
        let err: CoreError = RepositoryError::NotFound {
            path: "zones/unit.tests.yaml".into(),
        }
        .into();
        assert!(matches!(err, CoreError::ZoneNotFound(ref p) if p == "zones/unit.tests.yaml"));
        assert!(err.is_expected());
    }

    #[test]
    fn fatal_repository_error_is_unexpected() {
        let err: CoreError = RepositoryError::Fatal {
            detail: "disk full".into(),
        }
        .into();
        assert!(!err.is_expected());
        assert_eq!(err.to_string(), "Repository failure: disk full");
    }

    #[test]
    fn zone_errors_keep_their_classification() {
        let err: CoreError = ZoneError::SubdomainNotFound {
            name: "www".into(),
        }
        .into();
        assert!(err.is_expected());

        let err: CoreError = ZoneError::Structural {
            location: "www".into(),
            detail: "content is a scalar".into(),
        }
        .into();
        assert!(!err.is_expected());
    }

    #[test]
    fn serializes_with_code_tag() {
        let err = CoreError::ScopeNotFound("internal".into());
        let json = serde_json::to_value(&err).unwrap_or_default();
        assert_eq!(json["code"], "ScopeNotFound");
        assert_eq!(json["details"], "internal");
    }
}
