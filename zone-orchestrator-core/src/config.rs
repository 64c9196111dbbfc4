//! Gateway configuration
//!
//! ```json
//! {
//!   "branch": "main",
//!   "author": { "name": "zone-bot", "email": "zone-bot@unit.tests" },
//!   "retryLimit": 5,
//!   "scopes": [
//!     { "path": "" },
//!     { "name": "internal", "path": "zones/internal", "branch": "staging" }
//!   ]
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::scope::{DEFAULT_BRANCH, DEFAULT_EXTENSION, DEFAULT_SCOPE, Scope, ScopeRegistry};
use crate::services::DEFAULT_RETRY_LIMIT;
use crate::types::CommitAuthor;

fn default_branch() -> String {
    DEFAULT_BRANCH.to_string()
}

fn default_retry_limit() -> u32 {
    DEFAULT_RETRY_LIMIT
}

/// Gateway configuration root
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayConfig {
    /// Branch for scopes without their own
    #[serde(default = "default_branch")]
    pub branch: String,
    #[serde(default)]
    pub author: CommitAuthor,
    /// Commit attempts before giving up on conflicts
    #[serde(default = "default_retry_limit")]
    pub retry_limit: u32,
    #[serde(default)]
    pub scopes: Vec<ScopeConfig>,
}

/// One scope entry of the configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScopeConfig {
    /// Empty names the default scope
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension: Option<String>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            branch: default_branch(),
            author: CommitAuthor::default(),
            retry_limit: default_retry_limit(),
            scopes: Vec::new(),
        }
    }
}

impl GatewayConfig {
    pub fn from_json(json: &str) -> CoreResult<Self> {
        serde_json::from_str(json).map_err(|e| CoreError::InvalidConfig(e.to_string()))
    }

    pub async fn from_file(path: impl AsRef<Path>) -> CoreResult<Self> {
        let path = path.as_ref();
        let json = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| CoreError::InvalidConfig(format!("{}: {e}", path.display())))?;
        Self::from_json(&json)
    }

    /// Build the scope registry. Without any configured scope, the default
    /// scope is registered at the repository root.
    pub fn scope_registry(&self) -> CoreResult<ScopeRegistry> {
        let mut registry = ScopeRegistry::new(self.branch.clone());
        if self.scopes.is_empty() {
            registry.add_scope(DEFAULT_SCOPE, Scope::new(""))?;
        }
        for entry in &self.scopes {
            let scope = Scope {
                path: entry.path.clone(),
                branch: entry.branch.clone(),
                extension: entry
                    .extension
                    .clone()
                    .unwrap_or_else(|| DEFAULT_EXTENSION.to_string()),
            };
            registry.add_scope(&entry.name, scope)?;
        }
        Ok(registry)
    }

    /// Configured author, `None` when empty
    #[must_use]
    pub fn commit_author(&self) -> Option<CommitAuthor> {
        (!self.author.is_empty()).then(|| self.author.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ZoneLocation;

    #[test]
    fn defaults_apply_to_empty_config() {
        let res = GatewayConfig::from_json("{}");
        assert!(res.is_ok(), "{res:?}");
        let Ok(config) = res else { return };
        assert_eq!(config, GatewayConfig::default());
        assert_eq!(config.commit_author(), None);

        let registry = config.scope_registry();
        assert!(registry.is_ok_and(|r| {
            r.resolve("", "unit.tests").ok() == Some(ZoneLocation::new("unit.tests.yaml", "main"))
        }));
    }

    #[test]
    fn reads_camel_case_fields() {
        let json = r#"{
            "branch": "trunk",
            "author": {"name": "zone-bot"},
            "retryLimit": 2,
            "scopes": [
                {"path": "zones"},
                {"name": "internal", "path": "zones/internal", "branch": "staging", "extension": "yml"}
            ]
        }"#;
        let res = GatewayConfig::from_json(json);
        assert!(res.is_ok(), "{res:?}");
        let Ok(config) = res else { return };
        assert_eq!(config.retry_limit, 2);
        assert_eq!(config.author.name.as_deref(), Some("zone-bot"));

        let res = config.scope_registry();
        assert!(res.is_ok(), "{res:?}");
        let Ok(registry) = res else { return };
        assert_eq!(registry.names(), ["default", "internal"]);
        assert_eq!(
            registry.resolve("default", "unit.tests").ok(),
            Some(ZoneLocation::new("zones/unit.tests.yaml", "trunk"))
        );
        assert_eq!(
            registry.resolve("internal", "unit.tests").ok(),
            Some(ZoneLocation::new("zones/internal/unit.tests.yml", "staging"))
        );
    }

    #[test]
    fn duplicate_scopes_are_rejected() {
        let config = GatewayConfig {
            scopes: vec![
                ScopeConfig {
                    name: String::new(),
                    path: "a".into(),
                    branch: None,
                    extension: None,
                },
                ScopeConfig {
                    name: "default".into(),
                    path: "b".into(),
                    branch: None,
                    extension: None,
                },
            ],
            ..GatewayConfig::default()
        };
        assert!(matches!(
            config.scope_registry(),
            Err(CoreError::InvalidScope { .. })
        ));
    }

    #[test]
    fn malformed_json_is_invalid_config() {
        assert!(matches!(
            GatewayConfig::from_json("{\"retryLimit\": \"many\"}"),
            Err(CoreError::InvalidConfig(_))
        ));
    }
}
