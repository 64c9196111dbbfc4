//! Scope routing
//!
//! A scope maps zone names to files inside the repository: scope `internal`
//! with path `zones/internal` puts zone `unit.tests` at
//! `zones/internal/unit.tests.yaml`.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::types::ZoneLocation;

/// Scope used when a request names none
pub const DEFAULT_SCOPE: &str = "default";

/// Zone file extension used when a scope sets none
pub const DEFAULT_EXTENSION: &str = "yaml";

/// Branch used when neither the scope nor the gateway sets one
pub const DEFAULT_BRANCH: &str = "main";

/// One registered scope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scope {
    /// Directory of the zone files, relative to the repository root
    pub path: String,
    /// Branch override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    /// File extension without the dot
    pub extension: String,
}

impl Scope {
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            branch: None,
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }
}

/// Registry of scopes, keyed by name
#[derive(Debug, Clone)]
pub struct ScopeRegistry {
    scopes: HashMap<String, Scope>,
    default_branch: String,
}

fn scope_name(name: &str) -> &str {
    if name.is_empty() { DEFAULT_SCOPE } else { name }
}

impl ScopeRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new(default_branch: impl Into<String>) -> Self {
        Self {
            scopes: HashMap::new(),
            default_branch: default_branch.into(),
        }
    }

    fn validate(name: &str, scope: &Scope) -> CoreResult<()> {
        let invalid = |reason: &str| CoreError::InvalidScope {
            name: name.to_string(),
            reason: reason.to_string(),
        };
        if scope.path.starts_with('/') || scope.path.ends_with('/') {
            return Err(invalid("path must not start or end with '/'"));
        }
        if scope.extension.is_empty() || scope.extension.starts_with('.') {
            return Err(invalid("extension must be non-empty and without a leading '.'"));
        }
        Ok(())
    }

    /// Register a new scope
    ///
    /// # Arguments
    /// * `name` - Scope name; empty names the default scope
    /// * `scope` - Path, branch and extension
    pub fn add_scope(&mut self, name: &str, scope: Scope) -> CoreResult<()> {
        let name = scope_name(name);
        if self.scopes.contains_key(name) {
            return Err(CoreError::InvalidScope {
                name: name.to_string(),
                reason: "scope is already defined".to_string(),
            });
        }
        self.set_scope(name, scope)
    }

    /// Register or replace a scope
    pub fn set_scope(&mut self, name: &str, scope: Scope) -> CoreResult<()> {
        let name = scope_name(name);
        Self::validate(name, &scope)?;
        log::debug!("Registered scope '{name}' at '{}'", scope.path);
        self.scopes.insert(name.to_string(), scope);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Scope> {
        self.scopes.get(scope_name(name))
    }

    /// Registered scope names, sorted
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.scopes.keys().cloned().collect();
        names.sort();
        names
    }

    /// Resolve the zone file of `zone` in `scope`
    pub fn resolve(&self, scope: &str, zone: &str) -> CoreResult<ZoneLocation> {
        let name = scope_name(scope);
        let entry = self
            .scopes
            .get(name)
            .ok_or_else(|| CoreError::ScopeNotFound(name.to_string()))?;
        let file_name = format!("{zone}.{}", entry.extension);
        let file_path = if entry.path.is_empty() {
            file_name
        } else {
            format!("{}/{file_name}", entry.path)
        };
        let branch = entry
            .branch
            .clone()
            .unwrap_or_else(|| self.default_branch.clone());
        Ok(ZoneLocation { file_path, branch })
    }
}

impl Default for ScopeRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_BRANCH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_path_and_branch() {
        let mut registry = ScopeRegistry::new("main");
        assert!(registry.add_scope("", Scope::new("")).is_ok());
        let mut internal = Scope::new("zones/internal");
        internal.branch = Some("staging".into());
        internal.extension = "yml".into();
        assert!(registry.add_scope("internal", internal).is_ok());

        let res = registry.resolve("", "unit.tests");
        assert_eq!(res.ok(), Some(ZoneLocation::new("unit.tests.yaml", "main")));

        let res = registry.resolve("internal", "unit.tests");
        assert_eq!(
            res.ok(),
            Some(ZoneLocation::new("zones/internal/unit.tests.yml", "staging"))
        );
    }

    #[test]
    fn unknown_scope_is_not_found() {
        let registry = ScopeRegistry::default();
        let res = registry.resolve("nope", "unit.tests");
        assert!(matches!(res, Err(CoreError::ScopeNotFound(ref s)) if s == "nope"));
    }

    #[test]
    fn add_rejects_duplicates_but_set_overwrites() {
        let mut registry = ScopeRegistry::default();
        assert!(registry.add_scope("default", Scope::new("a")).is_ok());
        assert!(matches!(
            registry.add_scope("", Scope::new("b")),
            Err(CoreError::InvalidScope { .. })
        ));
        assert!(registry.set_scope("", Scope::new("b")).is_ok());
        assert_eq!(registry.get(DEFAULT_SCOPE).map(|s| s.path.as_str()), Some("b"));
    }

    #[test]
    fn rejects_slash_delimited_paths() {
        let mut registry = ScopeRegistry::default();
        for path in ["/zones", "zones/"] {
            assert!(
                matches!(
                    registry.add_scope("x", Scope::new(path)),
                    Err(CoreError::InvalidScope { .. })
                ),
                "{path}"
            );
        }
    }
}
