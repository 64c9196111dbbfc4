//! Resource identifiers handed out to adapters

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Identifies one subdomain of one zone: `"{scope} {zone} {name}"`.
///
/// Zone, scope and subdomain names never contain spaces, so the id splits
/// back unambiguously.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceId {
    pub scope: String,
    pub zone: String,
    pub name: String,
}

impl ResourceId {
    #[must_use]
    pub fn new(
        scope: impl Into<String>,
        zone: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            scope: scope.into(),
            zone: zone.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.scope, self.zone, self.name)
    }
}

impl FromStr for ResourceId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(' ').collect();
        let [scope, zone, name] = parts.as_slice() else {
            return Err(CoreError::MalformedId(s.to_string()));
        };
        Ok(Self::new(*scope, *zone, *name))
    }
}
