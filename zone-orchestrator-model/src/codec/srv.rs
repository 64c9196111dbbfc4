use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::fields;
use super::validate;
use crate::error::ValidationError;

const GRAMMAR: &str = "priority weight port target";

/// SRV record value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SrvValue {
    /// Priority (lower = preferred).
    pub priority: u16,
    /// Weight for load balancing among same-priority targets.
    pub weight: u16,
    /// TCP/UDP port number.
    pub port: u16,
    /// Target host: an IP or a dot-terminated name.
    pub target: String,
}

impl FromStr for SrvValue {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let [priority, weight, port, target] = fields(s, GRAMMAR)?;
        let max = u64::from(u16::MAX);
        let priority = validate::unsigned("priority", priority, 0, max)?;
        let weight = validate::unsigned("weight", weight, 0, max)?;
        let port = validate::unsigned("port", port, 0, max)?;
        validate::ip_or_fqdn(target)?;
        Ok(Self {
            priority,
            weight,
            port,
            target: target.to_string(),
        })
    }
}

impl fmt::Display for SrvValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.priority, self.weight, self.port, self.target
        )
    }
}
