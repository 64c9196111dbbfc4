use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::fields;
use super::validate::{self, TrailingDot};
use crate::error::ValidationError;

const GRAMMAR: &str = "preference exchange";

/// MX record value.
///
/// The legacy `{priority, value}` shape is accepted when reading a document
/// and written back as `{exchange, preference}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MxValue {
    /// Preference (lower = preferred).
    #[serde(alias = "priority")]
    pub preference: u16,
    /// Mail server name, dot-terminated.
    #[serde(alias = "value")]
    pub exchange: String,
}

impl FromStr for MxValue {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let [preference, exchange] = fields(s, GRAMMAR)?;
        let preference = validate::unsigned("preference", preference, 0, u64::from(u16::MAX))?;
        validate::fqdn(exchange, TrailingDot::Required)?;
        Ok(Self {
            preference,
            exchange: exchange.to_string(),
        })
    }
}

impl fmt::Display for MxValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.preference, self.exchange)
    }
}
