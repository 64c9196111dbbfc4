use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::fields;
use crate::error::ValidationError;

const GRAMMAR: &str = "code masking path query target";

/// URLFWD pseudo-record value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlfwdValue {
    /// Redirect status: 0 (none), 301 or 302.
    pub code: u16,
    /// 0 (frame), 1 (mask), 2 (no masking).
    pub masking: u8,
    /// Source path; only `/` may end with a slash.
    pub path: String,
    /// Whether the query string is forwarded (0 or 1).
    pub query: u8,
    /// Destination URL.
    pub target: String,
}

fn choice<T: Copy>(
    field: &'static str,
    input: &str,
    allowed: &'static str,
    table: &[(&str, T)],
) -> Result<T, ValidationError> {
    table
        .iter()
        .find(|(token, _)| *token == input)
        .map(|(_, v)| *v)
        .ok_or_else(|| ValidationError::InvalidChoice {
            field,
            input: input.to_string(),
            allowed,
        })
}

impl FromStr for UrlfwdValue {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let [code, masking, path, query, target] = fields(s, GRAMMAR)?;
        let code = choice("code", code, "0, 301, 302", &[("0", 0), ("301", 301), ("302", 302)])?;
        let masking = choice("masking", masking, "0, 1, 2", &[("0", 0), ("1", 1), ("2", 2)])?;
        let query = choice("query", query, "0, 1", &[("0", 0), ("1", 1)])?;
        if path.len() > 1 && path.ends_with('/') {
            return Err(ValidationError::UrlfwdPathTrailingSlash {
                input: path.to_string(),
            });
        }
        Ok(Self {
            code,
            masking,
            path: path.to_string(),
            query,
            target: target.to_string(),
        })
    }
}

impl fmt::Display for UrlfwdValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {}",
            self.code, self.masking, self.path, self.query, self.target
        )
    }
}
