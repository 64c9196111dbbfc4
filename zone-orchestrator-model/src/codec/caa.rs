use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::fields;
use super::validate::{self, TrailingDot};
use crate::error::ValidationError;

const GRAMMAR: &str = "flags tag value";
const MAX_FLAGS: u64 = 128;

/// Issuer host with an optional validation-method policy.
static ISSUER: LazyLock<Regex> =
    LazyLock::new(|| validate::compile(r"^(.+?)(?:; policy=(?:dv|ev|cv))?$"));

/// CAA property tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaaTag {
    /// Authorizes a CA to issue certificates.
    Issue,
    /// Authorizes a CA to issue wildcard certificates.
    IssueWild,
    /// Where to report policy violations.
    Iodef,
}

impl CaaTag {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Issue => "issue",
            Self::IssueWild => "issuewild",
            Self::Iodef => "iodef",
        }
    }
}

impl FromStr for CaaTag {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "issue" => Ok(Self::Issue),
            "issuewild" => Ok(Self::IssueWild),
            "iodef" => Ok(Self::Iodef),
            _ => Err(ValidationError::InvalidChoice {
                field: "tag",
                input: s.to_string(),
                allowed: "issue, issuewild, iodef",
            }),
        }
    }
}

impl fmt::Display for CaaTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// CAA record value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaaValue {
    /// Issuer critical flag (0..=128).
    pub flags: u8,
    /// Property tag.
    pub tag: CaaTag,
    /// Property value: issuer host (with optional policy) or `mailto:` URL.
    pub value: String,
}

impl FromStr for CaaValue {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let [flags, tag, value] = fields(s, GRAMMAR)?;
        let flags = validate::unsigned("flags", flags, 0, MAX_FLAGS)?;
        let tag: CaaTag = tag.parse()?;
        check_value(tag, value)?;
        Ok(Self {
            flags,
            tag,
            value: value.to_string(),
        })
    }
}

fn check_value(tag: CaaTag, value: &str) -> Result<(), ValidationError> {
    match tag {
        CaaTag::Iodef if value.contains("mailto:") => Ok(()),
        CaaTag::Iodef => Err(ValidationError::CaaIodefNotMailto {
            input: value.to_string(),
        }),
        CaaTag::Issue | CaaTag::IssueWild => {
            let host = ISSUER
                .captures(value)
                .and_then(|c| c.get(1))
                .map_or(value, |m| m.as_str());
            validate::fqdn(host, TrailingDot::Forbidden)
        }
    }
}

impl fmt::Display for CaaValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.flags, self.tag, self.value)
    }
}
