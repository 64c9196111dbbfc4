//! Supported record types

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ZoneError;

/// DNS record type of a zone entry.
///
/// Serialized as uppercase strings (`"A"`, `"AAAA"`, `"CNAME"`, etc.),
/// which is also how the `type` field of a record entry is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecordType {
    /// IPv4 address record.
    A,
    /// IPv6 address record.
    Aaaa,
    /// Canonical name (alias) record.
    Cname,
    /// Delegation name record.
    Dname,
    /// Pointer record.
    Ptr,
    /// Name server record.
    Ns,
    /// Text record.
    Txt,
    /// Sender policy framework record.
    Spf,
    /// Mail exchange record.
    Mx,
    /// Service locator record.
    Srv,
    /// Certificate Authority Authorization record.
    Caa,
    /// SSH public key fingerprint record.
    Sshfp,
    /// Naming authority pointer record.
    Naptr,
    /// URL forwarding pseudo-record.
    Urlfwd,
    /// Geographic location record.
    Loc,
}

impl RecordType {
    /// Every supported type, in table order.
    pub const ALL: [Self; 15] = [
        Self::A,
        Self::Aaaa,
        Self::Cname,
        Self::Dname,
        Self::Ptr,
        Self::Ns,
        Self::Txt,
        Self::Spf,
        Self::Mx,
        Self::Srv,
        Self::Caa,
        Self::Sshfp,
        Self::Naptr,
        Self::Urlfwd,
        Self::Loc,
    ];

    /// The uppercase type code used in documents.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::Aaaa => "AAAA",
            Self::Cname => "CNAME",
            Self::Dname => "DNAME",
            Self::Ptr => "PTR",
            Self::Ns => "NS",
            Self::Txt => "TXT",
            Self::Spf => "SPF",
            Self::Mx => "MX",
            Self::Srv => "SRV",
            Self::Caa => "CAA",
            Self::Sshfp => "SSHFP",
            Self::Naptr => "NAPTR",
            Self::Urlfwd => "URLFWD",
            Self::Loc => "LOC",
        }
    }

    /// Whether values of this type have several named components and are
    /// written as mappings rather than bare scalars.
    pub fn is_compound(self) -> bool {
        matches!(
            self,
            Self::Mx | Self::Srv | Self::Caa | Self::Sshfp | Self::Naptr | Self::Urlfwd | Self::Loc
        )
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordType {
    type Err = ZoneError;

    /// Case-insensitive, surrounding whitespace ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(code))
            .ok_or_else(|| ZoneError::UnknownRecordType {
                input: s.to_string(),
            })
    }
}
