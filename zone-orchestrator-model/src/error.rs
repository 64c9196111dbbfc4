//! Error types for zone document editing and value decoding

use serde::Serialize;
use thiserror::Error;

use crate::rtype::RecordType;

/// A presentation-format value was rejected by its type's grammar.
///
/// Each variant names one rule and carries the offending input, so callers
/// can report exactly which part of the value is wrong.
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "rule")]
pub enum ValidationError {
    /// The value does not parse as an IPv4 address.
    #[error("'{input}' is not an IPv4 address")]
    NotAnIpv4 { input: String },

    /// The value does not parse as an IPv6 address.
    #[error("'{input}' is not an IPv6 address")]
    NotAnIpv6 { input: String },

    /// An IP literal appeared where only a host name is allowed.
    #[error("'{input}' is an IP address, a host name is required")]
    IpNotAllowed { input: String },

    /// A fully-qualified name lacks its terminating `.`.
    #[error("'{input}' must end with a trailing dot")]
    FqdnMissingTrailingDot { input: String },

    /// A host name carries a terminating `.` where none is allowed.
    #[error("'{input}' must not end with a trailing dot")]
    FqdnForbiddenTrailingDot { input: String },

    /// The value is not a syntactically valid host name.
    #[error("'{input}' is not a valid domain name")]
    NotAFqdn { input: String },

    /// A `;` in text data is not escaped as `\;`.
    #[error("'{input}' contains an unescaped ';'")]
    UnescapedSemicolon { input: String },

    /// SPF data does not start with `v=spf1`.
    #[error("'{input}' must start with 'v=spf1'")]
    SpfMissingVersion { input: String },

    /// SPF data does not end with an `all` mechanism.
    #[error("'{input}' must end with one of '-all', '~all', '+all'")]
    SpfMissingAllQualifier { input: String },

    /// The value does not have the shape of its type's grammar.
    #[error("'{input}' does not match '{expected}'")]
    Malformed {
        input: String,
        expected: &'static str,
    },

    /// A numeric slot holds something other than an unsigned integer.
    #[error("{field} '{input}' is not an integer")]
    NotAnInteger { field: &'static str, input: String },

    /// A numeric slot holds something other than a decimal number.
    #[error("{field} '{input}' is not a decimal number")]
    NotADecimal { field: &'static str, input: String },

    /// A decimal number carries more fractional digits than its slot keeps.
    #[error("{field} '{input}' has more than {max} decimal places")]
    TooManyDecimals {
        field: &'static str,
        input: String,
        max: usize,
    },

    /// A number lies outside the range its slot allows.
    #[error("{field} '{input}' is outside {min}..={max}")]
    OutOfRange {
        field: &'static str,
        input: String,
        min: f64,
        max: f64,
    },

    /// A slot holds a token outside its enumerated set.
    #[error("{field} '{input}' must be one of {allowed}")]
    InvalidChoice {
        field: &'static str,
        input: String,
        allowed: &'static str,
    },

    /// A CAA `iodef` value is not a `mailto:` URL.
    #[error("iodef value '{input}' must contain 'mailto:'")]
    CaaIodefNotMailto { input: String },

    /// A URLFWD path other than `/` ends with `/`.
    #[error("path '{input}' must not end with '/'")]
    UrlfwdPathTrailingSlash { input: String },
}

/// Zone document error type
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "code")]
pub enum ZoneError {
    /// No subdomain with this name exists in the document.
    #[error("Subdomain '{name}' not found")]
    SubdomainNotFound { name: String },

    /// A subdomain with this name already exists.
    #[error("Subdomain '{name}' already exists")]
    SubdomainExists { name: String },

    /// The subdomain has no entry of this record type.
    #[error("{record_type} record not found in subdomain '{subdomain}'")]
    TypeNotFound {
        subdomain: String,
        record_type: RecordType,
    },

    /// The subdomain already has an entry of this record type.
    #[error("{record_type} record already exists in subdomain '{subdomain}'")]
    TypeExists {
        subdomain: String,
        record_type: RecordType,
    },

    /// A record type name outside the supported set.
    #[error("Unknown record type: {input}")]
    UnknownRecordType { input: String },

    /// A value failed its type's grammar.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The document tree does not have the expected shape.
    #[error("Unsupported document shape at {location}: {detail}")]
    Structural { location: String, detail: String },

    /// A record could not be written to the document.
    #[error("Cannot encode {record_type} record: {detail}")]
    Encode {
        record_type: RecordType,
        detail: String,
    },

    /// The document bytes are not valid YAML.
    #[error("Failed to parse zone document: {detail}")]
    Parse { detail: String },

    /// The tree holds a node the emitter cannot write.
    #[error("Failed to emit zone document: {detail}")]
    Emit { detail: String },
}

impl ZoneError {
    /// Whether the error is caused by the caller (missing names, bad input)
    /// rather than by a broken document. Used to pick the log level.
    ///
    /// `true` should be logged at `warn`, `false` at `error`.
    #[must_use]
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            Self::SubdomainNotFound { .. }
                | Self::SubdomainExists { .. }
                | Self::TypeNotFound { .. }
                | Self::TypeExists { .. }
                | Self::UnknownRecordType { .. }
                | Self::Validation(_)
        )
    }

    pub(crate) fn structural(location: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::Structural {
            location: location.into(),
            detail: detail.into(),
        }
    }
}

/// Result alias for zone document operations
pub type Result<T> = std::result::Result<T, ZoneError>;
