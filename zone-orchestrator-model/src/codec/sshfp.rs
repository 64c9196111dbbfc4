use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::fields;
use super::validate;
use crate::error::ValidationError;

const GRAMMAR: &str = "algorithm fingerprint_type fingerprint";

/// SSHFP record value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SshfpValue {
    /// Public key algorithm number.
    pub algorithm: u8,
    /// Fingerprint hash type number.
    pub fingerprint_type: u8,
    /// Hex fingerprint, kept as written.
    pub fingerprint: String,
}

impl FromStr for SshfpValue {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let [algorithm, fingerprint_type, fingerprint] = fields(s, GRAMMAR)?;
        let max = u64::from(u8::MAX);
        let algorithm = validate::unsigned("algorithm", algorithm, 0, max)?;
        let fingerprint_type = validate::unsigned("fingerprint_type", fingerprint_type, 0, max)?;
        if fingerprint.contains(char::is_whitespace) {
            return Err(ValidationError::Malformed {
                input: s.to_string(),
                expected: GRAMMAR,
            });
        }
        Ok(Self {
            algorithm,
            fingerprint_type,
            fingerprint: fingerprint.to_string(),
        })
    }
}

impl fmt::Display for SshfpValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.algorithm, self.fingerprint_type, self.fingerprint
        )
    }
}
