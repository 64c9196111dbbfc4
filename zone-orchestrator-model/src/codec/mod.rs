//! Presentation-format codecs
//!
//! [`decode`] turns the short text form of a value (`"10 mail.unit.tests."`
//! for MX) into a [`RecordValue`], rejecting anything that breaks the
//! type's grammar with a specific [`ValidationError`]. [`encode`] is its
//! exact inverse on canonical text:
//!
//! ```
//! use zone_orchestrator_model::{decode, encode, RecordType};
//!
//! let value = decode(RecordType::Mx, "10 mail.unit.tests.").unwrap();
//! assert_eq!(encode(&value), "10 mail.unit.tests.");
//! ```

pub(crate) mod validate;

mod caa;
mod loc;
mod mx;
mod naptr;
mod srv;
mod sshfp;
mod urlfwd;

pub use caa::{CaaTag, CaaValue};
pub use loc::{LatDirection, LocValue, LongDirection};
pub use mx::MxValue;
pub use naptr::NaptrValue;
pub use srv::SrvValue;
pub use sshfp::SshfpValue;
pub use urlfwd::UrlfwdValue;

use crate::error::ValidationError;
use crate::rtype::RecordType;
use crate::value::RecordValue;

use self::validate::TrailingDot;

/// Decode presentation-format text for `rtype`.
pub fn decode(rtype: RecordType, text: &str) -> Result<RecordValue, ValidationError> {
    let value = match rtype {
        RecordType::A => {
            validate::ipv4(text)?;
            RecordValue::Text(text.to_string())
        }
        RecordType::Aaaa => {
            validate::ipv6(text)?;
            RecordValue::Text(text.to_string())
        }
        RecordType::Cname | RecordType::Dname | RecordType::Ptr => {
            validate::fqdn(text, TrailingDot::Required)?;
            RecordValue::Text(text.to_string())
        }
        RecordType::Ns => {
            validate::ip_or_fqdn(text)?;
            RecordValue::Text(text.to_string())
        }
        RecordType::Txt => {
            validate::escaped_text(text)?;
            RecordValue::Text(text.to_string())
        }
        RecordType::Spf => {
            validate::spf(text)?;
            RecordValue::Text(text.to_string())
        }
        RecordType::Mx => RecordValue::Mx(text.parse()?),
        RecordType::Srv => RecordValue::Srv(text.parse()?),
        RecordType::Caa => RecordValue::Caa(text.parse()?),
        RecordType::Sshfp => RecordValue::Sshfp(text.parse()?),
        RecordType::Naptr => RecordValue::Naptr(text.parse()?),
        RecordType::Urlfwd => RecordValue::Urlfwd(text.parse()?),
        RecordType::Loc => RecordValue::Loc(text.parse()?),
    };
    Ok(value)
}

/// Encode a value back to its presentation format.
pub fn encode(value: &RecordValue) -> String {
    value.to_string()
}

/// Split `input` into exactly `N` single-space separated fields; the last
/// field keeps any remaining spaces.
pub(crate) fn fields<'a, const N: usize>(
    input: &'a str,
    expected: &'static str,
) -> Result<[&'a str; N], ValidationError> {
    let mut out = [""; N];
    let mut parts = input.splitn(N, ' ');
    for slot in &mut out {
        match parts.next() {
            Some(part) if !part.is_empty() => *slot = part,
            _ => {
                return Err(ValidationError::Malformed {
                    input: input.to_string(),
                    expected,
                });
            }
        }
    }
    Ok(out)
}
