//! Record values and their YAML projection
//!
//! Simple types are written as bare scalars. Compound types are written as
//! mappings with alphabetically ordered keys, the way octoDNS dumps them:
//!
//! ```yaml
//! values:
//!   - exchange: mx1.unit.tests.
//!     preference: 10
//! ```
//!
//! A compound type written as a scalar (`value: 10 mx1.unit.tests.`) is read
//! through its presentation-format codec.

use std::fmt;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_yaml::{Mapping, Value};

pub use crate::codec::{
    CaaTag, CaaValue, LatDirection, LocValue, LongDirection, MxValue, NaptrValue, SrvValue,
    SshfpValue, UrlfwdValue,
};

use crate::codec;
use crate::error::{Result, ZoneError};
use crate::rtype::RecordType;

/// One value of a record.
///
/// The variant always matches the owning record's type: [`Text`] for the
/// simple types, the dedicated struct for compound ones.
///
/// [`Text`]: RecordValue::Text
#[derive(Debug, Clone, PartialEq)]
pub enum RecordValue {
    /// A, AAAA, CNAME, DNAME, PTR, NS, TXT and SPF data.
    Text(String),
    Mx(MxValue),
    Srv(SrvValue),
    Caa(CaaValue),
    Sshfp(SshfpValue),
    Naptr(NaptrValue),
    Urlfwd(UrlfwdValue),
    Loc(LocValue),
}

impl RecordValue {
    /// Whether this value has the shape records of `rtype` hold.
    pub fn fits(&self, rtype: RecordType) -> bool {
        match self {
            Self::Text(_) => !rtype.is_compound(),
            Self::Mx(_) => rtype == RecordType::Mx,
            Self::Srv(_) => rtype == RecordType::Srv,
            Self::Caa(_) => rtype == RecordType::Caa,
            Self::Sshfp(_) => rtype == RecordType::Sshfp,
            Self::Naptr(_) => rtype == RecordType::Naptr,
            Self::Urlfwd(_) => rtype == RecordType::Urlfwd,
            Self::Loc(_) => rtype == RecordType::Loc,
        }
    }

    /// Project into a document node.
    pub(crate) fn to_node(&self) -> std::result::Result<Value, serde_yaml::Error> {
        match self {
            Self::Text(text) => Ok(Value::String(text.clone())),
            Self::Mx(v) => compound_node(v),
            Self::Srv(v) => compound_node(v),
            Self::Caa(v) => compound_node(v),
            Self::Sshfp(v) => compound_node(v),
            Self::Naptr(v) => compound_node(v),
            Self::Urlfwd(v) => compound_node(v),
            Self::Loc(v) => compound_node(v),
        }
    }

    /// Read one value node of a `rtype` record. `location` names the record
    /// in error messages.
    pub(crate) fn from_node(rtype: RecordType, node: &Value, location: &str) -> Result<Self> {
        if let Some(text) = scalar_text(node) {
            return if rtype.is_compound() {
                Ok(codec::decode(rtype, &text)?)
            } else {
                Ok(Self::Text(text))
            };
        }
        let Value::Mapping(_) = node else {
            return Err(ZoneError::structural(
                location,
                format!("{rtype} value must be a scalar or a mapping"),
            ));
        };
        let value = match rtype {
            RecordType::Mx => Self::Mx(compound(node, location)?),
            RecordType::Srv => Self::Srv(compound(node, location)?),
            RecordType::Caa => Self::Caa(compound(node, location)?),
            RecordType::Sshfp => Self::Sshfp(compound(node, location)?),
            RecordType::Naptr => Self::Naptr(compound(node, location)?),
            RecordType::Urlfwd => Self::Urlfwd(compound(node, location)?),
            RecordType::Loc => Self::Loc(compound(node, location)?),
            _ => {
                return Err(ZoneError::structural(
                    location,
                    format!("{rtype} value must be a scalar"),
                ));
            }
        };
        Ok(value)
    }
}

impl fmt::Display for RecordValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Mx(v) => fmt::Display::fmt(v, f),
            Self::Srv(v) => fmt::Display::fmt(v, f),
            Self::Caa(v) => fmt::Display::fmt(v, f),
            Self::Sshfp(v) => fmt::Display::fmt(v, f),
            Self::Naptr(v) => fmt::Display::fmt(v, f),
            Self::Urlfwd(v) => fmt::Display::fmt(v, f),
            Self::Loc(v) => fmt::Display::fmt(v, f),
        }
    }
}

/// Text of a scalar node. Numbers and booleans count: `value: 42` in a TXT
/// record is the text `42`.
fn scalar_text(node: &Value) -> Option<String> {
    match node {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn compound<T: DeserializeOwned>(node: &Value, location: &str) -> Result<T> {
    serde_yaml::from_value(node.clone())
        .map_err(|e| ZoneError::structural(location, format!("invalid value: {e}")))
}

fn compound_node<T: Serialize>(value: &T) -> std::result::Result<Value, serde_yaml::Error> {
    match serde_yaml::to_value(value)? {
        Value::Mapping(fields) => Ok(Value::Mapping(sorted(fields))),
        other => Ok(other),
    }
}

/// Reorder keys alphabetically.
pub(crate) fn sorted(fields: Mapping) -> Mapping {
    let mut entries: Vec<(Value, Value)> = fields.into_iter().collect();
    entries.sort_by(|(a, _), (b, _)| a.as_str().cmp(&b.as_str()));
    entries.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(yaml: &str) -> Value {
        serde_yaml::from_str(yaml).unwrap_or_default()
    }

    #[test]
    fn simple_value_is_a_bare_scalar() {
        let value = RecordValue::Text("1.2.3.4".into());
        assert_eq!(value.to_node().ok(), Some(Value::String("1.2.3.4".into())));
    }

    #[test]
    fn compound_value_keys_are_alphabetical() {
        let value = RecordValue::Srv(SrvValue {
            priority: 10,
            weight: 20,
            port: 30,
            target: "foo-1.unit.tests.".into(),
        });
        let res = value.to_node();
        assert!(res.is_ok(), "{res:?}");
        let Ok(Value::Mapping(fields)) = res else { return };
        let keys: Vec<_> = fields.iter().filter_map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, ["port", "priority", "target", "weight"]);
    }

    #[test]
    fn loc_omits_absent_components() {
        let res = codec::decode(RecordType::Loc, "53 N 2 W 20.00");
        assert!(res.is_ok(), "{res:?}");
        let Ok(value) = res else { return };
        let Ok(Value::Mapping(fields)) = value.to_node() else {
            return;
        };
        assert!(!fields.contains_key("lat_minutes"));
        assert!(!fields.contains_key("size"));
        assert_eq!(fields.get("lat_direction"), Some(&Value::String("N".into())));
    }

    #[test]
    fn reads_mapping_and_scalar_forms() {
        let mapping = node("exchange: mx.unit.tests.\npreference: 10\n");
        let scalar = Value::String("10 mx.unit.tests.".into());
        let a = RecordValue::from_node(RecordType::Mx, &mapping, "mx");
        let b = RecordValue::from_node(RecordType::Mx, &scalar, "mx");
        assert!(a.is_ok(), "{a:?}");
        assert_eq!(a, b);
    }

    #[test]
    fn scalar_compound_goes_through_codec() {
        let scalar = Value::String("129 issue ca.unit.tests".into());
        let res = RecordValue::from_node(RecordType::Caa, &scalar, "caa");
        assert!(
            matches!(res, Err(ZoneError::Validation(_))),
            "expected validation error, got {res:?}"
        );
    }

    #[test]
    fn mapping_with_wrong_fields_is_structural() {
        let mapping = node("exchange: mx.unit.tests.\n");
        let res = RecordValue::from_node(RecordType::Mx, &mapping, "mx");
        assert!(matches!(res, Err(ZoneError::Structural { .. })), "{res:?}");

        let mapping = node("address: 1.2.3.4\n");
        let res = RecordValue::from_node(RecordType::A, &mapping, "www");
        assert!(matches!(res, Err(ZoneError::Structural { .. })), "{res:?}");
    }

    #[test]
    fn numeric_scalars_read_as_text() {
        let res = RecordValue::from_node(RecordType::Txt, &node("42"), "txt");
        assert_eq!(res, Ok(RecordValue::Text("42".into())));
    }

    #[test]
    fn fits_matches_owning_type() {
        let text = RecordValue::Text("unit.tests.".into());
        assert!(text.fits(RecordType::Cname));
        assert!(!text.fits(RecordType::Mx));
    }
}
