//! Record entity
//!
//! A [`Record`] is the decoded form of one record-type entry of a
//! subdomain. It holds no reference into the document: it carries a
//! [`RecordLocator`] and resolves its entry again on every
//! [`write_back`](Record::write_back).

use std::fmt;

use serde_yaml::{Mapping, Value};

use crate::codec;
use crate::error::{Result, ValidationError, ZoneError};
use crate::extension::Extension;
use crate::rtype::RecordType;
use crate::value::RecordValue;
use crate::yaml::node;
use crate::zone::{APEX_MARKER, Zone};

/// Where a record lives: subdomain name (apex as `""`) and type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordLocator {
    pub subdomain: String,
    pub record_type: RecordType,
}

impl RecordLocator {
    pub fn new(subdomain: impl Into<String>, record_type: RecordType) -> Self {
        Self {
            subdomain: subdomain.into(),
            record_type,
        }
    }
}

impl fmt::Display for RecordLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = if self.subdomain.is_empty() {
            APEX_MARKER
        } else {
            &self.subdomain
        };
        write!(f, "{name}/{}", self.record_type)
    }
}

/// A decoded record: type, TTL, ordered values and extension metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    record_type: RecordType,
    ttl: Option<u32>,
    values: Vec<RecordValue>,
    extension: Extension,
    locator: Option<RecordLocator>,
    deleted: bool,
}

impl Record {
    /// A record not bound to any document.
    pub fn new(record_type: RecordType) -> Self {
        Self {
            record_type,
            ttl: None,
            values: Vec::new(),
            extension: Extension::default(),
            locator: None,
            deleted: false,
        }
    }

    /// An empty record bound to `locator`.
    pub(crate) fn attached(locator: RecordLocator) -> Self {
        Self {
            locator: Some(locator.clone()),
            ..Self::new(locator.record_type)
        }
    }

    /// Decode a record entry.
    ///
    /// `value` wins over `values` when both are present. An entry with
    /// neither is a structural error.
    pub(crate) fn decode(locator: RecordLocator, entry: &Mapping) -> Result<Self> {
        let location = locator.to_string();
        let rtype = locator.record_type;

        let ttl = match entry.get("ttl") {
            None | Some(Value::Null) => None,
            Some(Value::Number(n)) => {
                let ttl = n
                    .as_u64()
                    .and_then(|t| u32::try_from(t).ok())
                    .ok_or_else(|| {
                        ZoneError::structural(&location, format!("ttl {n} is not a valid TTL"))
                    })?;
                (ttl > 0).then_some(ttl)
            }
            Some(_) => {
                return Err(ZoneError::structural(&location, "ttl must be an integer"));
            }
        };

        let values = match (entry.get("value").filter(|v| !v.is_null()), entry.get("values")) {
            (Some(value), _) => vec![RecordValue::from_node(rtype, value, &location)?],
            (None, Some(Value::Sequence(items))) => items
                .iter()
                .map(|item| RecordValue::from_node(rtype, item, &location))
                .collect::<Result<Vec<_>>>()?,
            (None, None | Some(Value::Null)) => {
                return Err(ZoneError::structural(
                    &location,
                    "entry has neither 'value' nor 'values'",
                ));
            }
            (None, Some(_)) => {
                return Err(ZoneError::structural(&location, "'values' must be a sequence"));
            }
        };

        let extension = Extension::from_entry(entry, &location)?;

        Ok(Self {
            record_type: rtype,
            ttl,
            values,
            extension,
            locator: Some(locator),
            deleted: false,
        })
    }

    pub fn record_type(&self) -> RecordType {
        self.record_type
    }

    pub fn ttl(&self) -> Option<u32> {
        self.ttl
    }

    /// Set the TTL. `None` and `Some(0)` both leave the entry without one.
    pub fn set_ttl(&mut self, ttl: Option<u32>) {
        self.ttl = ttl.filter(|t| *t > 0);
    }

    pub fn values(&self) -> &[RecordValue] {
        &self.values
    }

    pub fn extension(&self) -> &Extension {
        &self.extension
    }

    pub fn extension_mut(&mut self) -> &mut Extension {
        &mut self.extension
    }

    pub fn set_extension(&mut self, extension: Extension) {
        self.extension = extension;
    }

    /// The entry this record writes to, if it is bound to a document.
    pub fn locator(&self) -> Option<&RecordLocator> {
        self.locator.as_ref()
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted
    }

    /// Values in presentation format, in order.
    pub fn values_as_text(&self) -> Vec<String> {
        self.values.iter().map(codec::encode).collect()
    }

    /// Decode `text` for this record's type and append it.
    pub fn add_value_from_text(&mut self, text: &str) -> std::result::Result<(), ValidationError> {
        let value = codec::decode(self.record_type, text)?;
        self.values.push(value);
        Ok(())
    }

    pub fn clear_values(&mut self) {
        self.values.clear();
    }

    /// Replace every value. On a validation failure the current values are
    /// kept.
    pub fn set_values_from_text<I, S>(&mut self, texts: I) -> std::result::Result<(), ValidationError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let values = texts
            .into_iter()
            .map(|text| codec::decode(self.record_type, text.as_ref()))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        self.values = values;
        Ok(())
    }

    /// Write type, TTL, values and extension into the backing entry.
    ///
    /// Only fields whose value changed are touched, so an unmodified record
    /// leaves the document byte-identical. A deleted record writes nothing.
    pub fn write_back(&self, zone: &mut Zone) -> Result<()> {
        if self.deleted {
            return Ok(());
        }
        let Some(locator) = &self.locator else {
            return Err(self.encode_error("record is not attached to a document"));
        };
        if self.values.is_empty() {
            return Err(self.encode_error("a record needs at least one value"));
        }
        if let Some(value) = self.values.iter().find(|v| !v.fits(self.record_type)) {
            return Err(self.encode_error(format!("value '{value}' has the wrong shape")));
        }

        let mut nodes = self
            .values
            .iter()
            .map(RecordValue::to_node)
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| self.encode_error(e.to_string()))?;

        let entry = zone.record_entry_mut(locator)?;
        node::set_field(
            entry,
            "type",
            Some(Value::String(self.record_type.as_str().to_string())),
        );
        node::set_field(entry, "ttl", self.ttl.map(|t| Value::Number(t.into())));

        let keeps_list = !entry.contains_key("value")
            && entry
                .get("values")
                .and_then(Value::as_sequence)
                .is_some_and(|items| items.len() == 1);
        if nodes.len() == 1 && !keeps_list {
            node::set_field(entry, "value", nodes.pop());
            node::set_field(entry, "values", None);
        } else {
            node::set_field(entry, "values", Some(Value::Sequence(nodes)));
            node::set_field(entry, "value", None);
        }

        self.extension
            .merge_into(entry)
            .map_err(|e| self.encode_error(e.to_string()))?;
        log::debug!("Wrote back record {locator}");
        Ok(())
    }

    /// Remove this record's entry from the document and mark it deleted.
    pub fn delete(&mut self, zone: &mut Zone) -> Result<()> {
        let Some(locator) = &self.locator else {
            return Err(self.encode_error("record is not attached to a document"));
        };
        zone.remove_entry(locator)?;
        self.deleted = true;
        Ok(())
    }

    fn encode_error(&self, detail: impl Into<String>) -> ZoneError {
        ZoneError::Encode {
            record_type: self.record_type,
            detail: detail.into(),
        }
    }
}
