//! Subdomain view
//!
//! The content node of a subdomain is either a single record mapping or a
//! sequence of them. Every operation resolves the content node from the
//! zone again. Decoded records are memoized per type; a record addresses its
//! entry by subdomain and type, so memoized records, including edits not yet
//! written back, stay valid across promotion and removal of other types.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use serde_yaml::{Mapping, Value};

use crate::error::{Result, ZoneError};
use crate::record::{Record, RecordLocator};
use crate::rtype::RecordType;
use crate::zone::{Zone, display_name};

/// Position of one record entry inside a content node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Slot {
    /// The content node is itself the entry.
    Single,
    /// Index into the content sequence.
    Element(usize),
}

/// The record type named by an entry's `type` field, if it is supported.
fn entry_type(entry: &Mapping) -> Option<RecordType> {
    entry
        .get("type")
        .and_then(Value::as_str)
        .and_then(|code| code.parse().ok())
}

/// Every record entry of a content node. Any shape other than null, a
/// mapping, or a sequence of mappings is a structural error.
pub(crate) fn entries<'a>(content: &'a Value, location: &str) -> Result<Vec<(Slot, &'a Mapping)>> {
    match content {
        Value::Null => Ok(Vec::new()),
        Value::Mapping(m) if m.is_empty() => Ok(Vec::new()),
        Value::Mapping(m) => Ok(vec![(Slot::Single, m)]),
        Value::Sequence(items) => items
            .iter()
            .enumerate()
            .map(|(i, item)| match item {
                Value::Mapping(m) => Ok((Slot::Element(i), m)),
                _ => Err(ZoneError::structural(
                    location,
                    format!("sequence element {i} is not a mapping"),
                )),
            })
            .collect(),
        _ => Err(ZoneError::structural(
            location,
            "content is neither a mapping nor a sequence",
        )),
    }
}

/// Slot of the first entry of type `rtype`.
pub(crate) fn locate(content: &Value, location: &str, rtype: RecordType) -> Result<Option<Slot>> {
    Ok(entries(content, location)?
        .into_iter()
        .find(|(_, entry)| entry_type(entry) == Some(rtype))
        .map(|(slot, _)| slot))
}

pub(crate) fn entry_at(content: &Value, slot: Slot) -> Option<&Mapping> {
    match (slot, content) {
        (Slot::Single, Value::Mapping(m)) => Some(m),
        (Slot::Element(i), Value::Sequence(items)) => items.get(i).and_then(Value::as_mapping),
        _ => None,
    }
}

pub(crate) fn entry_at_mut(content: &mut Value, slot: Slot) -> Option<&mut Mapping> {
    match (slot, content) {
        (Slot::Single, Value::Mapping(m)) => Some(m),
        (Slot::Element(i), Value::Sequence(items)) => {
            items.get_mut(i).and_then(Value::as_mapping_mut)
        }
        _ => None,
    }
}

/// Remove the entry at `slot`. A content node that was the entry itself
/// becomes an empty sequence.
pub(crate) fn remove_at(content: &mut Value, slot: Slot) {
    match slot {
        Slot::Single => *content = Value::Sequence(Vec::new()),
        Slot::Element(i) => {
            if let Value::Sequence(items) = content {
                if i < items.len() {
                    items.remove(i);
                }
            }
        }
    }
}

/// Supported types present in a content node, in document order, without
/// repeats.
pub(crate) fn types_in(content: &Value, location: &str) -> Result<Vec<RecordType>> {
    let mut types = Vec::new();
    for (_, entry) in entries(content, location)? {
        if let Some(rtype) = entry_type(entry) {
            if !types.contains(&rtype) {
                types.push(rtype);
            }
        }
    }
    Ok(types)
}

/// Mutable view of one subdomain of a [`Zone`].
///
/// Obtained from [`Zone::find_subdomain`] or [`Zone::create_subdomain`].
/// The view borrows the zone mutably, so the tree cannot change behind it.
#[derive(Debug)]
pub struct Subdomain<'z> {
    zone: &'z mut Zone,
    name: String,
    cache: BTreeMap<RecordType, Record>,
}

impl<'z> Subdomain<'z> {
    pub(crate) fn new(zone: &'z mut Zone, name: String) -> Self {
        Self {
            zone,
            name,
            cache: BTreeMap::new(),
        }
    }

    /// Subdomain name; the apex is `""`.
    pub fn name(&self) -> &str {
        &self.name
    }

    fn location(&self) -> String {
        display_name(&self.name).to_string()
    }

    fn content(&self) -> Result<&Value> {
        self.zone
            .content(&self.name)
            .ok_or_else(|| ZoneError::SubdomainNotFound {
                name: self.name.clone(),
            })
    }

    fn type_not_found(&self, rtype: RecordType) -> ZoneError {
        ZoneError::TypeNotFound {
            subdomain: self.name.clone(),
            record_type: rtype,
        }
    }

    /// Types present, in document order, without decoding them.
    pub fn types(&self) -> Result<Vec<RecordType>> {
        types_in(self.content()?, &self.location())
    }

    /// Whether the content node holds no record entry at all.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(entries(self.content()?, &self.location())?.is_empty())
    }

    /// Decoded record of type `rtype`, decoded on first access.
    pub fn get_type(&mut self, rtype: RecordType) -> Result<&mut Record> {
        match self.cache.entry(rtype) {
            Entry::Occupied(cached) => Ok(cached.into_mut()),
            Entry::Vacant(slot) => {
                let record = self.zone.get_record(&self.name, rtype)?;
                Ok(slot.insert(record))
            }
        }
    }

    /// Decode every type present and return them in document order.
    pub fn find_all_types(&mut self) -> Result<Vec<RecordType>> {
        let types = self.types()?;
        for rtype in &types {
            self.get_type(*rtype)?;
        }
        Ok(types)
    }

    /// Add an entry for `rtype` and return its empty record.
    ///
    /// A content node holding a single mapping is first turned into a
    /// sequence whose first element is that mapping. The new entry is a
    /// bare `type` placeholder until the record is written back. Records
    /// decoded earlier through this view keep their unsaved edits and write
    /// back into the promoted sequence.
    pub fn create_type(&mut self, rtype: RecordType) -> Result<&mut Record> {
        let location = self.location();
        let name = self.name.clone();
        let content = self
            .zone
            .content_mut(&name)
            .ok_or_else(|| ZoneError::SubdomainNotFound { name: name.clone() })?;
        if locate(content, &location, rtype)?.is_some() {
            return Err(ZoneError::TypeExists {
                subdomain: name,
                record_type: rtype,
            });
        }

        let mut placeholder = Mapping::new();
        placeholder.insert(
            Value::String("type".to_string()),
            Value::String(rtype.as_str().to_string()),
        );
        let placeholder = Value::Mapping(placeholder);

        let promote = matches!(&*content, Value::Mapping(m) if !m.is_empty());
        if let Value::Sequence(items) = &mut *content {
            items.push(placeholder);
        } else if promote {
            log::debug!("Promoting subdomain '{location}' to a sequence of record entries");
            let original = std::mem::take(content);
            *content = Value::Sequence(vec![original, placeholder]);
        } else {
            *content = Value::Sequence(vec![placeholder]);
        }

        let record = Record::attached(RecordLocator::new(name, rtype));
        match self.cache.entry(rtype) {
            Entry::Occupied(mut stale) => {
                stale.insert(record);
                Ok(stale.into_mut())
            }
            Entry::Vacant(slot) => Ok(slot.insert(record)),
        }
    }

    /// Remove the entry for `rtype`. Other memoized records are kept.
    pub fn delete_type(&mut self, rtype: RecordType) -> Result<()> {
        let locator = RecordLocator::new(self.name.clone(), rtype);
        self.zone.remove_entry(&locator)?;
        self.cache.remove(&rtype);
        Ok(())
    }

    /// Write one decoded record back to the document.
    pub fn write_back(&mut self, rtype: RecordType) -> Result<()> {
        let Some(record) = self.cache.get(&rtype) else {
            return Err(self.type_not_found(rtype));
        };
        record.write_back(self.zone)
    }

    /// Write back every record decoded through this view.
    pub fn write_back_all(&mut self) -> Result<()> {
        for record in self.cache.values() {
            record.write_back(self.zone)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn content(yaml: &str) -> Value {
        serde_yaml::from_str(yaml).unwrap_or_default()
    }

    #[test]
    fn locates_single_and_sequence_entries() {
        let single = content("type: CNAME\nvalue: unit.tests.\n");
        assert_eq!(locate(&single, "www", RecordType::Cname), Ok(Some(Slot::Single)));
        assert_eq!(locate(&single, "www", RecordType::A), Ok(None));

        let many = content("- type: A\n  value: 1.2.3.4\n- type: TXT\n  value: x\n");
        assert_eq!(locate(&many, "www", RecordType::Txt), Ok(Some(Slot::Element(1))));
    }

    #[test]
    fn empty_shapes_have_no_entries() {
        for yaml in ["~", "{}", "[]"] {
            assert_eq!(entries(&content(yaml), "www").map(|e| e.len()), Ok(0), "{yaml}");
        }
    }

    #[test]
    fn scalar_content_is_structural() {
        let binding = content("42");
        let res = entries(&binding, "bad");
        assert!(matches!(res, Err(ZoneError::Structural { .. })), "{res:?}");

        let res = locate(&content("- type: A\n  value: 1.2.3.4\n- oops\n"), "bad", RecordType::Txt);
        assert!(matches!(res, Err(ZoneError::Structural { .. })), "{res:?}");
    }

    #[test]
    fn types_skip_unknown_and_repeats() {
        let many = content("- type: A\n  value: 1.2.3.4\n- type: TLSA\n  value: x\n- type: A\n  value: 5.6.7.8\n- type: MX\n  value: 10 mx.\n");
        assert_eq!(types_in(&many, "www"), Ok(vec![RecordType::A, RecordType::Mx]));
    }

    #[test]
    fn removing_sole_entry_leaves_empty_sequence() {
        let mut single = content("type: A\nvalue: 1.2.3.4\n");
        remove_at(&mut single, Slot::Single);
        assert_eq!(single, Value::Sequence(Vec::new()));

        let mut many = content("- type: A\n  value: 1.2.3.4\n- type: TXT\n  value: x\n");
        remove_at(&mut many, Slot::Element(0));
        assert_eq!(locate(&many, "www", RecordType::Txt), Ok(Some(Slot::Element(0))));
        assert!(entry_at(&many, Slot::Element(0)).is_some());
    }
}
