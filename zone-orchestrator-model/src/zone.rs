//! Zone document
//!
//! [`Zone`] owns the parsed tree. Subdomain keys are matched after apex
//! aliasing: `@` and `""` name the same subdomain.
//!
//! A parsed zone also keeps its source text. Serializing reuses that text
//! for every node left unchanged, so an untouched document comes back byte
//! for byte, comments and quoting included.

use serde_yaml::{Mapping, Value};

use crate::error::{Result, ZoneError};
use crate::record::{Record, RecordLocator};
use crate::rtype::RecordType;
use crate::subdomain::{self, Subdomain};
use crate::yaml;

/// Conventional name of the zone apex.
pub const APEX_MARKER: &str = "@";

/// Map the apex marker to the empty name.
pub(crate) fn normalize(name: &str) -> &str {
    if name == APEX_MARKER { "" } else { name }
}

/// Name used in messages; the apex is shown as `@`.
pub(crate) fn display_name(name: &str) -> &str {
    if name.is_empty() { APEX_MARKER } else { name }
}

/// Text of a scalar key. `123:` names the subdomain `123`.
fn key_name(key: &Value) -> Option<String> {
    match key {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn key_matches(key: &Value, name: &str) -> bool {
    key_name(key).is_some_and(|k| normalize(&k) == name)
}

/// A parsed zone document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Zone {
    root: Mapping,
    source: Option<String>,
}

impl Zone {
    /// An empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a document. Blank text is an empty zone.
    pub fn from_yaml(text: &str) -> Result<Self> {
        let root = yaml::parse_root(text)?;
        log::debug!("Parsed zone document with {} subdomains", root.len());
        Ok(Self {
            root,
            source: Some(text.to_string()),
        })
    }

    /// Parse UTF-8 document bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let text = std::str::from_utf8(bytes).map_err(|e| ZoneError::Parse {
            detail: format!("document is not UTF-8: {e}"),
        })?;
        Self::from_yaml(text)
    }

    /// Serialize the document. Unchanged parts of a parsed source are kept
    /// verbatim; everything else is written in canonical block form.
    pub fn to_yaml(&self) -> Result<String> {
        match &self.source {
            Some(source) => yaml::splice::render(source, &self.root),
            None => yaml::emit::to_string(&self.root),
        }
    }

    /// Subdomain names in document order; the apex is `""`.
    pub fn subdomain_names(&self) -> Vec<String> {
        self.root
            .iter()
            .filter_map(|(key, _)| key_name(key))
            .map(|name| normalize(&name).to_string())
            .collect()
    }

    pub fn has_subdomain(&self, name: &str) -> bool {
        self.content(name).is_some()
    }

    /// View of an existing subdomain.
    pub fn find_subdomain(&mut self, name: &str) -> Result<Subdomain<'_>> {
        let name = normalize(name).to_string();
        if !self.has_subdomain(&name) {
            return Err(ZoneError::SubdomainNotFound { name });
        }
        Ok(Subdomain::new(self, name))
    }

    /// Append a subdomain with an empty sequence of entries.
    pub fn create_subdomain(&mut self, name: &str) -> Result<Subdomain<'_>> {
        let name = normalize(name).to_string();
        if self.has_subdomain(&name) {
            return Err(ZoneError::SubdomainExists { name });
        }
        self.root
            .insert(Value::String(name.clone()), Value::Sequence(Vec::new()));
        log::debug!("Created subdomain '{}'", display_name(&name));
        Ok(Subdomain::new(self, name))
    }

    /// Remove a subdomain and all of its entries.
    pub fn delete_subdomain(&mut self, name: &str) -> Result<()> {
        let name = normalize(name);
        if !self.has_subdomain(name) {
            return Err(ZoneError::SubdomainNotFound {
                name: name.to_string(),
            });
        }
        self.root = std::mem::take(&mut self.root)
            .into_iter()
            .filter(|(key, _)| !key_matches(key, name))
            .collect();
        log::debug!("Deleted subdomain '{}'", display_name(name));
        Ok(())
    }

    /// Remove the subdomain if it holds no record entry. Returns whether it
    /// was removed.
    pub fn delete_subdomain_if_empty(&mut self, name: &str) -> Result<bool> {
        let name = normalize(name);
        let content = self
            .content(name)
            .ok_or_else(|| ZoneError::SubdomainNotFound {
                name: name.to_string(),
            })?;
        if !subdomain::entries(content, display_name(name))?.is_empty() {
            return Ok(false);
        }
        self.delete_subdomain(name)?;
        log::info!("Removed empty subdomain '{}'", display_name(name));
        Ok(true)
    }

    /// Decode one record without keeping a subdomain view.
    pub fn get_record(&self, name: &str, rtype: RecordType) -> Result<Record> {
        let name = normalize(name);
        let locator = RecordLocator::new(name, rtype);
        let location = locator.to_string();
        let content = self
            .content(name)
            .ok_or_else(|| ZoneError::SubdomainNotFound {
                name: name.to_string(),
            })?;
        let entry = subdomain::locate(content, &location, rtype)?
            .and_then(|slot| subdomain::entry_at(content, slot))
            .ok_or_else(|| ZoneError::TypeNotFound {
                subdomain: name.to_string(),
                record_type: rtype,
            })?;
        Record::decode(locator, entry)
    }

    pub(crate) fn content(&self, name: &str) -> Option<&Value> {
        let name = normalize(name);
        self.root
            .iter()
            .find(|(key, _)| key_matches(key, name))
            .map(|(_, content)| content)
    }

    pub(crate) fn content_mut(&mut self, name: &str) -> Option<&mut Value> {
        let name = normalize(name);
        self.root
            .iter_mut()
            .find(|(key, _)| key_matches(key, name))
            .map(|(_, content)| content)
    }

    /// Resolve the entry a locator points at.
    pub(crate) fn record_entry_mut(&mut self, locator: &RecordLocator) -> Result<&mut Mapping> {
        let location = locator.to_string();
        let content = self.content_mut(&locator.subdomain).ok_or_else(|| {
            ZoneError::SubdomainNotFound {
                name: locator.subdomain.clone(),
            }
        })?;
        let slot = subdomain::locate(content, &location, locator.record_type)?.ok_or_else(|| {
            ZoneError::TypeNotFound {
                subdomain: locator.subdomain.clone(),
                record_type: locator.record_type,
            }
        })?;
        subdomain::entry_at_mut(content, slot)
            .ok_or_else(|| ZoneError::structural(location, "record entry is not a mapping"))
    }

    /// Remove the entry a locator points at.
    pub(crate) fn remove_entry(&mut self, locator: &RecordLocator) -> Result<()> {
        let location = locator.to_string();
        let content = self.content_mut(&locator.subdomain).ok_or_else(|| {
            ZoneError::SubdomainNotFound {
                name: locator.subdomain.clone(),
            }
        })?;
        let slot = subdomain::locate(content, &location, locator.record_type)?.ok_or_else(|| {
            ZoneError::TypeNotFound {
                subdomain: locator.subdomain.clone(),
                record_type: locator.record_type,
            }
        })?;
        subdomain::remove_at(content, slot);
        log::debug!("Removed record entry {location}");
        Ok(())
    }
}
