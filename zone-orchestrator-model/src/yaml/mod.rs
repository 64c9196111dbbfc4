//! YAML plumbing: parsing into a `serde_yaml` tree, in-place field edits,
//! the canonical emitter and source-preserving output.

pub(crate) mod emit;
pub(crate) mod node;
pub(crate) mod splice;

use serde_yaml::{Mapping, Value};

use crate::error::{Result, ZoneError};

/// Parse a document whose root must be a mapping. Blank or comment-only
/// input is an empty mapping.
pub(crate) fn parse_root(text: &str) -> Result<Mapping> {
    let blank = text.lines().all(|line| {
        let content = line.trim();
        content.is_empty() || content.starts_with('#')
    });
    if blank {
        return Ok(Mapping::new());
    }
    let root: Value = serde_yaml::from_str(text).map_err(|e| ZoneError::Parse {
        detail: e.to_string(),
    })?;
    match root {
        Value::Mapping(m) => Ok(m),
        Value::Null => Ok(Mapping::new()),
        _ => Err(ZoneError::structural(
            "<root>",
            "document root must be a mapping of subdomain names",
        )),
    }
}
