//! Canonical block-style emitter
//!
//! Output conventions:
//!
//! - two-space indentation, sequences indented under their key;
//! - the first key of a mapping inside a sequence follows the `- `;
//! - empty collections are written in flow form (`{}`, `[]`);
//! - scalars are plain unless they would read back differently, then
//!   single-quoted (double-quoted when they hold control characters).
//!
//! A document already in this form re-emits byte for byte.

use std::fmt::Write as _;

use serde_yaml::value::TaggedValue;
use serde_yaml::{Mapping, Value};

use crate::error::{Result, ZoneError};

const INDENT: usize = 2;

/// Emit a root mapping as a YAML document.
pub(crate) fn to_string(root: &Mapping) -> Result<String> {
    if root.is_empty() {
        return Ok("{}\n".to_string());
    }
    let mut emitter = Emitter::default();
    emitter.mapping(root, 0, false)?;
    Ok(emitter.out)
}

/// Lines of a block mapping at column `indent`.
pub(crate) fn mapping_lines(map: &Mapping, indent: usize) -> Result<Vec<String>> {
    let mut emitter = Emitter::default();
    if map.is_empty() {
        emitter.pad(indent);
        emitter.out.push_str("{}\n");
    } else {
        emitter.mapping(map, indent, false)?;
    }
    Ok(emitter.into_lines())
}

/// Lines of a block sequence at column `indent`.
pub(crate) fn sequence_lines(items: &[Value], indent: usize) -> Result<Vec<String>> {
    let mut emitter = Emitter::default();
    if items.is_empty() {
        emitter.pad(indent);
        emitter.out.push_str("[]\n");
    } else {
        emitter.sequence(items, indent, false)?;
    }
    Ok(emitter.into_lines())
}

/// Lines of a single `key: value` entry at column `indent`.
pub(crate) fn entry_lines(key: &Value, value: &Value, indent: usize) -> Result<Vec<String>> {
    let mut single = Mapping::new();
    single.insert(key.clone(), value.clone());
    mapping_lines(&single, indent)
}

/// Lines of a single sequence item at column `indent`.
pub(crate) fn item_lines(item: &Value, indent: usize) -> Result<Vec<String>> {
    sequence_lines(std::slice::from_ref(item), indent)
}

#[derive(Default)]
struct Emitter {
    out: String,
}

impl Emitter {
    fn into_lines(self) -> Vec<String> {
        self.out.lines().map(str::to_string).collect()
    }

    fn pad(&mut self, width: usize) {
        self.out.extend(std::iter::repeat_n(' ', width));
    }

    /// Entries of a non-empty mapping at column `indent`. With `inline`, the
    /// first entry continues the current line.
    fn mapping(&mut self, map: &Mapping, indent: usize, inline: bool) -> Result<()> {
        for (i, (key, value)) in map.iter().enumerate() {
            if i > 0 || !inline {
                self.pad(indent);
            }
            self.out.push_str(&key_text(key)?);
            self.out.push(':');
            match block_child(value)? {
                Some(Block::Mapping(child)) => {
                    self.out.push('\n');
                    self.mapping(child, indent + INDENT, false)?;
                }
                Some(Block::Sequence(child)) => {
                    self.out.push('\n');
                    self.sequence(child, indent + INDENT, false)?;
                }
                None => {
                    self.out.push(' ');
                    self.out.push_str(&inline_text(value)?);
                    self.out.push('\n');
                }
            }
        }
        Ok(())
    }

    fn sequence(&mut self, items: &[Value], indent: usize, inline: bool) -> Result<()> {
        for (i, item) in items.iter().enumerate() {
            if i > 0 || !inline {
                self.pad(indent);
            }
            self.out.push_str("- ");
            match block_child(item)? {
                Some(Block::Mapping(child)) => self.mapping(child, indent + INDENT, true)?,
                Some(Block::Sequence(child)) => self.sequence(child, indent + INDENT, true)?,
                None => {
                    self.out.push_str(&inline_text(item)?);
                    self.out.push('\n');
                }
            }
        }
        Ok(())
    }
}

enum Block<'a> {
    Mapping(&'a Mapping),
    Sequence(&'a [Value]),
}

/// The collection to write in block form, if `value` is a non-empty one.
fn block_child(value: &Value) -> Result<Option<Block<'_>>> {
    match value {
        Value::Mapping(m) if !m.is_empty() => Ok(Some(Block::Mapping(m))),
        Value::Sequence(s) if !s.is_empty() => Ok(Some(Block::Sequence(s))),
        Value::Tagged(tagged) if is_collection(&tagged.value) => Err(ZoneError::Emit {
            detail: format!("tagged collection {} is not supported", tagged.tag),
        }),
        _ => Ok(None),
    }
}

fn is_collection(value: &Value) -> bool {
    matches!(value, Value::Mapping(_) | Value::Sequence(_))
}

/// A scalar, an empty collection or a tagged scalar, on one line.
fn inline_text(value: &Value) -> Result<String> {
    match value {
        Value::Mapping(_) => Ok("{}".to_string()),
        Value::Sequence(_) => Ok("[]".to_string()),
        Value::Tagged(tagged) => tagged_text(tagged),
        scalar => Ok(scalar_text(scalar)),
    }
}

fn tagged_text(tagged: &TaggedValue) -> Result<String> {
    if is_collection(&tagged.value) || matches!(tagged.value, Value::Tagged(_)) {
        return Err(ZoneError::Emit {
            detail: format!("tagged value {} cannot be written inline", tagged.tag),
        });
    }
    Ok(format!("{} {}", tagged.tag, scalar_text(&tagged.value)))
}

fn key_text(key: &Value) -> Result<String> {
    match key {
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => Ok(scalar_text(key)),
        _ => Err(ZoneError::Emit {
            detail: "only scalar mapping keys are supported".to_string(),
        }),
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => string_text(s),
        _ => "null".to_string(),
    }
}

fn string_text(s: &str) -> String {
    if s.chars().any(char::is_control) {
        double_quoted(s)
    } else if needs_quotes(s) {
        format!("'{}'", s.replace('\'', "''"))
    } else {
        s.to_string()
    }
}

fn double_quoted(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c if c.is_control() => {
                let code = u32::from(c);
                if code <= 0xff {
                    let _ = write!(out, "\\x{code:02x}");
                } else {
                    let _ = write!(out, "\\u{code:04x}");
                }
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Whether a plain scalar would read back as something other than this
/// string.
fn needs_quotes(s: &str) -> bool {
    let Some(first) = s.chars().next() else {
        return true;
    };
    if s.starts_with(char::is_whitespace) || s.ends_with(char::is_whitespace) {
        return true;
    }
    if "[]{},#&*!|>'\"%@`".contains(first) {
        return true;
    }
    if matches!(first, '-' | '?' | ':') && s[1..].chars().next().is_none_or(|c| c == ' ') {
        return true;
    }
    if s.starts_with("---") || s.starts_with("...") {
        return true;
    }
    if s.contains(": ") || s.contains(" #") || s.ends_with(':') {
        return true;
    }
    is_reserved_word(s) || looks_numeric(s)
}

fn is_reserved_word(s: &str) -> bool {
    matches!(
        s,
        "~" | "null" | "Null" | "NULL" | "true" | "True" | "TRUE" | "false" | "False" | "FALSE"
    )
}

fn looks_numeric(s: &str) -> bool {
    if s.parse::<i64>().is_ok() || s.parse::<u64>().is_ok() || s.parse::<f64>().is_ok() {
        return true;
    }
    let unsigned = s.strip_prefix(['+', '-']).unwrap_or(s);
    let lower = unsigned.to_ascii_lowercase();
    lower.starts_with("0x")
        || lower.starts_with("0o")
        || lower.starts_with("0b")
        || lower == ".inf"
        || lower == ".nan"
}
