use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::fields;
use super::validate;
use crate::error::ValidationError;

const GRAMMAR: &str = r#"order preference "flags" "service" "regexp" replacement"#;

/// NAPTR record value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NaptrValue {
    /// Processing order (lower first).
    pub order: u16,
    /// Preference among records of equal order.
    pub preference: u16,
    /// Flags controlling rewriting, e.g. `U` or `S`.
    pub flags: String,
    /// Service parameters, e.g. `SIP+D2U`.
    pub service: String,
    /// Substitution expression.
    pub regexp: String,
    /// Replacement domain, `.` when unused.
    pub replacement: String,
}

impl FromStr for NaptrValue {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || ValidationError::Malformed {
            input: s.to_string(),
            expected: GRAMMAR,
        };
        let [order, preference, rest] = fields(s, GRAMMAR)?;
        let max = u64::from(u16::MAX);
        let order = validate::unsigned("order", order, 0, max)?;
        let preference = validate::unsigned("preference", preference, 0, max)?;

        let (flags, rest) = quoted(rest).ok_or_else(malformed)?;
        let (service, rest) = separated_quoted(rest).ok_or_else(malformed)?;
        let (regexp, rest) = separated_quoted(rest).ok_or_else(malformed)?;
        let replacement = rest.strip_prefix(' ').ok_or_else(malformed)?;
        if replacement.is_empty() || replacement.contains(char::is_whitespace) {
            return Err(malformed());
        }

        Ok(Self {
            order,
            preference,
            flags,
            service,
            regexp,
            replacement: replacement.to_string(),
        })
    }
}

fn separated_quoted(input: &str) -> Option<(String, &str)> {
    quoted(input.strip_prefix(' ')?)
}

/// Read one `"..."` token where `\"` and `\\` are escapes. Returns the
/// unescaped text and the input after the closing quote.
fn quoted(input: &str) -> Option<(String, &str)> {
    let body = input.strip_prefix('"')?;
    let mut text = String::new();
    let mut chars = body.char_indices();
    while let Some((i, c)) = chars.next() {
        match c {
            '"' => return Some((text, &body[i + 1..])),
            '\\' => text.push(chars.next()?.1),
            _ => text.push(c),
        }
    }
    None
}

fn write_quoted(f: &mut fmt::Formatter<'_>, text: &str) -> fmt::Result {
    f.write_str("\"")?;
    for c in text.chars() {
        if matches!(c, '"' | '\\') {
            f.write_str("\\")?;
        }
        write!(f, "{c}")?;
    }
    f.write_str("\"")
}

impl fmt::Display for NaptrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ", self.order, self.preference)?;
        write_quoted(f, &self.flags)?;
        f.write_str(" ")?;
        write_quoted(f, &self.service)?;
        f.write_str(" ")?;
        write_quoted(f, &self.regexp)?;
        write!(f, " {}", self.replacement)
    }
}
