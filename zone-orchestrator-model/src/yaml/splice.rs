//! Source-preserving serialization
//!
//! A parsed zone keeps its source text. Serializing copies every node whose
//! value did not change straight from that text, so comments, quoting and
//! layout survive; only changed nodes are written by the canonical emitter.
//!
//! Blocks are located by indentation. Each located block is parsed on its
//! own and compared with the value it is meant to hold, and a block that
//! does not read back that way is emitted canonically. The finished text is
//! parsed once more and must equal the tree, otherwise the whole tree falls
//! back to canonical form.

use std::ops::Range;

use serde_yaml::{Mapping, Value};

use super::{emit, parse_root};
use crate::error::Result;

/// Serialize `root`, reusing `source` wherever the tree still matches it.
pub(crate) fn render(source: &str, root: &Mapping) -> Result<String> {
    if parse_root(source).is_ok_and(|original| &original == root) {
        return Ok(source.to_string());
    }
    if let Some(text) = splice_document(source, root)? {
        if parse_root(&text).is_ok_and(|spliced| &spliced == root) {
            return Ok(text);
        }
    }
    log::debug!("Zone source layout could not be kept, emitting canonical form");
    emit::to_string(root)
}

fn splice_document(source: &str, root: &Mapping) -> Result<Option<String>> {
    let lines: Vec<String> = source.lines().map(str::to_string).collect();
    let body_start = lines
        .iter()
        .position(|line| !is_trivia(line) && !is_directive(line))
        .unwrap_or(lines.len());
    let (preamble, body) = lines.split_at(body_start);
    if body.iter().any(|line| is_document_marker(line)) {
        return Ok(None);
    }

    // with an empty tree only the header comments remain
    let mut out = preamble.to_vec();
    if !root.is_empty() {
        if body.is_empty() {
            out.extend(emit::mapping_lines(root, 0)?);
        } else {
            splice_mapping(body, 0, root, &mut out)?;
        }
    }
    if out.is_empty() {
        return Ok(None);
    }
    let mut text = out.join("\n");
    text.push('\n');
    Ok(Some(text))
}

fn indent_of(line: &str) -> usize {
    line.len() - line.trim_start_matches(' ').len()
}

/// Blank or comment-only.
fn is_trivia(line: &str) -> bool {
    let content = line.trim_start();
    content.is_empty() || content.starts_with('#')
}

fn is_directive(line: &str) -> bool {
    line.starts_with('%') || line.trim_end() == "---"
}

fn is_document_marker(line: &str) -> bool {
    line.starts_with("---") || line.starts_with("...")
}

/// Whether `line` opens a sequence item at column `indent`.
fn is_item(line: &str, indent: usize) -> bool {
    if indent_of(line) != indent {
        return false;
    }
    let rest = &line[indent..];
    rest == "-" || rest.starts_with("- ")
}

/// Index of the first line that is not trivia.
fn head_of(lines: &[String]) -> usize {
    lines
        .iter()
        .position(|line| !is_trivia(line))
        .unwrap_or(lines.len())
}

/// Parse lines as a standalone document, shifted left by `indent` columns.
fn parse_block(lines: &[String], indent: usize) -> Option<Value> {
    let mut text = String::new();
    for line in lines {
        let cut = indent_of(line).min(indent);
        text.push_str(&line[cut..]);
        text.push('\n');
    }
    serde_yaml::from_str(&text).ok()
}

/// Split a block into one span per mapping entry (or per sequence item with
/// `items`) starting at column `indent`. Comments right above an entry go
/// with that entry; trailing ones go with the last.
fn split_block(lines: &[String], indent: usize, items: bool) -> Option<Vec<Range<usize>>> {
    let mut starts = Vec::new();
    for (i, line) in lines.iter().enumerate() {
        if is_trivia(line) {
            continue;
        }
        let column = indent_of(line);
        if column < indent || (column > indent && starts.is_empty()) {
            return None;
        }
        if column > indent {
            continue;
        }
        if is_item(line, indent) == items {
            starts.push(i);
        } else if items || starts.is_empty() {
            return None;
        }
        // otherwise an indentless sequence under the previous key
    }

    let mut bounds: Vec<usize> = starts
        .iter()
        .map(|&start| {
            let mut bound = start;
            while bound > 0 && is_trivia(&lines[bound - 1]) {
                bound -= 1;
            }
            bound
        })
        .collect();
    *bounds.first_mut()? = 0;
    let spans = bounds
        .iter()
        .enumerate()
        .map(|(k, &bound)| bound..bounds.get(k + 1).copied().unwrap_or(lines.len()))
        .collect();
    Some(spans)
}

struct OldEntry<'a> {
    lines: &'a [String],
    key: Value,
    value: Value,
}

struct OldItem<'a> {
    lines: &'a [String],
    value: Value,
}

fn old_entries(lines: &[String], indent: usize) -> Option<Vec<OldEntry<'_>>> {
    let mut whole = Mapping::new();
    let mut entries = Vec::new();
    for span in split_block(lines, indent, false)? {
        let block = &lines[span];
        let Value::Mapping(single) = parse_block(block, indent)? else {
            return None;
        };
        let mut pairs = single.into_iter();
        let (key, value) = pairs.next()?;
        if pairs.next().is_some() {
            return None;
        }
        whole.insert(key.clone(), value.clone());
        entries.push(OldEntry {
            lines: block,
            key,
            value,
        });
    }
    (parse_block(lines, indent)? == Value::Mapping(whole)).then_some(entries)
}

fn old_items(lines: &[String], indent: usize) -> Option<Vec<OldItem<'_>>> {
    let mut whole = Vec::new();
    let mut items = Vec::new();
    for span in split_block(lines, indent, true)? {
        let block = &lines[span];
        let Value::Sequence(mut single) = parse_block(block, indent)? else {
            return None;
        };
        let value = single.pop()?;
        if !single.is_empty() {
            return None;
        }
        whole.push(value.clone());
        items.push(OldItem {
            lines: block,
            value,
        });
    }
    (parse_block(lines, indent)? == Value::Sequence(whole)).then_some(items)
}

fn splice_mapping(lines: &[String], indent: usize, new: &Mapping, out: &mut Vec<String>) -> Result<()> {
    let Some(entries) = old_entries(lines, indent) else {
        out.extend(emit::mapping_lines(new, indent)?);
        return Ok(());
    };
    for (key, value) in new {
        match entries.iter().find(|entry| &entry.key == key) {
            Some(old) if &old.value == value => out.extend_from_slice(old.lines),
            Some(old) => splice_entry(old, indent, key, value, out)?,
            None => out.extend(emit::entry_lines(key, value, indent)?),
        }
    }
    Ok(())
}

fn splice_entry(
    old: &OldEntry<'_>,
    indent: usize,
    key: &Value,
    value: &Value,
    out: &mut Vec<String>,
) -> Result<()> {
    let (leading, rest) = old.lines.split_at(head_of(old.lines));
    out.extend_from_slice(leading);
    if let Some((key_line, child)) = rest.split_first() {
        if let Some(child_indent) = child_indent(child, &old.value) {
            let mut spliced = Vec::new();
            if splice_collection(child, child_indent, &old.value, value, &mut spliced)? {
                out.push(key_line.clone());
                out.extend(spliced);
                return Ok(());
            }
        }
    }
    out.extend(emit::entry_lines(key, value, indent)?);
    Ok(())
}

/// Column of the block holding `old`, if `old` is a non-empty collection
/// written in block form on the lines `child`.
fn child_indent(child: &[String], old: &Value) -> Option<usize> {
    let non_empty = match old {
        Value::Mapping(m) => !m.is_empty(),
        Value::Sequence(s) => !s.is_empty(),
        _ => false,
    };
    if !non_empty {
        return None;
    }
    let indent = indent_of(child.get(head_of(child))?);
    (parse_block(child, indent).as_ref() == Some(old)).then_some(indent)
}

/// Splice a block collection into its new shape. A mapping may become a
/// sequence whose items include it. Returns `false` when the shapes do not
/// allow splicing.
fn splice_collection(
    lines: &[String],
    indent: usize,
    old: &Value,
    new: &Value,
    out: &mut Vec<String>,
) -> Result<bool> {
    match (old, new) {
        (Value::Mapping(_), Value::Mapping(new)) if !new.is_empty() => {
            splice_mapping(lines, indent, new, out)?;
        }
        (Value::Sequence(_), Value::Sequence(new)) if !new.is_empty() => {
            splice_sequence(lines, indent, new, out)?;
        }
        (Value::Mapping(_), Value::Sequence(new)) if !new.is_empty() => {
            splice_sequence(&promote(lines, indent), indent, new, out)?;
        }
        _ => return Ok(false),
    }
    Ok(true)
}

/// Rewrite a block mapping at `indent` as the only item of a sequence at the
/// same column.
fn promote(lines: &[String], indent: usize) -> Vec<String> {
    let head = head_of(lines);
    lines
        .iter()
        .enumerate()
        .map(|(i, line)| {
            if i == head {
                format!("{}- {}", &line[..indent], &line[indent..])
            } else if i > head && !line.trim().is_empty() {
                format!("  {line}")
            } else {
                line.clone()
            }
        })
        .collect()
}

fn splice_sequence(lines: &[String], indent: usize, new: &[Value], out: &mut Vec<String>) -> Result<()> {
    let Some(items) = old_items(lines, indent) else {
        out.extend(emit::sequence_lines(new, indent)?);
        return Ok(());
    };
    let matched = common_items(&items, new);
    let (mut i, mut j) = (0, 0);
    for (mi, mj) in matched.into_iter().chain(std::iter::once((items.len(), new.len()))) {
        // unmatched runs pair up by position
        for (k, value) in new[j..mj].iter().enumerate() {
            match items[i..mi].get(k) {
                Some(old) => splice_item(old, indent, value, out)?,
                None => out.extend(emit::item_lines(value, indent)?),
            }
        }
        if let Some(old) = items.get(mi) {
            out.extend_from_slice(old.lines);
        }
        i = mi + 1;
        j = mj + 1;
    }
    Ok(())
}

/// Index pairs of a longest run of items equal in both sequences.
fn common_items(old: &[OldItem<'_>], new: &[Value]) -> Vec<(usize, usize)> {
    let (n, m) = (old.len(), new.len());
    let mut table = vec![vec![0_usize; m + 1]; n + 1];
    for i in (0..n).rev() {
        for j in (0..m).rev() {
            table[i][j] = if old[i].value == new[j] {
                table[i + 1][j + 1] + 1
            } else {
                table[i + 1][j].max(table[i][j + 1])
            };
        }
    }

    let mut pairs = Vec::new();
    let (mut i, mut j) = (0, 0);
    while i < n && j < m {
        if old[i].value == new[j] {
            pairs.push((i, j));
            i += 1;
            j += 1;
        } else if table[i + 1][j] >= table[i][j + 1] {
            i += 1;
        } else {
            j += 1;
        }
    }
    pairs
}

fn splice_item(old: &OldItem<'_>, indent: usize, value: &Value, out: &mut Vec<String>) -> Result<()> {
    let (leading, rest) = old.lines.split_at(head_of(old.lines));
    out.extend_from_slice(leading);
    if let Some((item_line, child)) = rest.split_first() {
        let after_dash = item_line[indent + 1..].trim_start_matches(' ');
        let mut spliced = Vec::new();
        if after_dash.is_empty() || after_dash.starts_with('#') {
            // `-` alone, the node follows on deeper lines
            if let Some(child_indent) = child_indent(child, &old.value) {
                if splice_collection(child, child_indent, &old.value, value, &mut spliced)? {
                    out.push(item_line.clone());
                    out.extend(spliced);
                    return Ok(());
                }
            }
        } else {
            let column = item_line.len() - after_dash.len();
            let mut body = Vec::with_capacity(rest.len());
            body.push(format!("{}{after_dash}", " ".repeat(column)));
            body.extend_from_slice(child);
            if parse_block(&body, column).as_ref() == Some(&old.value)
                && splice_collection(&body, column, &old.value, value, &mut spliced)?
                && spliced
                    .first_mut()
                    .is_some_and(|first| restore_dash(first, indent, column))
            {
                out.extend(spliced);
                return Ok(());
            }
        }
    }
    out.extend(emit::item_lines(value, indent)?);
    Ok(())
}

/// Put the item dash back at `indent` on a line whose content starts at
/// `column`.
fn restore_dash(line: &mut String, indent: usize, column: usize) -> bool {
    let fits = line.len() > column
        && indent_of(line) == column
        && line.is_char_boundary(indent + 1);
    if fits {
        line.replace_range(indent..=indent, "-");
    }
    fits
}
