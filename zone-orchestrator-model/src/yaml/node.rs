//! In-place edits of record mappings

use serde_yaml::{Mapping, Value};

/// Set, replace or remove `key`.
///
/// An equal value leaves the mapping untouched. A new key is inserted
/// before the first existing key that sorts after it, so a sorted mapping
/// stays sorted. Returns whether the mapping changed.
pub(crate) fn set_field(map: &mut Mapping, key: &str, value: Option<Value>) -> bool {
    match value {
        None => {
            if !map.contains_key(key) {
                return false;
            }
            *map = std::mem::take(map)
                .into_iter()
                .filter(|(k, _)| k.as_str() != Some(key))
                .collect();
            true
        }
        Some(value) => {
            if let Some(slot) = map.get_mut(key) {
                if *slot == value {
                    return false;
                }
                *slot = value;
                return true;
            }
            insert_sorted(map, key, value);
            true
        }
    }
}

fn insert_sorted(map: &mut Mapping, key: &str, value: Value) {
    let mut pending = Some((Value::String(key.to_string()), value));
    for (k, v) in std::mem::take(map) {
        if k.as_str().is_some_and(|existing| existing > key) {
            if let Some((nk, nv)) = pending.take() {
                map.insert(nk, nv);
            }
        }
        map.insert(k, v);
    }
    if let Some((nk, nv)) = pending {
        map.insert(nk, nv);
    }
}
