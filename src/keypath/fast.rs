//! Plain-segment evaluators for paths that use no grammar beyond the
//! property separator. These skip the token walk entirely and behave
//! exactly like the full resolver does on such paths.

use crate::value::Value;

/// Walks `path` split on `separator` without tokenizing first.
pub fn get_split(root: &Value, path: &str, separator: char) -> Option<Value> {
    let mut current = root;
    for segment in path.split(separator) {
        current = current.index(segment)?;
    }
    Some(current.clone())
}

/// Walks an already-split segment slice, as produced by a cached program.
pub fn get_segments(root: &Value, segments: &[&str]) -> Option<Value> {
    let mut current = root;
    for segment in segments {
        current = current.index(segment)?;
    }
    Some(current.clone())
}

pub fn set_split(
    root: &mut Value,
    path: &str,
    separator: char,
    new: &Value,
    force: bool,
) -> bool {
    let segments: Vec<&str> = path.split(separator).collect();
    set_segments(root, &segments, new, force)
}

/// Writes `new` at the location named by `segments`. With `force`,
/// missing intermediate object members are created as empty objects;
/// array segments are never invented.
pub fn set_segments(root: &mut Value, segments: &[&str], new: &Value, force: bool) -> bool {
    let Some((last, init)) = segments.split_last() else {
        return false;
    };
    let mut current = root;
    for segment in init {
        current = match current {
            Value::Object(fields) => {
                if force {
                    fields
                        .entry(segment.to_string())
                        .or_insert_with(|| Value::Object(indexmap::IndexMap::new()))
                } else {
                    match fields.get_mut(*segment) {
                        Some(child) => child,
                        None => return false,
                    }
                }
            }
            Value::Array(items) => {
                let Ok(index) = segment.parse::<usize>() else {
                    return false;
                };
                match items.get_mut(index) {
                    Some(child) => child,
                    None => return false,
                }
            }
            _ => return false,
        };
    }
    match current {
        Value::Object(fields) => {
            fields.insert(last.to_string(), new.clone());
            true
        }
        Value::Array(items) => {
            let Ok(index) = last.parse::<usize>() else {
                return false;
            };
            if index < items.len() {
                items[index] = new.clone();
                true
            } else if index == items.len() {
                items.push(new.clone());
                true
            } else {
                false
            }
        }
        _ => false,
    }
}
