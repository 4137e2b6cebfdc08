//! Read and write operations at the locations a path selects.
//!
//! Every mutation first resolves the path against an immutable borrow of the
//! document, collecting owned [`Location`]s, and only then takes the mutable
//! borrow to change exactly those locations.

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::JsonLibError;
use crate::navigate::{self, Location, Step};
use crate::path::{JsonPath, Segment};

pub fn value_type(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn locations(doc: &Value, path: &JsonPath) -> Vec<Location> {
    navigate::find(path, doc)
        .into_iter()
        .map(|m| m.location)
        .collect()
}

/// Values selected by `path`. With `fail_on_empty`, no match is an error.
pub fn get<'a>(
    doc: &'a Value,
    path: &JsonPath,
    fail_on_empty: bool,
) -> Result<Vec<&'a Value>, JsonLibError> {
    let values = navigate::find_values(path, doc);
    if values.is_empty() && fail_on_empty {
        return Err(JsonLibError::PathNotFound(path.to_string()));
    }
    Ok(values)
}

/// Replace every match with `value`. Returns how many locations changed.
///
/// Without matches, a singular path is created when `create_missing` is set;
/// otherwise nothing happens.
pub fn set(
    doc: &mut Value,
    path: &JsonPath,
    value: Value,
    create_missing: bool,
) -> Result<usize, JsonLibError> {
    let targets = locations(doc, path);
    if targets.is_empty() {
        return create_or_skip(doc, path, value, create_missing);
    }

    let mut changed = 0;
    for location in &targets {
        // An earlier replacement may have removed a nested target.
        if let Some(slot) = location.resolve_mut(doc) {
            *slot = value.clone();
            changed += 1;
        }
    }
    debug!(path = %path, changed, "set value");
    Ok(changed)
}

/// Remove every match. Returns how many nodes were removed.
pub fn delete(doc: &mut Value, path: &JsonPath) -> Result<usize, JsonLibError> {
    let mut targets = locations(doc, path);
    if targets.iter().any(Location::is_root) {
        return Err(JsonLibError::DeleteRoot);
    }

    // Descending order removes higher array indices and nested nodes first,
    // so the remaining locations stay valid.
    targets.sort();
    targets.dedup();

    let mut removed = 0;
    for location in targets.iter().rev() {
        let Some((parent, step)) = location.split_last() else {
            continue;
        };
        let removed_one = match (parent.resolve_mut(doc), step) {
            (Some(Value::Object(map)), Step::Key(k)) => map.shift_remove(k).is_some(),
            (Some(Value::Array(arr)), Step::Index(i)) if *i < arr.len() => {
                arr.remove(*i);
                true
            }
            _ => false,
        };
        if removed_one {
            removed += 1;
        }
    }
    debug!(path = %path, removed, "deleted matches");
    Ok(removed)
}

/// Push `value` onto every matched array and merge it into every matched
/// object. Returns how many containers changed.
pub fn append(
    doc: &mut Value,
    path: &JsonPath,
    value: Value,
    create_missing: bool,
) -> Result<usize, JsonLibError> {
    let targets = locations(doc, path);
    if targets.is_empty() {
        return create_or_skip(doc, path, value, create_missing);
    }

    // Check every target before touching any of them.
    for location in &targets {
        match location.resolve(doc) {
            Some(Value::Array(_)) => {}
            Some(Value::Object(_)) if value.is_object() => {}
            Some(Value::Object(_)) => {
                return Err(JsonLibError::TypeError(format!(
                    "cannot merge {} into object at {location}",
                    value_type(&value)
                )));
            }
            Some(other) => {
                return Err(JsonLibError::TypeError(format!(
                    "cannot add to {} at {location}",
                    value_type(other)
                )));
            }
            None => {}
        }
    }

    let mut changed = 0;
    for location in &targets {
        match location.resolve_mut(doc) {
            Some(Value::Array(arr)) => arr.push(value.clone()),
            Some(Value::Object(map)) => {
                if let Value::Object(members) = &value {
                    for (k, v) in members {
                        map.insert(k.clone(), v.clone());
                    }
                }
            }
            _ => continue,
        }
        changed += 1;
    }
    debug!(path = %path, changed, "appended value");
    Ok(changed)
}

fn create_or_skip(
    doc: &mut Value,
    path: &JsonPath,
    value: Value,
    create_missing: bool,
) -> Result<usize, JsonLibError> {
    if !create_missing || !path.is_singular() {
        debug!(path = %path, "no match, nothing changed");
        return Ok(0);
    }
    create(doc, path.segments(), value)?;
    debug!(path = %path, "created missing path");
    Ok(1)
}

/// Write `value` at a singular path, building missing containers on the way:
/// an object before a key, an array before an index.
fn create(doc: &mut Value, segments: &[Segment], value: Value) -> Result<(), JsonLibError> {
    let Some((last, parents)) = segments.split_last() else {
        *doc = value;
        return Ok(());
    };
    check_creatable(doc, segments)?;

    let mut node = doc;
    for (i, segment) in parents.iter().enumerate() {
        let next_is_index = matches!(segments[i + 1], Segment::Index(_));
        let placeholder = if next_is_index {
            Value::Array(Vec::new())
        } else {
            Value::Object(Map::new())
        };
        node = slot(node, segment, placeholder)?;
    }
    *slot(node, last, Value::Null)? = value;
    Ok(())
}

/// Walk the path without touching `doc`, failing where `create` would.
/// Anything below a missing or null node is built fresh, so an index there
/// must be 0.
fn check_creatable(doc: &Value, segments: &[Segment]) -> Result<(), JsonLibError> {
    let mut node = Some(doc);
    for segment in segments {
        node = match (segment, node) {
            (Segment::Key(_), None | Some(Value::Null)) => None,
            (Segment::Index(idx), None | Some(Value::Null)) => {
                if *idx != 0 {
                    return Err(JsonLibError::IndexOutOfBounds {
                        index: *idx,
                        length: 0,
                    });
                }
                None
            }
            (Segment::Key(k), Some(Value::Object(map))) => map.get(k),
            (Segment::Index(idx), Some(Value::Array(arr))) => {
                match navigate::normalize_index(*idx, arr.len()) {
                    Some(i) => Some(&arr[i]),
                    None if *idx >= 0 && *idx as usize == arr.len() => None,
                    None => {
                        return Err(JsonLibError::IndexOutOfBounds {
                            index: *idx,
                            length: arr.len(),
                        });
                    }
                }
            }
            (Segment::Key(k), Some(other)) => {
                return Err(JsonLibError::TypeError(format!(
                    "cannot create key '{k}' in {}",
                    value_type(other)
                )));
            }
            (Segment::Index(i), Some(other)) => {
                return Err(JsonLibError::TypeError(format!(
                    "cannot create index {i} in {}",
                    value_type(other)
                )));
            }
            (other, _) => {
                return Err(JsonLibError::TypeError(format!(
                    "cannot create through {other:?}"
                )));
            }
        };
    }
    Ok(())
}

/// The child of `node` addressed by `segment`, inserted as `placeholder`
/// when absent. A null node becomes the container the segment needs.
fn slot<'a>(
    node: &'a mut Value,
    segment: &Segment,
    placeholder: Value,
) -> Result<&'a mut Value, JsonLibError> {
    if node.is_null() {
        *node = match segment {
            Segment::Index(_) => Value::Array(Vec::new()),
            _ => Value::Object(Map::new()),
        };
    }
    match (segment, node) {
        (Segment::Key(k), Value::Object(map)) => Ok(map.entry(k.clone()).or_insert(placeholder)),
        (Segment::Index(idx), Value::Array(arr)) => {
            let len = arr.len();
            if let Some(i) = navigate::normalize_index(*idx, len) {
                Ok(&mut arr[i])
            } else if *idx >= 0 && *idx as usize == len {
                arr.push(placeholder);
                Ok(&mut arr[len])
            } else {
                Err(JsonLibError::IndexOutOfBounds {
                    index: *idx,
                    length: len,
                })
            }
        }
        (Segment::Key(k), other) => Err(JsonLibError::TypeError(format!(
            "cannot create key '{k}' in {}",
            value_type(other)
        ))),
        (Segment::Index(i), other) => Err(JsonLibError::TypeError(format!(
            "cannot create index {i} in {}",
            value_type(other)
        ))),
        (other, _) => Err(JsonLibError::TypeError(format!(
            "cannot create through {other:?}"
        ))),
    }
}
