//! Click-to-inspect: map a node label back to the slice of JSON it shows.
//!
//! Resolution always reads the source document and never the compiled graph,
//! so it can run alongside any graph mutation.

use crate::model::{GraphNode, PATH_SEPARATOR, PathSegment, ROOT_LABEL};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

/// Why a label could not be mapped back to the document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("Source is not valid JSON: {0}")]
    InvalidJson(String),
    #[error("Key '{0}' not found in the document")]
    KeyNotFound(String),
    #[error("Index {index} is out of range for an array of {len} items")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("Segment '{0}' is not a valid array index")]
    NotAnIndex(String),
    #[error("Segment '{0}' points into a scalar value")]
    NotAContainer(String),
    #[error("Empty label")]
    EmptyLabel,
}

/// A located subtree, ready for an inspector panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resolved {
    pub key: String,
    pub value: Value,
}

impl Resolved {
    pub fn to_pretty(&self) -> String {
        serde_json::to_string_pretty(&self.value).unwrap_or_else(|_| self.value.to_string())
    }
}

/// Re-parse `source` and resolve `label` against it.
pub fn resolve_text(source: &str, label: &str) -> Result<Resolved, ResolveError> {
    let json: Value =
        serde_json::from_str(source).map_err(|e| ResolveError::InvalidJson(e.to_string()))?;
    resolve(&json, label)
}

/// Resolve a displayed label.
///
/// * `Root` yields the whole document.
/// * `a > 0 > b` walks segment by segment. The first segment is looked up as
///   a key (top level first, then anywhere); a leading `Root` starts at the
///   document itself.
/// * Any other label is searched as a bare key, depth first in key order.
///   The first match wins even if the key occurs elsewhere too.
pub fn resolve(json: &Value, label: &str) -> Result<Resolved, ResolveError> {
    let result = resolve_inner(json, label);
    if let Err(e) = &result {
        warn!(label, error = %e, "could not resolve label");
    }
    result
}

fn resolve_inner(json: &Value, label: &str) -> Result<Resolved, ResolveError> {
    if label.is_empty() {
        return Err(ResolveError::EmptyLabel);
    }
    if label == ROOT_LABEL {
        return Ok(Resolved {
            key: ROOT_LABEL.to_string(),
            value: json.clone(),
        });
    }

    if label.contains(PATH_SEPARATOR) {
        let mut segments = label.split(PATH_SEPARATOR);
        let first = segments.next().unwrap_or_default();
        let mut current = if first == ROOT_LABEL {
            json
        } else {
            locate_first(json, first).ok_or_else(|| ResolveError::KeyNotFound(first.to_string()))?
        };
        for segment in segments {
            current = step(current, segment)?;
        }
        return Ok(Resolved {
            key: label.to_string(),
            value: current.clone(),
        });
    }

    find_key(json, label)
        .map(|value| Resolved {
            key: label.to_string(),
            value: value.clone(),
        })
        .ok_or_else(|| ResolveError::KeyNotFound(label.to_string()))
}

/// Resolve an exact breadcrumb path.
pub fn resolve_path(json: &Value, path: &[PathSegment]) -> Result<Resolved, ResolveError> {
    let mut current = json;
    for segment in path {
        current = match (segment, current) {
            (PathSegment::Index(i), Value::Array(items)) => {
                items.get(*i).ok_or(ResolveError::IndexOutOfRange {
                    index: *i,
                    len: items.len(),
                })?
            }
            (PathSegment::Key(k), Value::Object(map)) => {
                map.get(k).ok_or_else(|| ResolveError::KeyNotFound(k.clone()))?
            }
            (segment, _) => step(current, &segment.to_string())?,
        };
    }

    let key = path
        .last()
        .map(|s| s.to_string())
        .unwrap_or_else(|| ROOT_LABEL.to_string());
    Ok(Resolved {
        key,
        value: current.clone(),
    })
}

/// Resolve a node through the path recorded at compile time, reporting it
/// under the node's label.
pub fn resolve_node(json: &Value, node: &GraphNode) -> Result<Resolved, ResolveError> {
    let mut resolved = resolve_path(json, &node.path)?;
    resolved.key = node.label.clone();
    Ok(resolved)
}

fn locate_first<'a>(json: &'a Value, key: &str) -> Option<&'a Value> {
    if let Value::Object(map) = json {
        if let Some(value) = map.get(key) {
            return Some(value);
        }
    }
    find_key(json, key)
}

fn step<'a>(current: &'a Value, segment: &str) -> Result<&'a Value, ResolveError> {
    match current {
        Value::Array(items) => {
            let index: usize = segment
                .trim()
                .parse()
                .map_err(|_| ResolveError::NotAnIndex(segment.to_string()))?;
            items.get(index).ok_or(ResolveError::IndexOutOfRange {
                index,
                len: items.len(),
            })
        }
        Value::Object(map) => map
            .get(segment)
            .ok_or_else(|| ResolveError::KeyNotFound(segment.to_string())),
        _ => Err(ResolveError::NotAContainer(segment.to_string())),
    }
}

/// Depth-first search for `key`. Within one object its own keys are checked
/// before descending into any of its values.
fn find_key<'a>(json: &'a Value, key: &str) -> Option<&'a Value> {
    match json {
        Value::Object(map) => {
            if let Some(value) = map.get(key) {
                return Some(value);
            }
            map.values().find_map(|v| find_key(v, key))
        }
        Value::Array(items) => items.iter().find_map(|v| find_key(v, key)),
        _ => None,
    }
}
