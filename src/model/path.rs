use serde::{Deserialize, Serialize};
use std::fmt;

/// Separator between breadcrumb segments in array-path labels.
pub const PATH_SEPARATOR: &str = " > ";

/// Label of the synthetic root node, also the first breadcrumb segment.
pub const ROOT_LABEL: &str = "Root";

/// One step from a JSON container into one of its members.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSegment {
    Index(usize),
    Key(String),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Index(i) => write!(f, "{}", i),
            PathSegment::Key(k) => write!(f, "{}", k),
        }
    }
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        PathSegment::Key(key.to_string())
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        PathSegment::Index(index)
    }
}

/// Render a path in breadcrumb form, e.g. `Root > employees > 0 > skills`.
pub fn breadcrumb(path: &[PathSegment]) -> String {
    let mut out = String::from(ROOT_LABEL);
    for segment in path {
        out.push_str(PATH_SEPARATOR);
        out.push_str(&segment.to_string());
    }
    out
}

/// Extend `path` by one segment without touching the original.
pub fn child_path(path: &[PathSegment], segment: impl Into<PathSegment>) -> Vec<PathSegment> {
    let mut next = Vec::with_capacity(path.len() + 1);
    next.extend_from_slice(path);
    next.push(segment.into());
    next
}
