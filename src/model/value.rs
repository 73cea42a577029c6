use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Shape of a JSON value as shown in a property row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    String,
    Number,
    Boolean,
    Null,
    Array,
    Object,
}

impl ValueKind {
    pub fn is_container(self) -> bool {
        matches!(self, ValueKind::Array | ValueKind::Object)
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ValueKind::String => "string",
            ValueKind::Number => "number",
            ValueKind::Boolean => "boolean",
            ValueKind::Null => "null",
            ValueKind::Array => "array",
            ValueKind::Object => "object",
        };
        write!(f, "{}", s)
    }
}

pub fn classify(value: &Value) -> ValueKind {
    match value {
        Value::Null => ValueKind::Null,
        Value::Bool(_) => ValueKind::Boolean,
        Value::Number(_) => ValueKind::Number,
        Value::String(_) => ValueKind::String,
        Value::Array(_) => ValueKind::Array,
        Value::Object(_) => ValueKind::Object,
    }
}

/// Short display form of a value. Containers are summarized by size and
/// never expanded, so a row stays one line no matter how big the value is.
pub fn summarize(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => format!("\"{}\"", s),
        Value::Array(items) => array_summary(items.len()),
        Value::Object(map) => object_summary(map.len()),
    }
}

pub fn array_summary(len: usize) -> String {
    if len == 1 {
        "[1 item]".to_string()
    } else {
        format!("[{} items]", len)
    }
}

pub fn object_summary(len: usize) -> String {
    if len == 1 {
        "{1 key}".to_string()
    } else {
        format!("{{{} keys}}", len)
    }
}

/// True for arrays and objects holding at least one entry.
pub fn is_expandable(value: &Value) -> bool {
    match value {
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
        _ => false,
    }
}
