//! Input admission limits.
//!
//! These checks decide whether a document gets compiled at all. The compiler
//! knows nothing about tiers; it only enforces its own hard ceilings.

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PolicyError {
    #[error("Invalid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Input is {actual} bytes, the limit is {limit}")]
    TooLarge { actual: usize, limit: usize },
    #[error("Input has {actual} lines, the limit is {limit}")]
    TooManyLines { actual: usize, limit: usize },
    #[error("Input nests {actual} levels deep, the limit is {limit}")]
    TooDeep { actual: usize, limit: usize },
    #[error("Diagram has {actual} nodes, the limit is {limit}")]
    TooManyNodes { actual: usize, limit: usize },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    #[default]
    Free,
    Premium,
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tier::Free => write!(f, "free"),
            Tier::Premium => write!(f, "premium"),
        }
    }
}

impl std::str::FromStr for Tier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "free" => Ok(Tier::Free),
            "premium" | "pro" => Ok(Tier::Premium),
            _ => Err(format!("Invalid tier '{}'. Valid options: free, premium", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputLimits {
    pub max_bytes: usize,
    pub max_lines: usize,
    pub max_depth: usize,
    pub max_nodes: usize,
}

impl InputLimits {
    pub fn free() -> Self {
        Self {
            max_bytes: 100 * 1024,
            max_lines: 2_000,
            max_depth: 20,
            max_nodes: 500,
        }
    }

    pub fn premium() -> Self {
        Self {
            max_bytes: 10 * 1024 * 1024,
            max_lines: 200_000,
            max_depth: 100,
            max_nodes: 10_000,
        }
    }
}

/// Check raw text against `limits` and parse it.
///
/// Byte and line limits are checked before parsing so oversized input is
/// rejected without building a value.
pub fn admit(text: &str, limits: &InputLimits) -> Result<Value, PolicyError> {
    if text.len() > limits.max_bytes {
        return Err(PolicyError::TooLarge {
            actual: text.len(),
            limit: limits.max_bytes,
        });
    }
    let lines = text.lines().count();
    if lines > limits.max_lines {
        return Err(PolicyError::TooManyLines {
            actual: lines,
            limit: limits.max_lines,
        });
    }

    let value: Value = serde_json::from_str(text)?;
    let depth = nesting_depth(&value);
    if depth > limits.max_depth {
        return Err(PolicyError::TooDeep {
            actual: depth,
            limit: limits.max_depth,
        });
    }
    Ok(value)
}

pub fn check_node_count(count: usize, limits: &InputLimits) -> Result<(), PolicyError> {
    if count > limits.max_nodes {
        return Err(PolicyError::TooManyNodes {
            actual: count,
            limit: limits.max_nodes,
        });
    }
    Ok(())
}

/// Container nesting depth: scalars are 0, `[]` and `{}` are 1.
pub fn nesting_depth(value: &Value) -> usize {
    // Iterative so hostile input cannot exhaust the stack here
    let mut max = 0;
    let mut stack: Vec<(&Value, usize)> = vec![(value, 0)];
    while let Some((current, depth)) = stack.pop() {
        match current {
            Value::Array(items) => {
                max = max.max(depth + 1);
                stack.extend(items.iter().map(|v| (v, depth + 1)));
            }
            Value::Object(map) => {
                max = max.max(depth + 1);
                stack.extend(map.values().map(|v| (v, depth + 1)));
            }
            _ => {}
        }
    }
    max
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_nesting_depth() {
        assert_eq!(nesting_depth(&json!(1)), 0);
        assert_eq!(nesting_depth(&json!([])), 1);
        assert_eq!(nesting_depth(&json!({"a": [1, {"b": {}}]})), 4);
    }

    #[test]
    fn test_admit_accepts_small_input() {
        let value = admit(r#"{"b": 1, "a": 2}"#, &InputLimits::free()).unwrap();
        let keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["b", "a"]);
    }

    #[test]
    fn test_admit_rejects_by_each_limit() {
        let limits = InputLimits {
            max_bytes: 40,
            max_lines: 2,
            max_depth: 2,
            max_nodes: 5,
        };

        assert!(matches!(
            admit(&"x".repeat(41), &limits),
            Err(PolicyError::TooLarge { actual: 41, limit: 40 })
        ));
        assert!(matches!(
            admit("[\n1,\n2\n]", &limits),
            Err(PolicyError::TooManyLines { actual: 4, .. })
        ));
        assert!(matches!(
            admit("[[[1]]]", &limits),
            Err(PolicyError::TooDeep { actual: 3, limit: 2 })
        ));
        assert!(matches!(admit("{oops", &limits), Err(PolicyError::Parse(_))));
    }

    #[test]
    fn test_node_count_check() {
        let limits = InputLimits::free();
        assert!(check_node_count(500, &limits).is_ok());
        assert!(matches!(
            check_node_count(501, &limits),
            Err(PolicyError::TooManyNodes { actual: 501, limit: 500 })
        ));
    }

    #[test]
    fn test_tier_parsing() {
        assert_eq!("Premium".parse::<Tier>(), Ok(Tier::Premium));
        assert_eq!("free".parse::<Tier>(), Ok(Tier::Free));
        assert!("gold".parse::<Tier>().is_err());
    }
}
