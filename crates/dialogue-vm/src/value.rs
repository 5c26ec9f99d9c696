//! Runtime values
//!
//! The closed set of scalar types a dialogue script can manipulate.
//! Equality is structural; truthiness follows each variant's conventional
//! definition and drives the `and`/`or` connectives.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A runtime scalar value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Integer(i64),
    Boolean(bool),
    String(String),
    /// A declared-but-uninitialised variable
    Absent,
}

impl Value {
    /// Conventional truthiness: non-zero, the boolean itself, non-empty,
    /// and `Absent` is always falsy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Integer(i) => *i != 0,
            Value::Boolean(b) => *b,
            Value::String(s) => !s.is_empty(),
            Value::Absent => false,
        }
    }

}

impl Default for Value {
    fn default() -> Self {
        Value::Absent
    }
}

/// Textual form used by `$name` template expansion. Spellings match the
/// surface language's literals (`true`, `false`, `none`).
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(i) => write!(f, "{i}"),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::String(s) => write!(f, "{s}"),
            Value::Absent => write!(f, "none"),
        }
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}
