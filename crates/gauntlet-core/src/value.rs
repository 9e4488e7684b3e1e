//! Typed argument values and invocation tuples.
//!
//! Resolvers emit [`ArgumentTuple`]s; the external invocation loop consumes
//! each tuple exactly once. Values are never mutated after construction.

use serde::{Deserialize, Serialize};

/// One actual parameter value, in the closed set of types declarative
/// sources can produce.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ArgumentValue {
    Null,
    Bool(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    F32(f32),
    F64(f64),
    Char(char),
    Str(String),
    /// Reference to a named type (the "class literal" of a declarative source).
    TypeRef(String),
    EnumConstant {
        type_name: String,
        constant: String,
    },
    Array(Vec<ArgumentValue>),
    Map(Vec<(ArgumentValue, ArgumentValue)>),
    /// A value carrying its own display label.
    Named {
        name: String,
        value: Box<ArgumentValue>,
    },
}

impl ArgumentValue {
    pub fn is_null(&self) -> bool {
        matches!(self, ArgumentValue::Null)
    }

    pub fn named(name: impl Into<String>, value: ArgumentValue) -> Self {
        ArgumentValue::Named {
            name: name.into(),
            value: Box::new(value),
        }
    }

    /// Strip a `Named` wrapper, returning the label (if any) and the inner value.
    pub fn unwrap_named(self) -> (Option<String>, ArgumentValue) {
        match self {
            ArgumentValue::Named { name, value } => (Some(name), *value),
            other => (None, other),
        }
    }
}

impl std::fmt::Display for ArgumentValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArgumentValue::Null => write!(f, "null"),
            ArgumentValue::Bool(v) => write!(f, "{}", v),
            ArgumentValue::I8(v) => write!(f, "{}", v),
            ArgumentValue::I16(v) => write!(f, "{}", v),
            ArgumentValue::I32(v) => write!(f, "{}", v),
            ArgumentValue::I64(v) => write!(f, "{}", v),
            ArgumentValue::F32(v) => write!(f, "{}", v),
            ArgumentValue::F64(v) => write!(f, "{}", v),
            ArgumentValue::Char(v) => write!(f, "{}", v),
            ArgumentValue::Str(v) => write!(f, "{}", v),
            ArgumentValue::TypeRef(v) => write!(f, "{}", v),
            ArgumentValue::EnumConstant { constant, .. } => write!(f, "{}", constant),
            ArgumentValue::Array(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            ArgumentValue::Map(entries) => {
                write!(f, "{{")?;
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}={}", k, v)?;
                }
                write!(f, "}}")
            }
            ArgumentValue::Named { name, .. } => write!(f, "{}", name),
        }
    }
}

/// One ordered, fixed-length set of actual parameters for one invocation.
///
/// Optionally carries a display name, set when the tuple came from a
/// header-aware CSV row or an explicit named set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArgumentTuple {
    pub name: Option<String>,
    pub values: Vec<ArgumentValue>,
}

impl ArgumentTuple {
    pub fn of(values: Vec<ArgumentValue>) -> Self {
        ArgumentTuple { name: None, values }
    }

    pub fn named(name: impl Into<String>, values: Vec<ArgumentValue>) -> Self {
        ArgumentTuple {
            name: Some(name.into()),
            values,
        }
    }

    /// Convenience for the ubiquitous one-argument tuple.
    pub fn single(value: ArgumentValue) -> Self {
        ArgumentTuple::of(vec![value])
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The raw values for the invocation, with `Named` wrappers stripped.
    pub fn into_values(self) -> Vec<ArgumentValue> {
        self.values
            .into_iter()
            .map(|v| v.unwrap_named().1)
            .collect()
    }

    /// Human-readable invocation label: the explicit name when present,
    /// otherwise the comma-joined value displays.
    pub fn display_name(&self, invocation_index: usize) -> String {
        let body = match &self.name {
            Some(name) => name.clone(),
            None => self
                .values
                .iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join(", "),
        };
        format!("[{}] {}", invocation_index, body)
    }
}
