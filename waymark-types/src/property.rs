use std::collections::HashMap;
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Property bag attached to a rendered shape.
pub type Properties = HashMap<String, PropertyValue>;

/// Value of a shape property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    /// Boolean value.
    Bool(bool),
    /// Signed integer value.
    Int64(i64),
    /// Unsigned integer value.
    Uint64(u64),
    /// Floating point value.
    Double(f64),
    /// String value.
    String(String),
    /// Explicit absence of a value.
    Null,
}

impl PropertyValue {
    /// Returns true if the value counts as "set": `true`, a non-zero number or a non-empty string.
    pub fn is_truthy(&self) -> bool {
        match self {
            PropertyValue::Bool(v) => *v,
            PropertyValue::Int64(v) => *v != 0,
            PropertyValue::Uint64(v) => *v != 0,
            PropertyValue::Double(v) => *v != 0.0 && !v.is_nan(),
            PropertyValue::String(v) => !v.is_empty(),
            PropertyValue::Null => false,
        }
    }

    /// Numeric value of the property, if it is a number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            PropertyValue::Int64(v) => Some(*v as f64),
            PropertyValue::Uint64(v) => Some(*v as f64),
            PropertyValue::Double(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns true for [`PropertyValue::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, PropertyValue::Null)
    }
}

impl Display for PropertyValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            PropertyValue::Bool(v) => write!(f, "{v}"),
            PropertyValue::Int64(v) => write!(f, "{v}"),
            PropertyValue::Uint64(v) => write!(f, "{v}"),
            PropertyValue::Double(v) => write!(f, "{v}"),
            PropertyValue::String(v) => write!(f, "{v}"),
            PropertyValue::Null => write!(f, "<NULL>"),
        }
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        Self::Int64(value)
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        Self::Double(value)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}
