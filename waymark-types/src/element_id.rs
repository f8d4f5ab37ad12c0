use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::error::WaymarkTypesError;
use crate::PropertyValue;

/// Identifier of an interactive element, unique within its layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ElementId {
    /// Integer id.
    Int(i64),
    /// String id.
    String(String),
}

impl Display for ElementId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ElementId::Int(v) => write!(f, "{v}"),
            ElementId::String(v) => write!(f, "{v}"),
        }
    }
}

impl From<i64> for ElementId {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for ElementId {
    fn from(value: i32) -> Self {
        Self::Int(value.into())
    }
}

impl From<u32> for ElementId {
    fn from(value: u32) -> Self {
        Self::Int(value.into())
    }
}

impl From<&str> for ElementId {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for ElementId {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl TryFrom<&PropertyValue> for ElementId {
    type Error = WaymarkTypesError;

    fn try_from(value: &PropertyValue) -> Result<Self, Self::Error> {
        match value {
            PropertyValue::String(v) => Ok(Self::String(v.clone())),
            PropertyValue::Int64(v) => Ok(Self::Int(*v)),
            PropertyValue::Uint64(v) => i64::try_from(*v)
                .map(Self::Int)
                .map_err(|_| WaymarkTypesError::Conversion(format!("id {v} is out of range"))),
            PropertyValue::Double(v)
                if v.fract() == 0.0 && *v >= i64::MIN as f64 && *v < i64::MAX as f64 =>
            {
                Ok(Self::Int(*v as i64))
            }
            other => Err(WaymarkTypesError::Conversion(format!(
                "{other} cannot be used as an element id"
            ))),
        }
    }
}
