//! Typed field values

use crate::types::JsonValue;
use chrono::{DateTime, FixedOffset, SecondsFormat};
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};
use std::str::FromStr;

/// One entry of a nested `groups` list
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Group {
    pub group: Option<String>,
    pub group_name: Option<String>,
}

impl Group {
    pub fn is_empty(&self) -> bool {
        self.group.is_none() && self.group_name.is_none()
    }
}

/// Value of a field in a raw, reshaped or normalized row
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    String(String),
    Integer(i64),
    Decimal(Decimal),
    Timestamp(DateTime<FixedOffset>),
    Groups(Vec<Group>),
}

impl FieldValue {
    /// Raw cell text as a value; a cell without text is null
    pub fn from_cell(cell: Option<&str>) -> Self {
        cell.map_or(Self::Null, |s| Self::String(s.to_string()))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Null, empty text and empty lists all count as "no value"
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Null => true,
            Self::String(s) => s.is_empty(),
            Self::Groups(groups) => groups.is_empty(),
            _ => false,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            Self::Decimal(d) => Some(*d),
            _ => None,
        }
    }

    /// JSON form; decimals become exact numbers, timestamps RFC 3339 strings
    pub fn to_json(&self) -> JsonValue {
        match self {
            Self::Null => JsonValue::Null,
            Self::String(s) => JsonValue::String(s.clone()),
            Self::Integer(n) => JsonValue::from(*n),
            Self::Decimal(d) => serde_json::Number::from_str(&d.to_string())
                .map_or_else(|_| JsonValue::String(d.to_string()), JsonValue::Number),
            Self::Timestamp(ts) => {
                JsonValue::String(ts.to_rfc3339_opts(SecondsFormat::AutoSi, false))
            }
            Self::Groups(groups) => serde_json::to_value(groups).unwrap_or(JsonValue::Null),
        }
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

impl From<Decimal> for FieldValue {
    fn from(d: Decimal) -> Self {
        Self::Decimal(d)
    }
}
