//! Row cleaner

use super::coerce::to_typed_or_null;
use super::keys::derive_key;
use super::reshape::intermediate_row;
use super::value::FieldValue;
use crate::error::Result;
use crate::streams::StreamDefinition;
use crate::types::{JsonObject, JsonValue, RawRow};
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

/// A cleaned record: mapped field name to typed value, always carrying the key
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NormalizedRecord {
    fields: BTreeMap<String, FieldValue>,
}

impl NormalizedRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: impl Into<String>, value: FieldValue) {
        self.fields.insert(field.into(), value);
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// JSON object form of the record
    pub fn to_json(&self) -> JsonValue {
        let object: JsonObject = self
            .fields
            .iter()
            .map(|(k, v)| (k.clone(), v.to_json()))
            .collect();
        JsonValue::Object(object)
    }
}

impl Serialize for NormalizedRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

/// Cleans the raw rows of one stream
#[derive(Debug, Clone)]
pub struct RowCleaner {
    stream: StreamDefinition,
}

impl RowCleaner {
    pub fn new(stream: StreamDefinition) -> Self {
        Self { stream }
    }

    pub fn stream(&self) -> &StreamDefinition {
        &self.stream
    }

    /// Clean one raw row; `ordinal` is its 0-based position within the month
    pub fn clean(&self, raw: &RawRow, ordinal: usize) -> Result<NormalizedRecord> {
        let key = derive_key(&self.stream, raw, ordinal)?;
        let intermediate = intermediate_row(&self.stream, raw)?;

        let mut record = NormalizedRecord::new();
        record.insert(self.stream.key_field.clone(), key);

        for field in &self.stream.fields {
            let value = intermediate
                .get(&field.source)
                .cloned()
                .unwrap_or(FieldValue::Null);
            let typed = to_typed_or_null(value, field.target_type, field.nullable)?;
            record.insert(field.target.clone(), typed);
        }

        Ok(record)
    }
}
