//! Schema generation from field mappings

use super::types::{JsonSchema, JsonType, SchemaProperty};
use crate::streams::{FieldMapping, StreamDefinition, TargetType};
use crate::types::KeyStrategy;
use std::collections::BTreeMap;

/// Schema of the records of `stream`.
///
/// The key is a required non-null property. Every mapped field is present
/// on every record and so listed as required, but typed nullable: an absent
/// cell yields null whatever the mapping says.
pub fn stream_schema(stream: &StreamDefinition) -> JsonSchema {
    let mut schema = JsonSchema::new();

    let key_type = match stream.key_strategy {
        KeyStrategy::Composite => JsonType::Integer,
        KeyStrategy::ContentHash => JsonType::String,
    };
    schema.add_property(&stream.key_field, SchemaProperty::new(key_type));
    schema.add_required(&stream.key_field);

    let groups_target = stream.reshape.as_ref().map(|r| r.groups.target.as_str());

    for field in &stream.fields {
        let property = if Some(field.target.as_str()) == groups_target {
            groups_schema()
        } else {
            field_schema(field)
        };
        schema.add_property(&field.target, property);
        schema.add_required(&field.target);
    }

    schema
}

/// Nullable property for one mapped field
pub fn field_schema(field: &FieldMapping) -> SchemaProperty {
    match field.target_type {
        TargetType::Integer => SchemaProperty::nullable(JsonType::Integer),
        TargetType::Decimal => SchemaProperty::nullable(JsonType::Number),
        TargetType::Timestamp => SchemaProperty::nullable(JsonType::String).with_format("date-time"),
        TargetType::String | TargetType::Identity => SchemaProperty::nullable(JsonType::String),
    }
}

/// List of `{group, group_name}` pairs
pub fn groups_schema() -> SchemaProperty {
    let mut pair = BTreeMap::new();
    pair.insert("group".to_string(), SchemaProperty::nullable(JsonType::String));
    pair.insert("group_name".to_string(), SchemaProperty::nullable(JsonType::String));
    SchemaProperty::array(SchemaProperty::object(pair))
}
