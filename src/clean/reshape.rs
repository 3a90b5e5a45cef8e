//! Building the intermediate row the field mapping reads from

use super::value::{FieldValue, Group};
use crate::error::{Error, Result};
use crate::streams::{GroupReshape, StreamDefinition};
use crate::types::{OptionStringExt, RawRow};
use std::collections::BTreeMap;

/// Source label to value, holding exactly the fields the mapping reads
pub type IntermediateRow = BTreeMap<String, FieldValue>;

/// Project the raw row onto the mapping's source columns, applying the
/// stream's reshape when it has one
pub fn intermediate_row(stream: &StreamDefinition, raw: &RawRow) -> Result<IntermediateRow> {
    let groups = stream.reshape.as_ref().map(|r| &r.groups);
    let mut row = IntermediateRow::new();

    for field in &stream.fields {
        let value = match groups {
            Some(spec) if field.source == spec.target => {
                FieldValue::Groups(collect_groups(stream, spec, raw)?)
            }
            _ => cell(stream, raw, &field.source)?,
        };
        row.insert(field.source.clone(), value);
    }

    Ok(row)
}

/// Fold the numbered group columns into a list of exactly `spec.count` entries
pub fn collect_groups(
    stream: &StreamDefinition,
    spec: &GroupReshape,
    raw: &RawRow,
) -> Result<Vec<Group>> {
    (1..=spec.count)
        .map(|n| {
            Ok(Group {
                group: text(stream, raw, &spec.group_column(n))?,
                group_name: text(stream, raw, &spec.name_column(n))?,
            })
        })
        .collect()
}

fn cell(stream: &StreamDefinition, raw: &RawRow, column: &str) -> Result<FieldValue> {
    raw.get(column)
        .map(|v| FieldValue::from_cell(v.as_deref()))
        .ok_or_else(|| Error::missing_column(&stream.name, column))
}

/// Group entries normalize empty text to null
fn text(stream: &StreamDefinition, raw: &RawRow, column: &str) -> Result<Option<String>> {
    raw.get(column)
        .map(|v| v.clone().none_if_empty())
        .ok_or_else(|| Error::missing_column(&stream.name, column))
}
