//! Output messages

use crate::clean::NormalizedRecord;
use crate::schema::{stream_schema, JsonSchema};
use crate::state::SyncState;
use crate::streams::StreamDefinition;
use crate::types::JsonValue;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

/// One line of output
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Message {
    /// Describes the records that follow for a stream
    Schema {
        stream: String,
        schema: JsonSchema,
        key_properties: Vec<String>,
        bookmark_properties: Vec<String>,
    },

    /// One cleaned record
    Record {
        stream: String,
        record: JsonValue,
        time_extracted: String,
    },

    /// State checkpoint
    State { value: SyncState },
}

impl Message {
    /// Create a schema message for a stream
    pub fn schema(stream: &StreamDefinition) -> Self {
        Self::Schema {
            stream: stream.name.clone(),
            schema: stream_schema(stream),
            key_properties: vec![stream.key_field.clone()],
            bookmark_properties: stream.bookmark_properties(),
        }
    }

    /// Create a record message stamped with the current time
    pub fn record(stream: impl Into<String>, record: &NormalizedRecord) -> Self {
        Self::record_at(stream, record, Utc::now())
    }

    /// Create a record message with an explicit extraction time
    pub fn record_at(
        stream: impl Into<String>,
        record: &NormalizedRecord,
        extracted_at: DateTime<Utc>,
    ) -> Self {
        Self::Record {
            stream: stream.into(),
            record: record.to_json(),
            time_extracted: extracted_at.to_rfc3339_opts(SecondsFormat::Micros, true),
        }
    }

    /// Create a state message
    pub fn state(state: SyncState) -> Self {
        Self::State { value: state }
    }

    /// Message kind as written in the `type` field
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Schema { .. } => "SCHEMA",
            Self::Record { .. } => "RECORD",
            Self::State { .. } => "STATE",
        }
    }
}
