//! Catalog types
//!
//! `discover` prints a catalog describing every registered stream; `sync`
//! accepts one back and extracts only the streams marked selected.

use crate::error::{Error, Result};
use crate::schema::stream_schema;
use crate::streams::{StreamDefinition, StreamRegistry};
use crate::types::{JsonObject, JsonValue, ReplicationMethod};
use serde::{Deserialize, Serialize};
use std::path::Path;

// ============================================================================
// Catalog Types
// ============================================================================

/// Available streams and their selection
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub streams: Vec<CatalogEntry>,
}

/// One stream in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub tap_stream_id: String,

    #[serde(default)]
    pub stream: String,

    #[serde(default)]
    pub key_properties: Vec<String>,

    #[serde(default)]
    pub replication_method: ReplicationMethod,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replication_key: Option<String>,

    #[serde(default)]
    pub bookmark_properties: Vec<String>,

    /// JSON schema of the stream's records
    #[serde(default)]
    pub schema: JsonValue,

    /// Top-level selection flag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected: Option<bool>,

    /// Breadcrumb metadata; an empty breadcrumb entry may carry `selected`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub metadata: Vec<MetadataEntry>,
}

/// Metadata attached to a breadcrumb
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataEntry {
    #[serde(default)]
    pub breadcrumb: Vec<String>,
    #[serde(default)]
    pub metadata: JsonObject,
}

impl CatalogEntry {
    /// Describe a registered stream, selected
    pub fn from_stream(stream: &StreamDefinition) -> Self {
        let mut metadata = JsonObject::new();
        metadata.insert("selected".to_string(), JsonValue::Bool(true));
        metadata.insert(
            "table-key-properties".to_string(),
            serde_json::json!([stream.key_field]),
        );
        metadata.insert(
            "forced-replication-method".to_string(),
            JsonValue::String(stream.replication_method.to_string()),
        );

        Self {
            tap_stream_id: stream.name.clone(),
            stream: stream.name.clone(),
            key_properties: vec![stream.key_field.clone()],
            replication_method: stream.replication_method,
            replication_key: Some(stream.replication_key.clone()),
            bookmark_properties: stream.bookmark_properties(),
            schema: stream_schema(stream).to_json(),
            selected: Some(true),
            metadata: vec![MetadataEntry {
                breadcrumb: Vec::new(),
                metadata,
            }],
        }
    }

    /// Whether the stream is selected.
    ///
    /// The top-level flag wins; otherwise the empty-breadcrumb metadata decides.
    pub fn is_selected(&self) -> bool {
        if let Some(selected) = self.selected {
            return selected;
        }
        self.metadata
            .iter()
            .find(|m| m.breadcrumb.is_empty())
            .and_then(|m| m.metadata.get("selected"))
            .and_then(JsonValue::as_bool)
            .unwrap_or(false)
    }
}

impl Catalog {
    /// Catalog of every stream in the registry
    pub fn discover(registry: &StreamRegistry) -> Self {
        Self {
            streams: registry.streams().iter().map(CatalogEntry::from_stream).collect(),
        }
    }

    /// Load a catalog from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("Failed to read catalog {}: {e}", path.display()))
        })?;
        Self::from_json_str(&contents)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn get(&self, stream: &str) -> Option<&CatalogEntry> {
        self.streams.iter().find(|s| s.tap_stream_id == stream)
    }

    /// Selected streams, in registry order.
    ///
    /// A selected stream the registry does not know is an error.
    pub fn selection<'r>(&self, registry: &'r StreamRegistry) -> Result<Vec<&'r StreamDefinition>> {
        for entry in self.streams.iter().filter(|e| e.is_selected()) {
            if !registry.contains(&entry.tap_stream_id) {
                return Err(Error::stream_not_found(&entry.tap_stream_id));
            }
        }

        Ok(registry
            .streams()
            .iter()
            .filter(|s| self.get(&s.name).is_some_and(CatalogEntry::is_selected))
            .collect())
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
