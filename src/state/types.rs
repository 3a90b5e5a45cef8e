//! State types for tracking sync progress
//!
//! These types are serialized to JSON and persisted between runs.

use crate::types::JsonValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Bookmark values of one stream, keyed by bookmark field
pub type StreamBookmarks = BTreeMap<String, JsonValue>;

/// Complete persisted state of the tap
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SyncState {
    /// Per-stream bookmarks
    #[serde(default)]
    pub bookmarks: BTreeMap<String, StreamBookmarks>,

    /// Stream being extracted when the state was written, if any
    #[serde(default)]
    pub currently_syncing: Option<String>,
}

impl SyncState {
    /// Create a new empty state
    pub fn new() -> Self {
        Self::default()
    }

    /// Bookmark of `stream` under `field`, when it is a string
    pub fn bookmark(&self, stream: &str, field: &str) -> Option<&str> {
        self.bookmarks.get(stream)?.get(field)?.as_str()
    }

    /// Set a bookmark unconditionally
    pub fn set_bookmark(&mut self, stream: &str, field: &str, value: impl Into<String>) {
        self.bookmarks
            .entry(stream.to_string())
            .or_default()
            .insert(field.to_string(), JsonValue::String(value.into()));
    }

    /// Set a bookmark unless the stored one is later.
    ///
    /// Returns whether the bookmark changed. Values are `YYYY-MM`, so string
    /// order is month order.
    pub fn advance_bookmark(&mut self, stream: &str, field: &str, value: &str) -> bool {
        match self.bookmark(stream, field) {
            Some(current) if current >= value => false,
            _ => {
                self.set_bookmark(stream, field, value);
                true
            }
        }
    }

    pub fn set_currently_syncing(&mut self, stream: Option<&str>) {
        self.currently_syncing = stream.map(str::to_string);
    }

    /// Drop every bookmark of a stream
    pub fn clear_stream(&mut self, stream: &str) {
        self.bookmarks.remove(stream);
    }
}
