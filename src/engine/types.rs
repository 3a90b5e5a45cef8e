//! Engine types
//!
//! Configuration and statistics for the sync engine.

use crate::period::YearMonth;
use serde::Serialize;

/// Configuration for sync operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    /// First month for streams without a bookmark
    pub start_date: YearMonth,
    /// Last month to extract; the current month when unset
    pub until: Option<YearMonth>,
}

impl SyncConfig {
    /// Create a new sync config
    #[must_use]
    pub fn new(start_date: YearMonth) -> Self {
        Self {
            start_date,
            until: None,
        }
    }

    /// Stop at `month` instead of the current month
    #[must_use]
    pub fn with_until(mut self, month: YearMonth) -> Self {
        self.until = Some(month);
        self
    }

    /// Last month to extract
    pub fn end_month(&self) -> YearMonth {
        self.until.unwrap_or_else(YearMonth::current)
    }
}

/// Statistics of one extracted stream
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StreamStats {
    pub stream: String,
    pub records: usize,
    pub months: usize,
    /// Bookmark after the stream finished
    pub bookmark: Option<String>,
}

/// Statistics from a sync operation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncStats {
    /// Total records synced
    pub records_synced: usize,
    /// Total month queries sent
    pub months_fetched: usize,
    /// Total streams synced
    pub streams_synced: usize,
    /// Per-stream breakdown, in extraction order
    pub streams: Vec<StreamStats>,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl SyncStats {
    /// Create new stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold in a finished stream
    pub fn add_stream(&mut self, stream: StreamStats) {
        self.records_synced += stream.records;
        self.months_fetched += stream.months;
        self.streams_synced += 1;
        self.streams.push(stream);
    }

    /// Stats of one stream, if it was synced
    pub fn stream(&self, name: &str) -> Option<&StreamStats> {
        self.streams.iter().find(|s| s.stream == name)
    }

    /// Set duration
    pub fn set_duration(&mut self, ms: u64) {
        self.duration_ms = ms;
    }
}
