//! Execution engine module
//!
//! Runs a sync: every selected stream, in registry order, from its bookmark
//! (or the configured start date) through the end month.
//!
//! # Overview
//!
//! For each stream the engine
//! 1. marks it as `currently_syncing` and persists the state
//! 2. emits its `SCHEMA` message
//! 3. drains the month batches, emitting a `RECORD` per record and
//!    checkpointing the bookmark after each month
//! 4. records the final bookmark, clears `currently_syncing`, persists, and
//!    emits a `STATE` message
//!
//! `FULL_TABLE` streams always start at the configured start date and never
//! store a bookmark; only `currently_syncing` is tracked for them.
//!
//! The first error stops the run; the persisted bookmark then points at the
//! last month that was fully emitted.

mod types;

pub use types::{StreamStats, SyncConfig, SyncStats};

use crate::client::ExtractionClient;
use crate::error::Result;
use crate::output::{Message, RecordSink};
use crate::period::{months_between, YearMonth};
use crate::session::Transport;
use crate::state::{bookmark_value, StateManager};
use crate::streams::StreamDefinition;
use crate::types::ReplicationMethod;
use futures::TryStreamExt;
use std::time::Instant;
use tracing::{debug, info};

/// Sync engine for orchestrating data extraction
pub struct SyncEngine<'a, T> {
    /// Extraction client with an open session
    client: &'a ExtractionClient<T>,
    /// State manager
    state: StateManager,
    /// Sync configuration
    config: SyncConfig,
}

impl<'a, T: Transport> SyncEngine<'a, T> {
    /// Create a new sync engine
    pub fn new(client: &'a ExtractionClient<T>, state: StateManager, config: SyncConfig) -> Self {
        Self {
            client,
            state,
            config,
        }
    }

    /// Get the state manager
    pub fn state(&self) -> &StateManager {
        &self.state
    }

    /// Sync every registered stream
    pub async fn run_all(&self, sink: &mut dyn RecordSink) -> Result<SyncStats> {
        let streams: Vec<&StreamDefinition> = self.client.registry().streams().iter().collect();
        self.run(&streams, sink).await
    }

    /// Sync the given streams in order
    pub async fn run(
        &self,
        streams: &[&StreamDefinition],
        sink: &mut dyn RecordSink,
    ) -> Result<SyncStats> {
        let started = Instant::now();
        let mut stats = SyncStats::new();

        for stream in streams {
            let stream_stats = self.sync_stream(stream, sink).await?;
            stats.add_stream(stream_stats);
        }

        self.state.finish().await?;
        sink.flush()?;

        stats.set_duration(u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX));
        info!(
            "Sync finished: {} records from {} months across {} streams",
            stats.records_synced, stats.months_fetched, stats.streams_synced
        );
        Ok(stats)
    }

    /// Month a stream resumes from
    pub async fn start_month(&self, stream: &StreamDefinition) -> Result<YearMonth> {
        if stream.replication_method == ReplicationMethod::FullTable {
            return Ok(self.config.start_date);
        }
        match self.state.get_bookmark(stream).await {
            Some(bookmark) => {
                debug!("Resuming '{}' from bookmark {}", stream.name, bookmark);
                YearMonth::parse_start(&bookmark)
            }
            None => Ok(self.config.start_date),
        }
    }

    /// Sync one stream
    pub async fn sync_stream(
        &self,
        stream: &StreamDefinition,
        sink: &mut dyn RecordSink,
    ) -> Result<StreamStats> {
        let start = self.start_month(stream).await?;
        let end = self.config.end_month();
        info!("Starting sync for stream: {} from {}", stream.name, start);

        self.state.begin_stream(&stream.name).await?;
        sink.write(&Message::schema(stream))?;

        let mut stats = StreamStats {
            stream: stream.name.clone(),
            ..StreamStats::default()
        };
        let incremental = stream.replication_method == ReplicationMethod::Incremental;
        let mut latest: Option<String> = None;

        let mut batches = self
            .client
            .batches_between(&stream.name, months_between(start, end))?;

        while let Some(batch) = batches.try_next().await? {
            stats.months += 1;
            let mut month_bookmark = None;

            for record in &batch.records {
                if let Some(value) = bookmark_value(stream, record)? {
                    month_bookmark = Some(value);
                }
                sink.write(&Message::record(&stream.name, record))?;
                stats.records += 1;
            }

            if let Some(value) = month_bookmark.filter(|_| incremental) {
                self.state.checkpoint(stream, &value).await?;
                latest = Some(value);
            }
        }

        self.state.update(stream, latest.as_deref()).await?;
        if incremental {
            stats.bookmark = self.state.get_bookmark(stream).await;
        }
        sink.write(&Message::state(self.state.snapshot().await))?;

        info!(
            "Finished stream {}: {} records in {} months",
            stream.name, stats.records, stats.months
        );
        Ok(stats)
    }
}
