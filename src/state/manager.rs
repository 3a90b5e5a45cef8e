//! State manager implementation
//!
//! Provides file-based state persistence with atomic writes.

use super::types::SyncState;
use crate::error::{Error, Result};
use crate::streams::StreamDefinition;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};

/// State manager for persisting and loading state
#[derive(Debug)]
pub struct StateManager {
    /// Path to the state file
    path: PathBuf,
    /// Current state (cached)
    state: Arc<RwLock<SyncState>>,
    /// Whether to persist on every update
    auto_save: bool,
}

impl StateManager {
    /// Create a new state manager with the given path
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            state: Arc::new(RwLock::new(SyncState::new())),
            auto_save: true,
        }
    }

    /// Create an in-memory state manager (no file persistence)
    pub fn in_memory() -> Self {
        Self {
            path: PathBuf::new(),
            state: Arc::new(RwLock::new(SyncState::new())),
            auto_save: false,
        }
    }

    /// Create an in-memory state manager seeded with `state`
    pub fn with_state(state: SyncState) -> Self {
        Self {
            path: PathBuf::new(),
            state: Arc::new(RwLock::new(state)),
            auto_save: false,
        }
    }

    /// Create a state manager from a file, loading existing state if present
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let state = if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .map_err(|e| Error::state(format!("Failed to read state file: {e}")))?;
            parse_state(&contents)?
        } else {
            SyncState::new()
        };

        Ok(Self {
            path,
            state: Arc::new(RwLock::new(state)),
            auto_save: true,
        })
    }

    /// Create a state manager from inline JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let state = serde_json::from_str(json)
            .map_err(|e| Error::state(format!("Failed to parse state JSON: {e}")))?;
        Ok(Self::with_state(state))
    }

    /// Load state from file
    pub async fn load(&self) -> Result<()> {
        if self.is_in_memory() || !self.path.exists() {
            return Ok(());
        }

        let contents = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| Error::state(format!("Failed to read state file: {e}")))?;
        let loaded = parse_state(&contents)?;

        *self.state.write().await = loaded;
        Ok(())
    }

    /// Save current state to file
    pub async fn save(&self) -> Result<()> {
        if self.is_in_memory() {
            return Ok(());
        }

        let contents = self.to_json_pretty().await?;

        // Write to temp file first, then rename for atomicity
        let temp_path = self.path.with_extension("tmp");
        tokio::fs::write(&temp_path, &contents)
            .await
            .map_err(|e| Error::state(format!("Failed to write state file: {e}")))?;

        tokio::fs::rename(&temp_path, &self.path)
            .await
            .map_err(|e| Error::state(format!("Failed to rename state file: {e}")))?;

        debug!("State written to {}", self.path.display());
        Ok(())
    }

    /// A copy of the current state
    pub async fn snapshot(&self) -> SyncState {
        self.state.read().await.clone()
    }

    /// Get a read lock on the current state
    pub async fn state(&self) -> tokio::sync::RwLockReadGuard<'_, SyncState> {
        self.state.read().await
    }

    /// Export state as JSON string
    pub async fn to_json(&self) -> Result<String> {
        let state = self.state.read().await;
        serde_json::to_string(&*state)
            .map_err(|e| Error::state(format!("Failed to serialize state: {e}")))
    }

    /// Export state as pretty-printed JSON string
    pub async fn to_json_pretty(&self) -> Result<String> {
        let state = self.state.read().await;
        serde_json::to_string_pretty(&*state)
            .map_err(|e| Error::state(format!("Failed to serialize state: {e}")))
    }

    /// Bookmark of a stream under its bookmark field
    pub async fn get_bookmark(&self, stream: &StreamDefinition) -> Option<String> {
        let state = self.state.read().await;
        state
            .bookmark(&stream.name, &stream.bookmark_field)
            .map(ToString::to_string)
    }

    /// Mark `stream` as the one being extracted and persist
    pub async fn begin_stream(&self, stream: &str) -> Result<()> {
        self.state
            .write()
            .await
            .set_currently_syncing(Some(stream));
        self.persist().await
    }

    /// Advance the bookmark of a stream still being extracted and persist.
    ///
    /// `currently_syncing` is left as is.
    pub async fn checkpoint(&self, stream: &StreamDefinition, bookmark: &str) -> Result<()> {
        self.state
            .write()
            .await
            .advance_bookmark(&stream.name, &stream.bookmark_field, bookmark);
        self.persist().await
    }

    /// Record a finished stream: advance its bookmark when one is given,
    /// clear `currently_syncing`, and persist.
    ///
    /// Bookmarks only move forward; an earlier value leaves the stored one.
    pub async fn update(&self, stream: &StreamDefinition, bookmark: Option<&str>) -> Result<()> {
        {
            let mut state = self.state.write().await;
            if let Some(value) = bookmark {
                let behind = state
                    .bookmark(&stream.name, &stream.bookmark_field)
                    .is_some_and(|current| current > value);
                if state.advance_bookmark(&stream.name, &stream.bookmark_field, value) {
                    debug!("Bookmark of '{}' advanced to {}", stream.name, value);
                } else if behind {
                    warn!(
                        "Ignoring bookmark {} for '{}': behind the stored value",
                        value, stream.name
                    );
                }
            }
            state.set_currently_syncing(None);
        }
        self.persist().await
    }

    /// Clear `currently_syncing` and persist
    pub async fn finish(&self) -> Result<()> {
        self.state.write().await.set_currently_syncing(None);
        self.persist().await
    }

    /// Clear all state
    pub async fn clear(&self) -> Result<()> {
        *self.state.write().await = SyncState::new();
        self.persist().await
    }

    /// Clear state for a specific stream
    pub async fn clear_stream(&self, stream: &str) -> Result<()> {
        self.state.write().await.clear_stream(stream);
        self.persist().await
    }

    /// Get the state file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check if using in-memory mode
    pub fn is_in_memory(&self) -> bool {
        self.path.as_os_str().is_empty()
    }

    async fn persist(&self) -> Result<()> {
        if self.auto_save {
            self.save().await?;
        }
        Ok(())
    }
}

impl Clone for StateManager {
    fn clone(&self) -> Self {
        Self {
            path: self.path.clone(),
            state: Arc::clone(&self.state),
            auto_save: self.auto_save,
        }
    }
}

/// Parse a state file. An empty file is an empty state.
fn parse_state(contents: &str) -> Result<SyncState> {
    if contents.trim().is_empty() {
        return Ok(SyncState::new());
    }
    serde_json::from_str(contents)
        .map_err(|e| Error::state(format!("Failed to parse state file: {e}")))
}
