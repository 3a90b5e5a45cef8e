//! State management module
//!
//! Tracks per-stream bookmarks between runs so incremental syncs resume at
//! the last month that was fully processed.
//!
//! # Overview
//!
//! - [`SyncState`] - the persisted document
//!   (`{"bookmarks": {stream: {field: "YYYY-MM"}}, "currently_syncing": ...}`)
//! - [`StateManager`] - file-backed persistence with atomic writes
//! - [`bookmark_value`] - the cursor a cleaned record carries

mod bookmark;
mod manager;
mod types;

pub use bookmark::bookmark_value;
pub use manager::StateManager;
pub use types::SyncState;
