//! Output module
//!
//! Emits the tap's output protocol: newline-delimited JSON messages on
//! stdout.
//!
//! # Overview
//!
//! - [`Message`] - `SCHEMA`, `RECORD` and `STATE` messages
//! - [`RecordSink`] - where messages go
//! - [`SingerWriter`] - JSON-lines sink over any `io::Write`
//! - [`MemorySink`] - sink that keeps messages in memory

mod message;
mod writer;

pub use message::Message;
pub use writer::{MemorySink, RecordSink, SingerWriter};
