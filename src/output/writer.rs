//! Message sinks

use super::message::Message;
use crate::error::{Error, Result};
use std::io::{self, BufWriter, Stdout, Write};

/// Destination of output messages
pub trait RecordSink: Send {
    /// Write one message
    fn write(&mut self, message: &Message) -> Result<()>;

    /// Flush anything buffered
    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Writes each message as one line of JSON
#[derive(Debug)]
pub struct SingerWriter<W: Write> {
    out: W,
    written: usize,
}

impl SingerWriter<BufWriter<Stdout>> {
    /// Writer on buffered stdout
    pub fn stdout() -> Self {
        Self::new(BufWriter::new(io::stdout()))
    }
}

impl<W: Write> SingerWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out, written: 0 }
    }

    /// Number of messages written so far
    pub fn written(&self) -> usize {
        self.written
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> RecordSink for SingerWriter<W> {
    fn write(&mut self, message: &Message) -> Result<()> {
        serde_json::to_writer(&mut self.out, message)?;
        self.out.write_all(b"\n")?;
        self.written += 1;

        // state lines are checkpoints; make them visible immediately
        if matches!(message, Message::State { .. }) {
            self.out.flush()?;
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.out.flush().map_err(Error::from)
    }
}

/// Keeps every message in memory
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    pub messages: Vec<Message>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages of one kind (`SCHEMA`, `RECORD` or `STATE`)
    pub fn of_kind(&self, kind: &str) -> Vec<&Message> {
        self.messages.iter().filter(|m| m.kind() == kind).collect()
    }

    /// Record payloads written for `stream`
    pub fn records(&self, stream: &str) -> Vec<&crate::types::JsonValue> {
        self.messages
            .iter()
            .filter_map(|m| match m {
                Message::Record { stream: s, record, .. } if s == stream => Some(record),
                _ => None,
            })
            .collect()
    }
}

impl RecordSink for MemorySink {
    fn write(&mut self, message: &Message) -> Result<()> {
        self.messages.push(message.clone());
        Ok(())
    }
}
