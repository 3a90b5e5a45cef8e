//! Extraction client
//!
//! Drives one stream at a time through the remote: for every month from the
//! start date through the current month it renders the stream's query, sends
//! it over the open session, decodes the browse response and cleans each row.
//!
//! Records are produced lazily. A month is requested only after every record
//! of the previous month has been consumed, and nothing is retried.

mod client;

pub use client::{BatchStream, ExtractionClient, MonthBatch, RecordStream};

#[cfg(test)]
pub(crate) mod tests;
