//! CLI module
//!
//! Command-line interface for running the tap.
//!
//! # Commands
//!
//! - `sync` - Extract the selected streams and emit records and state
//! - `discover` - Print the catalog of available streams
//! - `check` - Log on, switch to the office, and log off
//! - `streams` - List stream names (lightweight)
//! - `browse-fields` - Dump the remote field definitions of one report
//! - `all-browse-fields` - Dump every browse field the remote offers

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;
