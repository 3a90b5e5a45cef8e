// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # Twinfield tap
//!
//! Extracts accounting report data from the Twinfield web services and emits
//! it as schema, record and state messages for a downstream loader.
//!
//! ## Features
//!
//! - **Declarative Streams**: nine report streams described in embedded YAML
//! - **Month Windows**: every report is read one calendar month at a time
//! - **Typed Records**: raw cells are renamed, typed and null-normalized
//! - **Incremental Sync**: per-stream `YYYY-MM` bookmarks, persisted after each month
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use twinfield_tap::{
//!     client::ExtractionClient, config::TapConfig, http::SoapTransport,
//!     queries::QueryStore, session::Session, streams::StreamRegistry,
//! };
//! use futures::TryStreamExt;
//!
//! #[tokio::main]
//! async fn main() -> twinfield_tap::Result<()> {
//!     let config = TapConfig::from_file("config.json")?;
//!     let transport = SoapTransport::new(config.soap_config())?;
//!     let session = Session::new(transport, config.credentials());
//!
//!     let mut client = ExtractionClient::new(
//!         session,
//!         StreamRegistry::builtin()?,
//!         QueryStore::builtin(),
//!         &config.office,
//!     )?;
//!     client.open().await?;
//!
//!     let mut records = client.extract("bank_transactions", "2021-01")?;
//!     while let Some(record) = records.try_next().await? {
//!         println!("{}", record.to_json());
//!     }
//!     drop(records);
//!
//!     client.close().await
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//!  StreamRegistry   QueryStore        Session<SoapTransport>
//!        │              │                      │
//!        └──────────────┴──── ExtractionClient ┘
//!                                   │ months_from(start)
//!                                   │ render → execute → decode → clean
//!                                   ▼
//!                              SyncEngine ── StateManager (bookmarks)
//!                                   │
//!                               RecordSink (SCHEMA / RECORD / STATE)
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the tap
pub mod error;

/// Common types and type aliases
pub mod types;

/// Tap configuration
pub mod config;

/// Calendar month iteration
pub mod period;

/// Stream registry
pub mod streams;

/// Template interpolation
pub mod template;

/// Report query templates
pub mod queries;

/// Browse response decoding
pub mod decode;

/// Row cleaning and key derivation
pub mod clean;

/// Remote session lifecycle
pub mod session;

/// SOAP transport
pub mod http;

/// Per-stream extraction
pub mod client;

/// State management and bookmarks
pub mod state;

/// Record schemas
pub mod schema;

/// Stream catalog
pub mod catalog;

/// Output messages and sinks
pub mod output;

/// Sync orchestration
pub mod engine;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

pub use client::ExtractionClient;
pub use streams::StreamRegistry;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
