//! Stream registry
//!
//! Static, declarative metadata for every logical stream the tap can extract:
//! which report feeds it, how its primary key is built, where its bookmark
//! comes from and how each raw column is renamed and typed.
//!
//! The built-in registry is embedded YAML, parsed once at start-up and passed
//! explicitly to the cleaner and extraction client.

mod registry;
mod types;

pub use registry::StreamRegistry;
pub use types::{FieldMapping, GroupReshape, PeriodField, Reshape, StreamDefinition, TargetType};
