//! Stream schemas
//!
//! Generates the JSON schema of each stream's records from its field
//! mappings. The schema is advertised in the catalog and in `SCHEMA`
//! messages; it plays no part in cleaning.

mod generate;
mod types;

pub use generate::{field_schema, groups_schema, stream_schema};
pub use types::{JsonSchema, JsonType, JsonTypeOrArray, SchemaProperty};
