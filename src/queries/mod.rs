//! Query template store
//!
//! One browse query per report code, embedded at compile time. Each template
//! carries `:period_lower:` and `:period_upper:` tokens that are filled with a
//! `YYYY/MM` month before the query is sent.

mod store;

pub use store::{all_browse_fields_query, browse_fields_query, QueryStore, QueryTemplate};
