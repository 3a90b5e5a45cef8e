//! Row cleaning
//!
//! Pure transformation of one raw report line into a normalized record:
//!
//! 1. derive the primary key ([`keys`])
//! 2. optionally fold grouped columns into a nested list ([`reshape`])
//! 3. rename, type and null-normalize every mapped field ([`coerce`])
//!
//! The same raw row and ordinal always produce the same record.

pub mod coerce;
pub mod keys;
pub mod reshape;

mod cleaner;
mod value;

pub use cleaner::{NormalizedRecord, RowCleaner};
pub use coerce::{parse_timestamp, to_typed_or_null};
pub use value::{FieldValue, Group};

#[cfg(test)]
mod tests;
