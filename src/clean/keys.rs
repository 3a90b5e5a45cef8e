//! Primary key derivation

use super::value::FieldValue;
use crate::error::{Error, Result};
use crate::streams::{PeriodField, StreamDefinition};
use crate::types::{KeyStrategy, RawRow};
use sha2::{Digest, Sha256};

/// Width of the zero-padded ordinal in composite keys
pub const ORDINAL_WIDTH: usize = 10;

/// Derive the key of a raw row with the stream's strategy
pub fn derive_key(stream: &StreamDefinition, raw: &RawRow, ordinal: usize) -> Result<FieldValue> {
    match stream.key_strategy {
        KeyStrategy::Composite => {
            let period = period_digits(stream, raw)?;
            composite_key(&period, ordinal).map(FieldValue::Integer)
        }
        KeyStrategy::ContentHash => Ok(FieldValue::String(content_hash(raw))),
    }
}

/// Period digits followed by the zero-padded ordinal: `("202101", 7)` gives `2021010000000007`
pub fn composite_key(period_digits: &str, ordinal: usize) -> Result<i64> {
    let key = format!("{period_digits}{ordinal:0width$}", width = ORDINAL_WIDTH);
    key.parse::<i64>()
        .map_err(|e| Error::conversion(key.as_str(), "integer key", e.to_string()))
}

/// SHA-256 over every label and value of the row, hex encoded.
///
/// Labels are visited in sorted order, so the hash only depends on content.
pub fn content_hash(raw: &RawRow) -> String {
    let mut hasher = Sha256::new();
    for (label, value) in raw {
        hasher.update(label.as_bytes());
        hasher.update([0x1f]);
        match value {
            Some(v) => {
                hasher.update([0x01]);
                hasher.update(v.as_bytes());
            }
            None => hasher.update([0x00]),
        }
        hasher.update([0x1e]);
    }
    hex::encode(hasher.finalize())
}

/// `YYYYMM` digits of the row's period, read from the raw columns
pub fn period_digits(stream: &StreamDefinition, raw: &RawRow) -> Result<String> {
    match &stream.period {
        PeriodField::YearPeriod { field } => {
            let value = raw_text(stream, raw, field)?;
            let digits: String = value.trim().chars().filter(|c| *c != '/').collect();
            if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
                return Err(Error::conversion(value, "year period", "expected YYYY/MM"));
            }
            Ok(digits)
        }
        PeriodField::YearAndPeriod { year, period } => {
            let year_text = raw_text(stream, raw, year)?;
            let year_value = year_text
                .trim()
                .parse::<u32>()
                .map_err(|e| Error::conversion(year_text, "year", e.to_string()))?;
            let period_text = raw_text(stream, raw, period)?;
            let period_value = period_text
                .trim()
                .parse::<u32>()
                .map_err(|e| Error::conversion(period_text, "period", e.to_string()))?;
            Ok(format!("{year_value:04}{period_value:02}"))
        }
    }
}

fn raw_text<'a>(stream: &StreamDefinition, raw: &'a RawRow, column: &str) -> Result<&'a str> {
    match raw.get(column) {
        Some(Some(text)) => Ok(text),
        Some(None) => Err(Error::conversion("", "period", format!("column '{column}' is empty"))),
        None => Err(Error::missing_column(&stream.name, column)),
    }
}
