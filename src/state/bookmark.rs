//! Bookmark derivation

use crate::clean::{FieldValue, NormalizedRecord};
use crate::error::{Error, Result};
use crate::period::YearMonth;
use crate::streams::{PeriodField, StreamDefinition};

/// The bookmark a cleaned record carries, as `YYYY-MM`.
///
/// Streams without a bookmark definition, and records whose period fields
/// are null, have none.
pub fn bookmark_value(stream: &StreamDefinition, record: &NormalizedRecord) -> Result<Option<String>> {
    let Some(bookmark) = &stream.bookmark else {
        return Ok(None);
    };

    let month = match bookmark {
        PeriodField::YearPeriod { field } => match record.get(field) {
            None | Some(FieldValue::Null) => return Ok(None),
            Some(value) => {
                let text = value
                    .as_str()
                    .ok_or_else(|| Error::conversion(describe(value), "year-period", "expected YYYY/MM text"))?;
                YearMonth::parse_period(text)?
            }
        },
        PeriodField::YearAndPeriod { year, period } => {
            let (Some(year), Some(period)) = (number(record, year)?, number(record, period)?) else {
                return Ok(None);
            };
            let year = i32::try_from(year)
                .map_err(|e| Error::conversion(year.to_string(), "year", e.to_string()))?;
            let month = u32::try_from(period)
                .map_err(|e| Error::conversion(period.to_string(), "period", e.to_string()))?;
            YearMonth::new(year, month)?
        }
    };

    Ok(Some(month.to_bookmark()))
}

/// An integer field, accepting digits stored as text
fn number(record: &NormalizedRecord, field: &str) -> Result<Option<i64>> {
    match record.get(field) {
        None | Some(FieldValue::Null) => Ok(None),
        Some(FieldValue::Integer(n)) => Ok(Some(*n)),
        Some(FieldValue::String(s)) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|e: std::num::ParseIntError| Error::conversion(s.clone(), "integer", e.to_string())),
        Some(other) => Err(Error::conversion(describe(other), "integer", "unexpected value type")),
    }
}

fn describe(value: &FieldValue) -> String {
    value.to_json().to_string()
}
