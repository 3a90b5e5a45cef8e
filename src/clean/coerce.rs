//! Type coercion with null normalization

use super::value::FieldValue;
use crate::error::{Error, Result};
use crate::streams::TargetType;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone};
use rust_decimal::Decimal;
use std::str::FromStr;

const HOUR: i32 = 3600;

/// Offsets of the timezone abbreviations accepted after a timestamp
const TIMEZONES: &[(&str, i32)] = &[
    ("UTC", 0),
    ("GMT", 0),
    ("Z", 0),
    ("WET", 0),
    ("WEST", HOUR),
    ("CET", HOUR),
    ("CEST", 2 * HOUR),
    ("MET", HOUR),
    ("MEST", 2 * HOUR),
    ("BST", HOUR),
    ("IST", HOUR),
    ("EET", 2 * HOUR),
    ("EEST", 3 * HOUR),
    ("MSK", 3 * HOUR),
    ("TRT", 3 * HOUR),
    ("GST", 4 * HOUR),
    ("PKT", 5 * HOUR),
    ("ICT", 7 * HOUR),
    ("WIB", 7 * HOUR),
    ("SGT", 8 * HOUR),
    ("HKT", 8 * HOUR),
    ("AWST", 8 * HOUR),
    ("JST", 9 * HOUR),
    ("KST", 9 * HOUR),
    ("ACST", 9 * HOUR + HOUR / 2),
    ("AEST", 10 * HOUR),
    ("AEDT", 11 * HOUR),
    ("NZST", 12 * HOUR),
    ("NZDT", 13 * HOUR),
    ("AST", -4 * HOUR),
    ("ADT", -3 * HOUR),
    ("EST", -5 * HOUR),
    ("EDT", -4 * HOUR),
    ("CST", -6 * HOUR),
    ("CDT", -5 * HOUR),
    ("MST", -7 * HOUR),
    ("MDT", -6 * HOUR),
    ("PST", -8 * HOUR),
    ("PDT", -7 * HOUR),
    ("AKST", -9 * HOUR),
    ("AKDT", -8 * HOUR),
    ("HST", -10 * HOUR),
    ("BRT", -3 * HOUR),
    ("ART", -3 * HOUR),
    ("SRT", -3 * HOUR),
];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%d-%m-%Y %H:%M:%S",
    "%Y%m%d%H%M%S",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y%m%d", "%Y/%m/%d", "%d-%m-%Y", "%d/%m/%Y"];

/// Convert a value to its declared type, normalizing empties to null.
///
/// - a non-empty value with a declared type is converted, or fails with a
///   conversion error naming the value and the type
/// - an empty value (null, `""`, empty list) becomes null when `nullable`
/// - anything else is returned unchanged
pub fn to_typed_or_null(
    value: FieldValue,
    target_type: TargetType,
    nullable: bool,
) -> Result<FieldValue> {
    if !value.is_empty() && target_type != TargetType::Identity {
        return convert(value, target_type);
    }
    if value.is_empty() && nullable {
        return Ok(FieldValue::Null);
    }
    Ok(value)
}

fn convert(value: FieldValue, target_type: TargetType) -> Result<FieldValue> {
    let text = match value {
        FieldValue::String(s) => s,
        FieldValue::Integer(_) if target_type == TargetType::Integer => return Ok(value),
        FieldValue::Decimal(_) if target_type == TargetType::Decimal => return Ok(value),
        FieldValue::Timestamp(_) if target_type == TargetType::Timestamp => return Ok(value),
        other => {
            return Err(Error::conversion(
                format!("{:?}", other),
                target_type.to_string(),
                "value is not text",
            ))
        }
    };

    match target_type {
        TargetType::String | TargetType::Identity => Ok(FieldValue::String(text)),
        TargetType::Integer => text
            .trim()
            .parse::<i64>()
            .map(FieldValue::Integer)
            .map_err(|e| Error::conversion(&text, "integer", e.to_string())),
        TargetType::Decimal => parse_decimal(&text)
            .map(FieldValue::Decimal)
            .map_err(|message| Error::conversion(&text, "decimal", message)),
        TargetType::Timestamp => parse_timestamp(&text)
            .map(FieldValue::Timestamp)
            .map_err(|message| Error::conversion(&text, "timestamp", message)),
    }
}

fn parse_decimal(s: &str) -> std::result::Result<Decimal, String> {
    let s = s.trim();
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .map_err(|e| e.to_string())
}

/// Parse a date or date-time in any of the formats the remote emits.
///
/// Values without an offset or timezone abbreviation are taken as UTC.
pub fn parse_timestamp(s: &str) -> std::result::Result<DateTime<FixedOffset>, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty value".to_string());
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt);
    }
    for fmt in ["%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%dT%H:%M:%S%.f%z"] {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Ok(dt);
        }
    }

    let (local, offset) = split_timezone(s);
    let offset = FixedOffset::east_opt(offset)
        .ok_or_else(|| format!("timezone offset {offset}s out of range"))?;

    let naive = parse_naive(local).ok_or_else(|| "unrecognized date format".to_string())?;
    offset
        .from_local_datetime(&naive)
        .single()
        .ok_or_else(|| "ambiguous local time".to_string())
}

/// Split off a trailing timezone abbreviation, returning its offset in seconds
fn split_timezone(s: &str) -> (&str, i32) {
    if let Some((local, abbr)) = s.rsplit_once(' ') {
        if let Some((_, offset)) = TIMEZONES.iter().find(|(name, _)| *name == abbr) {
            return (local.trim_end(), *offset);
        }
    }
    (s, 0)
}

fn parse_naive(s: &str) -> Option<NaiveDateTime> {
    for fmt in DATETIME_FORMATS {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(ndt);
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(nd) = NaiveDate::parse_from_str(s, fmt) {
            return nd.and_hms_opt(0, 0, 0);
        }
    }
    None
}
