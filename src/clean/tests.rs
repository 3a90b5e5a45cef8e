//! Tests for the row cleaner

use super::keys::{composite_key, content_hash, period_digits};
use super::*;
use crate::error::Error;
use crate::streams::{StreamDefinition, StreamRegistry, TargetType};
use crate::types::{KeyStrategy, RawRow};
use chrono::{FixedOffset, TimeZone};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use std::collections::HashSet;
use std::str::FromStr;
use test_case::test_case;

fn stream(name: &str) -> StreamDefinition {
    StreamRegistry::builtin().unwrap().get(name).unwrap().clone()
}

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn bank_row() -> RawRow {
    [
        ("Periode", Some("2021/01")),
        ("Bank", Some("ING")),
        ("Bank Naam", Some("ING Zakelijk")),
        ("Boekst.nr.", Some("21000001")),
        ("Afschriftnr.", Some("12")),
        ("Grootboek", Some("1100")),
        ("Grootboek Naam", Some("Bank")),
        ("Valuta", Some("EUR")),
        ("Bedrag", Some("-12.50")),
        ("Euro", Some("-12.50")),
        ("Vorig saldo", Some("1000.00")),
        ("Eindsaldo", Some("987.50")),
        ("Status", Some("Definitief")),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.map(str::to_string)))
    .collect()
}

/// A raw row with a plausible value in every column the stream reads
fn full_row(stream: &StreamDefinition) -> RawRow {
    let mut row = RawRow::new();
    for field in &stream.fields {
        let value = match field.target_type {
            TargetType::Integer => "7",
            TargetType::Decimal => "10.25",
            TargetType::Timestamp => "20210115",
            _ => "x",
        };
        row.insert(field.source.clone(), Some(value.to_string()));
    }
    if let Some(reshape) = &stream.reshape {
        row.remove(&reshape.groups.target);
        for n in 1..=reshape.groups.count {
            row.insert(reshape.groups.group_column(n), None);
            row.insert(reshape.groups.name_column(n), None);
        }
    }
    row
}

// ============================================================================
// RowCleaner
// ============================================================================

#[test]
fn test_clean_bank_transaction() {
    let cleaner = RowCleaner::new(stream("bank_transactions"));
    let record = cleaner.clean(&bank_row(), 0).unwrap();

    assert_eq!(record.get("id"), Some(&FieldValue::Integer(2021010000000000)));
    assert_eq!(record.get("yearperiod"), Some(&FieldValue::from("2021/01")));
    assert_eq!(record.get("bank_code"), Some(&FieldValue::from("ING")));
    assert_eq!(record.get("entry_number"), Some(&FieldValue::Integer(21000001)));
    assert_eq!(record.get("statement_number"), Some(&FieldValue::Integer(12)));
    assert_eq!(record.get("ledger"), Some(&FieldValue::from("1100")));
    assert_eq!(record.get("value_signed"), Some(&FieldValue::Decimal(dec("-12.50"))));
    assert_eq!(record.get("closevalue"), Some(&FieldValue::Decimal(dec("987.50"))));
    assert_eq!(record.len(), 14);
}

#[test]
fn test_clean_emits_only_declared_fields() {
    let bank = stream("bank_transactions");
    let mut raw = bank_row();
    raw.insert("Onbekend".to_string(), Some("extra".to_string()));

    let record = RowCleaner::new(bank.clone()).clean(&raw, 3).unwrap();
    let mut fields: Vec<&str> = record.fields().map(|(k, _)| k).collect();
    let mut expected: Vec<&str> = bank.output_fields().collect();
    fields.sort_unstable();
    expected.sort_unstable();
    assert_eq!(fields, expected);
}

#[test]
fn test_clean_is_deterministic() {
    let cleaner = RowCleaner::new(stream("bank_transactions"));
    let raw = bank_row();
    assert_eq!(cleaner.clean(&raw, 4).unwrap(), cleaner.clean(&raw, 4).unwrap());
}

#[test]
fn test_composite_keys_unique_within_month() {
    let cleaner = RowCleaner::new(stream("bank_transactions"));
    let raw = bank_row();
    let ids: HashSet<i64> = (0..250)
        .map(|n| cleaner.clean(&raw, n).unwrap().get("id").unwrap().as_i64().unwrap())
        .collect();
    assert_eq!(ids.len(), 250);
}

#[test]
fn test_composite_key_from_year_and_period_columns() {
    let details = stream("general_ledger_details");
    let mut raw = full_row(&details);
    raw.insert("Jaar".to_string(), Some("2021".to_string()));
    raw.insert("Periode".to_string(), Some("3".to_string()));

    let record = RowCleaner::new(details).clean(&raw, 5).unwrap();
    assert_eq!(record.get("id"), Some(&FieldValue::Integer(2021030000000005)));
    assert_eq!(record.get("year"), Some(&FieldValue::Integer(2021)));
    assert_eq!(record.get("period"), Some(&FieldValue::Integer(3)));
}

#[test]
fn test_composite_key_from_summary_period_column() {
    let summary = stream("transaction_summary");
    let mut raw = full_row(&summary);
    raw.insert(
        "Jaar/periode (JJJJ/PP)".to_string(),
        Some("2020/12".to_string()),
    );
    let record = RowCleaner::new(summary).clean(&raw, 1).unwrap();
    assert_eq!(record.get("id"), Some(&FieldValue::Integer(2020120000000001)));
    assert_eq!(record.get("yearperiod"), Some(&FieldValue::from("2020/12")));
}

#[test]
fn test_content_hash_key_strategy() {
    let mut bank = stream("bank_transactions");
    bank.key_strategy = KeyStrategy::ContentHash;
    let cleaner = RowCleaner::new(bank);

    let raw = bank_row();
    let first = cleaner.clean(&raw, 0).unwrap();
    let moved = cleaner.clean(&raw, 9).unwrap();
    let id = first.get("id").unwrap().as_str().unwrap();

    assert_eq!(id.len(), 64);
    assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    // Position in the month does not affect the key
    assert_eq!(first.get("id"), moved.get("id"));

    let mut other = raw.clone();
    other.insert("Bedrag".to_string(), Some("-12.51".to_string()));
    let other_record = cleaner.clean(&other, 0).unwrap();
    assert_ne!(first.get("id"), other_record.get("id"));
}

#[test]
fn test_nullable_empty_values_become_null() {
    let list = stream("transaction_list");
    let mut raw = full_row(&list);
    raw.insert("Periode".to_string(), Some("2021/02".to_string()));
    raw.insert("Relatie".to_string(), Some(String::new()));
    raw.insert("Project".to_string(), None);

    let record = RowCleaner::new(list).clean(&raw, 0).unwrap();
    assert_eq!(record.get("relation"), Some(&FieldValue::Null));
    assert_eq!(record.get("project"), Some(&FieldValue::Null));
}

#[test]
fn test_required_empty_values_pass_through() {
    let mut raw = bank_row();
    raw.insert("Bank".to_string(), Some(String::new()));
    raw.insert("Bank Naam".to_string(), None);
    raw.insert("Boekst.nr.".to_string(), Some(String::new()));

    let record = RowCleaner::new(stream("bank_transactions"))
        .clean(&raw, 0)
        .unwrap();
    assert_eq!(record.get("bank_code"), Some(&FieldValue::from("")));
    assert_eq!(record.get("bank_shortname"), Some(&FieldValue::Null));
    // Not converted either: an empty typed value is kept as it came
    assert_eq!(record.get("entry_number"), Some(&FieldValue::from("")));
}

#[test]
fn test_conversion_failure_is_reported() {
    let mut raw = bank_row();
    raw.insert("Boekst.nr.".to_string(), Some("abc".to_string()));

    let err = RowCleaner::new(stream("bank_transactions"))
        .clean(&raw, 0)
        .unwrap_err();
    match err {
        Error::Conversion {
            value, target_type, ..
        } => {
            assert_eq!(value, "abc");
            assert_eq!(target_type, "integer");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_missing_column_is_reported() {
    let mut raw = bank_row();
    raw.remove("Valuta");

    let err = RowCleaner::new(stream("bank_transactions"))
        .clean(&raw, 0)
        .unwrap_err();
    assert!(
        matches!(err, Error::MissingColumn { ref stream, ref column } if stream == "bank_transactions" && column == "Valuta"),
        "{err}"
    );
}

#[test]
fn test_missing_period_column_is_reported() {
    let mut raw = bank_row();
    raw.remove("Periode");
    let err = RowCleaner::new(stream("bank_transactions"))
        .clean(&raw, 0)
        .unwrap_err();
    assert!(matches!(err, Error::MissingColumn { .. }));
}

// ============================================================================
// Reshape
// ============================================================================

#[test]
fn test_groups_always_have_five_entries() {
    let report = stream("annual_report");
    let mut raw = full_row(&report);
    raw.insert("Jaar".to_string(), Some("2021".to_string()));
    raw.insert("Periode".to_string(), Some("1".to_string()));

    let record = RowCleaner::new(report).clean(&raw, 0).unwrap();
    let Some(FieldValue::Groups(groups)) = record.get("groups") else {
        panic!("groups missing: {:?}", record.get("groups"));
    };
    assert_eq!(groups.len(), 5);
    assert!(groups.iter().all(Group::is_empty));
}

#[test]
fn test_groups_carry_values() {
    let report = stream("annual_report_multicurrency");
    let mut raw = full_row(&report);
    raw.insert("Jaar".to_string(), Some("2021".to_string()));
    raw.insert("Periode".to_string(), Some("1".to_string()));
    raw.insert("Groep 1".to_string(), Some("ACT".to_string()));
    raw.insert("Groepnaam 1".to_string(), Some("Activa".to_string()));
    raw.insert("Groep 2".to_string(), Some(String::new()));

    let record = RowCleaner::new(report).clean(&raw, 0).unwrap();
    let json = record.to_json();
    assert_eq!(
        json["groups"][0],
        serde_json::json!({"group": "ACT", "group_name": "Activa"})
    );
    assert_eq!(
        json["groups"][1],
        serde_json::json!({"group": null, "group_name": null})
    );
    assert_eq!(json["groups"].as_array().unwrap().len(), 5);
}

#[test]
fn test_missing_group_column_is_reported() {
    let report = stream("general_ledger_details");
    let mut raw = full_row(&report);
    raw.insert("Jaar".to_string(), Some("2021".to_string()));
    raw.insert("Periode".to_string(), Some("1".to_string()));
    raw.remove("Groepnaam 4");

    let err = RowCleaner::new(report).clean(&raw, 0).unwrap_err();
    assert!(matches!(err, Error::MissingColumn { column, .. } if column == "Groepnaam 4"));
}

// ============================================================================
// Keys
// ============================================================================

#[test]
fn test_composite_key_format() {
    assert_eq!(composite_key("202101", 0).unwrap(), 2021010000000000);
    assert_eq!(composite_key("202112", 1234).unwrap(), 2021120000001234);
}

#[test]
fn test_period_digits_rejects_garbage() {
    let bank = stream("bank_transactions");
    let mut raw = bank_row();
    raw.insert("Periode".to_string(), Some("jan 2021".to_string()));
    let err = period_digits(&bank, &raw).unwrap_err();
    assert!(matches!(err, Error::Conversion { .. }));
}

#[test]
fn test_content_hash_identical_rows_collide() {
    assert_eq!(content_hash(&bank_row()), content_hash(&bank_row()));
}

#[test]
fn test_content_hash_distinguishes_empty_and_null() {
    let mut empty = bank_row();
    empty.insert("Bank".to_string(), Some(String::new()));
    let mut null = bank_row();
    null.insert("Bank".to_string(), None);
    assert_ne!(content_hash(&empty), content_hash(&null));
}

// ============================================================================
// Coercion
// ============================================================================

#[test_case(FieldValue::from("42"), TargetType::Integer, true, FieldValue::Integer(42) ; "integer")]
#[test_case(FieldValue::from(" -7 "), TargetType::Integer, false, FieldValue::Integer(-7) ; "padded integer")]
#[test_case(FieldValue::from("0"), TargetType::Integer, true, FieldValue::Integer(0) ; "zero is a value")]
#[test_case(FieldValue::from("1.50"), TargetType::Decimal, true, FieldValue::Decimal(Decimal::new(150, 2)) ; "decimal")]
#[test_case(FieldValue::from("abc"), TargetType::String, true, FieldValue::from("abc") ; "string")]
#[test_case(FieldValue::from("abc"), TargetType::Identity, true, FieldValue::from("abc") ; "identity")]
#[test_case(FieldValue::from(""), TargetType::Integer, true, FieldValue::Null ; "empty nullable")]
#[test_case(FieldValue::Null, TargetType::Decimal, true, FieldValue::Null ; "null nullable")]
#[test_case(FieldValue::Groups(vec![]), TargetType::Identity, true, FieldValue::Null ; "empty list nullable")]
#[test_case(FieldValue::from(""), TargetType::Integer, false, FieldValue::from("") ; "empty required")]
#[test_case(FieldValue::Null, TargetType::Identity, false, FieldValue::Null ; "null required")]
fn test_to_typed_or_null(value: FieldValue, target: TargetType, nullable: bool, expected: FieldValue) {
    assert_eq!(to_typed_or_null(value, target, nullable).unwrap(), expected);
}

#[test_case("1.5", TargetType::Integer ; "fraction as integer")]
#[test_case("twelve", TargetType::Decimal ; "word as decimal")]
#[test_case("31-31-2021", TargetType::Timestamp ; "impossible date")]
fn test_to_typed_or_null_failure(input: &str, target: TargetType) {
    let err = to_typed_or_null(FieldValue::from(input), target, true).unwrap_err();
    assert!(matches!(err, Error::Conversion { ref value, .. } if value == input), "{err}");
}

#[test_case("2021-01-15T10:20:30+01:00", 2021, 1, 15, 10, 20, 30, 3600 ; "rfc3339")]
#[test_case("2021-01-15T10:20:30", 2021, 1, 15, 10, 20, 30, 0 ; "naive datetime")]
#[test_case("2021-01-15 10:20:30", 2021, 1, 15, 10, 20, 30, 0 ; "space separated")]
#[test_case("2021-01-15", 2021, 1, 15, 0, 0, 0, 0 ; "date")]
#[test_case("20210115", 2021, 1, 15, 0, 0, 0, 0 ; "compact date")]
#[test_case("2021/01/15", 2021, 1, 15, 0, 0, 0, 0 ; "slashed date")]
#[test_case("15-01-2021", 2021, 1, 15, 0, 0, 0, 0 ; "day first")]
#[test_case("2021-07-01 09:00:00 CEST", 2021, 7, 1, 9, 0, 0, 7200 ; "abbreviation")]
#[test_case("2021-01-15 10:20:30 UTC", 2021, 1, 15, 10, 20, 30, 0 ; "utc abbreviation")]
fn test_parse_timestamp(
    input: &str,
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
    second: u32,
    offset: i32,
) {
    let expected = FixedOffset::east_opt(offset)
        .unwrap()
        .with_ymd_and_hms(year, month, day, hour, minute, second)
        .unwrap();
    let parsed = parse_timestamp(input).unwrap();
    assert_eq!(parsed, expected);
    assert_eq!(parsed.offset(), expected.offset());
}

#[test]
fn test_parse_timestamp_rejects() {
    assert!(parse_timestamp("").is_err());
    assert!(parse_timestamp("yesterday").is_err());
    assert!(parse_timestamp("2021-01-15 10:20:30 XYZ").is_err());
}

// ============================================================================
// JSON output
// ============================================================================

#[test]
fn test_field_value_json() {
    assert_eq!(serde_json::to_string(&FieldValue::Null).unwrap(), "null");
    assert_eq!(serde_json::to_string(&FieldValue::Integer(5)).unwrap(), "5");
    assert_eq!(
        serde_json::to_string(&FieldValue::Decimal(dec("-12.50"))).unwrap(),
        "-12.50"
    );
    let ts = FixedOffset::east_opt(0)
        .unwrap()
        .with_ymd_and_hms(2021, 1, 15, 0, 0, 0)
        .unwrap();
    assert_eq!(
        serde_json::to_string(&FieldValue::Timestamp(ts)).unwrap(),
        "\"2021-01-15T00:00:00+00:00\""
    );
}

#[test]
fn test_record_json_object() {
    let record = RowCleaner::new(stream("bank_transactions"))
        .clean(&bank_row(), 2)
        .unwrap();
    let json = serde_json::to_value(&record).unwrap();
    assert_eq!(json["id"], serde_json::json!(2021010000000002_i64));
    assert_eq!(json["curcode"], serde_json::json!("EUR"));
    assert_eq!(json["entry_number"], serde_json::json!(21000001));
}
