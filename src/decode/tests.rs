//! Tests for decode module

use super::*;
use crate::error::Error;
use crate::types::RawRow;
use pretty_assertions::assert_eq;

const BROWSE_410: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<browse result="1" first="1" last="2" total="2" code="410">
  <th>
    <td label="Periode" hideforuser="false" type="String">fin.trs.head.yearperiod</td>
    <td label="Bank" hideforuser="false" type="String">fin.trs.head.code</td>
    <td label="Bedrag" hideforuser="false" type="Value">fin.trs.line.valuesigned</td>
  </th>
  <tr>
    <td field="fin.trs.head.yearperiod">2021/01</td>
    <td field="fin.trs.head.code">ING</td>
    <td field="fin.trs.line.valuesigned">-12.50</td>
    <key><office>NL01</office><code>ING</code><number>2021001</number></key>
  </tr>
  <tr>
    <td field="fin.trs.head.yearperiod">2021/01</td>
    <td field="fin.trs.head.code"/>
    <td field="fin.trs.line.valuesigned">1000.00</td>
    <key><office>NL01</office><code>ING</code><number>2021002</number></key>
  </tr>
</browse>"#;

fn row(pairs: &[(&str, Option<&str>)]) -> RawRow {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), v.map(str::to_string)))
        .collect()
}

// ============================================================================
// Browse decoding
// ============================================================================

#[test]
fn test_decode_browse_rows() {
    let rows = BrowseDecoder::new().decode(BROWSE_410).unwrap();
    assert_eq!(
        rows,
        vec![
            row(&[
                ("Periode", Some("2021/01")),
                ("Bank", Some("ING")),
                ("Bedrag", Some("-12.50")),
            ]),
            row(&[
                ("Periode", Some("2021/01")),
                ("Bank", None),
                ("Bedrag", Some("1000.00")),
            ]),
        ]
    );
}

#[test]
fn test_decode_browse_keeps_header_order() {
    let table = BrowseDecoder::new().decode_table(BROWSE_410).unwrap();
    assert_eq!(table.columns, vec!["Periode", "Bank", "Bedrag"]);
    assert_eq!(table.len(), 2);
    assert!(table.has_column("Bank"));
    assert!(!table.has_column("?"));
}

#[test]
fn test_decode_browse_header_only() {
    let body = r#"<browse result="1" total="0"><th><td label="Periode">x</td></th></browse>"#;
    let table = decode_browse(body).unwrap();
    assert_eq!(table.columns, vec!["Periode"]);
    assert!(table.is_empty());
}

#[test]
fn test_decode_browse_unescapes_text() {
    let body = r#"<browse result="1">
        <th><td label="Naam &amp; plaats">x</td><td label="Omschrijving">y</td></th>
        <tr><td>Jansen &amp; Zn</td><td><![CDATA[a < b]]></td><key/></tr>
    </browse>"#;
    let rows = decode_browse(body).unwrap().into_rows();
    assert_eq!(
        rows,
        vec![row(&[
            ("Naam & plaats", Some("Jansen & Zn")),
            ("Omschrijving", Some("a < b")),
        ])]
    );
}

#[test]
fn test_decode_browse_short_row_fails() {
    let body = r#"<browse result="1">
        <th><td label="A">a</td><td label="B">b</td></th>
        <tr><td>1</td></tr>
    </browse>"#;
    let err = decode_browse(body).unwrap_err();
    assert!(matches!(err, Error::XmlParse { .. }));
    assert!(err.to_string().contains("row 1 has 1 cells"));
}

#[test]
fn test_decode_browse_remote_failure() {
    let body = r#"<columns result="0" code="410">
        <column id="1"><field msg="Period is not valid.">fin.trs.head.yearperiod</field></column>
    </columns>"#;
    let err = decode_browse(body).unwrap_err();
    assert!(matches!(err, Error::Remote { message } if message == "Period is not valid."));
}

#[test]
fn test_decode_browse_remote_failure_without_message() {
    let err = decode_browse(r#"<browse result="0"/>"#).unwrap_err();
    assert!(matches!(err, Error::Remote { .. }));
}

#[test]
fn test_decode_browse_malformed() {
    let err = decode_browse("<browse><th></browse>").unwrap_err();
    assert!(matches!(err, Error::XmlParse { .. }));
}

#[test]
fn test_decode_browse_empty_body() {
    let err = decode_browse("   ").unwrap_err();
    assert!(matches!(err, Error::XmlParse { .. }));
}

// ============================================================================
// XML helpers
// ============================================================================

#[test]
fn test_check_well_formed() {
    assert!(check_well_formed("<columns code=\"410\"><column id=\"1\"/></columns>").is_ok());
    assert!(check_well_formed("<?xml version=\"1.0\"?>\n<a>text</a>\n").is_ok());
}

#[test]
fn test_check_well_formed_rejects() {
    assert!(check_well_formed("").is_err());
    assert!(check_well_formed("<a><b></a>").is_err());
    assert!(check_well_formed("<a>").is_err());
    assert!(check_well_formed("<a/><b/>").is_err());
    assert!(check_well_formed("stray <a/>").is_err());
}

#[test]
fn test_pretty_print() {
    let out = pretty_print("<list><type>browsefields</type></list>").unwrap();
    assert_eq!(out, "<list>\n  <type>browsefields</type>\n</list>");
}
