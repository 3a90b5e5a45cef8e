//! Tests for the extraction client

use super::*;
use crate::clean::FieldValue;
use crate::error::{Error, Result};
use crate::period::{months_between, YearMonth};
use crate::queries::QueryStore;
use crate::session::tests::FakeTransport;
use crate::session::{Credentials, Session};
use crate::streams::StreamRegistry;
use futures::TryStreamExt;
use pretty_assertions::assert_eq;
use std::collections::HashSet;

/// Column labels of the bank transactions report, in response order
const BANK_LABELS: [&str; 13] = [
    "Periode",
    "Bank",
    "Bank Naam",
    "Boekst.nr.",
    "Afschriftnr.",
    "Grootboek",
    "Grootboek Naam",
    "Valuta",
    "Bedrag",
    "Euro",
    "Vorig saldo",
    "Eindsaldo",
    "Status",
];

/// A report 410 response for one period, one row per amount
pub(crate) fn browse_410(period: &str, amounts: &[&str]) -> String {
    let header: String = BANK_LABELS
        .iter()
        .map(|label| format!(r#"<td label="{label}">x</td>"#))
        .collect();
    let rows: String = amounts
        .iter()
        .enumerate()
        .map(|(i, amount)| {
            format!(
                "<tr><td>{period}</td><td>ING</td><td>ING Zakelijk</td><td>{}</td><td>7</td>\
                 <td>1100</td><td>Bank</td><td>EUR</td><td>{amount}</td><td>{amount}</td>\
                 <td>100.00</td><td>200.00</td><td>final</td><key><number>1</number></key></tr>",
                i + 1
            )
        })
        .collect();
    format!(r#"<browse result="1" code="410"><th>{header}</th>{rows}</browse>"#)
}

async fn open_client(responses: Vec<Result<String>>) -> ExtractionClient<FakeTransport> {
    let session = Session::new(
        FakeTransport::with_responses(responses),
        Credentials::new("user", "secret", "ORG"),
    );
    let mut client = ExtractionClient::new(
        session,
        StreamRegistry::builtin().unwrap(),
        QueryStore::builtin(),
        "NL001",
    )
    .unwrap();
    client.open().await.unwrap();
    client
}

fn month(year: i32, month: u32) -> YearMonth {
    YearMonth::new(year, month).unwrap()
}

// ============================================================================
// Construction
// ============================================================================

#[tokio::test]
async fn test_new_rejects_registry_without_templates() {
    let session = Session::new(FakeTransport::new(), Credentials::new("u", "p", "o"));
    let err = ExtractionClient::new(
        session,
        StreamRegistry::builtin().unwrap(),
        QueryStore::from_templates(Vec::new()),
        "NL001",
    )
    .err()
    .unwrap();
    assert!(matches!(err, Error::Config { .. }));
}

#[tokio::test]
async fn test_failed_company_switch_ends_session() {
    let transport = FakeTransport {
        reject_company: true,
        ..FakeTransport::default()
    };
    let session = Session::new(transport, Credentials::new("user", "secret", "ORG"));
    let mut client = ExtractionClient::new(
        session,
        StreamRegistry::builtin().unwrap(),
        QueryStore::builtin(),
        "NL999",
    )
    .unwrap();

    let err = client.open().await.unwrap_err();
    assert!(matches!(err, Error::Remote { .. }));
    assert!(!client.session().is_open());
    assert_eq!(
        client.session().transport().calls(),
        vec!["logon:user", "select_company:session-1:NL999", "abandon:session-1"]
    );
}

#[tokio::test]
async fn test_open_logs_on_and_selects_office() {
    let client = open_client(Vec::new()).await;
    assert!(client.session().is_open());
    assert_eq!(
        client.session().transport().calls(),
        vec!["logon:user", "select_company:session-1:NL001"]
    );
}

// ============================================================================
// Extraction
// ============================================================================

#[tokio::test]
async fn test_extract_requires_open_session() {
    let session = Session::new(FakeTransport::new(), Credentials::new("u", "p", "o"));
    let client = ExtractionClient::new(
        session,
        StreamRegistry::builtin().unwrap(),
        QueryStore::builtin(),
        "NL001",
    )
    .unwrap();

    let err = client.extract("bank_transactions", "2021-01").err().unwrap();
    assert!(matches!(err, Error::NotAuthenticated { .. }));
    assert!(client.session().transport().requests().is_empty());
}

#[tokio::test]
async fn test_extract_unknown_stream() {
    let client = open_client(Vec::new()).await;
    let err = client.extract("nope", "2021-01").err().unwrap();
    assert!(matches!(err, Error::StreamNotFound { .. }));
}

#[tokio::test]
async fn test_extract_invalid_start_date() {
    let client = open_client(Vec::new()).await;
    let err = client.extract("bank_transactions", "January").err().unwrap();
    assert!(matches!(err, Error::InvalidDateFormat { .. }));
}

#[tokio::test]
async fn test_one_month_three_rows() {
    let client = open_client(vec![Ok(browse_410("2021/01", &["1.00", "2.00", "-3.50"]))]).await;

    let batches: Vec<MonthBatch> = client
        .batches_between("bank_transactions", months_between(month(2021, 1), month(2021, 1)))
        .unwrap()
        .try_collect()
        .await
        .unwrap();

    assert_eq!(batches.len(), 1);
    let records = &batches[0].records;
    assert_eq!(records.len(), 3);

    let ids: HashSet<i64> = records
        .iter()
        .filter_map(|r| r.get("id").and_then(FieldValue::as_i64))
        .collect();
    assert_eq!(ids.len(), 3);
    assert!(ids.contains(&2021010000000000));
    assert!(ids.contains(&2021010000000002));

    for record in records {
        assert_eq!(
            record.get("yearperiod"),
            Some(&FieldValue::String("2021/01".to_string()))
        );
    }
}

#[tokio::test]
async fn test_query_window_is_one_month() {
    let client = open_client(vec![
        Ok(browse_410("2021/11", &["1.00"])),
        Ok(browse_410("2021/12", &[])),
        Ok(browse_410("2022/01", &["2.00", "3.00"])),
    ])
    .await;

    let batches: Vec<MonthBatch> = client
        .batches_between("bank_transactions", months_between(month(2021, 11), month(2022, 1)))
        .unwrap()
        .try_collect()
        .await
        .unwrap();

    let months: Vec<String> = batches.iter().map(|b| b.month.to_string()).collect();
    assert_eq!(months, vec!["2021/11", "2021/12", "2022/01"]);
    assert_eq!(
        batches.iter().map(|b| b.records.len()).collect::<Vec<_>>(),
        vec![1, 0, 2]
    );

    let requests = client.session().transport().requests();
    assert_eq!(requests.len(), 3);
    assert!(requests[0].contains("<from>2021/11</from>"));
    assert!(requests[0].contains("<to>2021/11</to>"));
    assert!(requests[2].contains("<from>2022/01</from>"));
    assert!(requests[2].contains("<to>2022/01</to>"));
}

#[tokio::test]
async fn test_months_are_requested_lazily() {
    let client = open_client(vec![
        Ok(browse_410("2021/01", &["1.00"])),
        Ok(browse_410("2021/02", &["1.00"])),
    ])
    .await;

    let mut batches = client
        .batches_between("bank_transactions", months_between(month(2021, 1), month(2021, 2)))
        .unwrap();
    assert!(client.session().transport().requests().is_empty());

    let first = batches.try_next().await.unwrap().unwrap();
    assert_eq!(first.month, month(2021, 1));
    assert_eq!(client.session().transport().requests().len(), 1);
}

#[tokio::test]
async fn test_remote_failure_aborts_stream() {
    let client = open_client(vec![
        Ok(browse_410("2021/01", &["1.00"])),
        Err(Error::remote("Access denied")),
        Ok(browse_410("2021/03", &["1.00"])),
    ])
    .await;

    let mut batches = client
        .batches_between("bank_transactions", months_between(month(2021, 1), month(2021, 3)))
        .unwrap();

    assert!(batches.try_next().await.unwrap().is_some());
    let err = batches.try_next().await.unwrap_err();
    assert!(matches!(err, Error::Remote { .. }));
    assert_eq!(client.session().transport().requests().len(), 2);
}

#[tokio::test]
async fn test_conversion_failure_fails_month() {
    let client = open_client(vec![Ok(browse_410("2021/01", &["1.00", "abc"]))]).await;

    let result: Result<Vec<MonthBatch>> = client
        .batches_between("bank_transactions", months_between(month(2021, 1), month(2021, 1)))
        .unwrap()
        .try_collect()
        .await;
    assert!(matches!(result, Err(Error::Conversion { .. })));
}

#[tokio::test]
async fn test_extract_current_month_yields_records() {
    let current = YearMonth::current();
    let client = open_client(vec![Ok(browse_410(&current.to_string(), &["5.00", "6.00"]))]).await;

    let records: Vec<_> = client
        .extract("bank_transactions", &current.to_bookmark())
        .unwrap()
        .try_collect()
        .await
        .unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(client.session().transport().requests().len(), 1);
}

// ============================================================================
// Browse fields
// ============================================================================

#[tokio::test]
async fn test_browse_fields() {
    let client = open_client(vec![
        Ok("<columns code=\"410\"/>".to_string()),
        Ok("<browsefields/>".to_string()),
    ])
    .await;

    let fields = client.browse_fields("410").await.unwrap();
    assert_eq!(fields, "<columns code=\"410\"/>");
    let all = client.all_browse_fields().await.unwrap();
    assert_eq!(all, "<browsefields/>");

    let requests = client.session().transport().requests();
    assert!(requests[0].contains("<office>NL001</office>"));
    assert!(requests[0].contains("<code>410</code>"));
    assert!(requests[1].contains("<type>browsefields</type>"));
}
