//! Extraction client implementation

use crate::clean::{NormalizedRecord, RowCleaner};
use crate::decode::BrowseDecoder;
use crate::error::{Error, Result};
use crate::period::{months_between, Months, YearMonth};
use crate::queries::{all_browse_fields_query, browse_fields_query, QueryStore, QueryTemplate};
use crate::session::{Session, Transport};
use crate::streams::{StreamDefinition, StreamRegistry};
use futures::stream::{self, Stream, TryStreamExt};
use std::pin::Pin;
use tracing::{debug, info, warn};

/// Lazy sequence of cleaned records for one stream
pub type RecordStream<'a> = Pin<Box<dyn Stream<Item = Result<NormalizedRecord>> + Send + 'a>>;

/// Lazy sequence of per-month record batches for one stream
pub type BatchStream<'a> = Pin<Box<dyn Stream<Item = Result<MonthBatch>> + Send + 'a>>;

/// All cleaned records of one stream for one month, in response order
#[derive(Debug, Clone, PartialEq)]
pub struct MonthBatch {
    pub month: YearMonth,
    pub records: Vec<NormalizedRecord>,
}

/// Extracts streams over an authenticated session
pub struct ExtractionClient<T> {
    session: Session<T>,
    registry: StreamRegistry,
    queries: QueryStore,
    office: String,
    decoder: BrowseDecoder,
}

impl<T: Transport> ExtractionClient<T> {
    /// Create a client. Fails if a registered stream has no query template.
    pub fn new(
        session: Session<T>,
        registry: StreamRegistry,
        queries: QueryStore,
        office: impl Into<String>,
    ) -> Result<Self> {
        queries.ensure_covers(&registry)?;
        Ok(Self {
            session,
            registry,
            queries,
            office: office.into(),
            decoder: BrowseDecoder::new(),
        })
    }

    /// Log on and switch to the configured office
    pub async fn open(&mut self) -> Result<()> {
        self.session.open().await?;
        if let Err(err) = self.session.select_company(&self.office).await {
            if let Err(close_err) = self.session.close().await {
                warn!("Failed to end session after company switch failed: {close_err}");
            }
            return Err(err);
        }
        Ok(())
    }

    /// End the session
    pub async fn close(&mut self) -> Result<()> {
        self.session.close().await
    }

    pub fn session(&self) -> &Session<T> {
        &self.session
    }

    pub fn registry(&self) -> &StreamRegistry {
        &self.registry
    }

    pub fn queries(&self) -> &QueryStore {
        &self.queries
    }

    pub fn office(&self) -> &str {
        &self.office
    }

    /// Records of `stream_name` from the month of `start_date` through the current month.
    ///
    /// Fails up front on an unknown stream, a malformed start date or a closed session.
    pub fn extract(&self, stream_name: &str, start_date: &str) -> Result<RecordStream<'_>> {
        let start = YearMonth::parse_start(start_date)?;
        let batches = self.batches(stream_name, start)?;

        let records = batches
            .map_ok(|batch| stream::iter(batch.records.into_iter().map(Ok::<_, Error>)))
            .try_flatten();
        Ok(Box::pin(records))
    }

    /// Month batches of `stream_name` from `start` through the current month
    pub fn batches(&self, stream_name: &str, start: YearMonth) -> Result<BatchStream<'_>> {
        self.batches_between(stream_name, months_between(start, YearMonth::current()))
    }

    /// Month batches of `stream_name` for an explicit month range
    pub fn batches_between(&self, stream_name: &str, months: Months) -> Result<BatchStream<'_>> {
        self.session.auth("extract records")?;
        let stream = self.registry.get(stream_name)?;
        let template = self.queries.get(&stream.report_code)?;
        let cleaner = RowCleaner::new(stream.clone());

        debug!(
            "Planning {} months for stream '{}'",
            months.len(),
            stream.name
        );

        let batches = stream::try_unfold(
            (months, cleaner),
            move |(mut months, cleaner)| async move {
                let Some(month) = months.next() else {
                    return Ok(None);
                };
                let records = self.fetch_month(&cleaner, template, month).await?;
                Ok(Some((MonthBatch { month, records }, (months, cleaner))))
            },
        );
        Ok(Box::pin(batches))
    }

    /// Query, decode and clean one month of a stream.
    ///
    /// Any row that fails to clean fails the whole month.
    pub async fn fetch_month(
        &self,
        cleaner: &RowCleaner,
        template: &QueryTemplate,
        month: YearMonth,
    ) -> Result<Vec<NormalizedRecord>> {
        let stream: &StreamDefinition = cleaner.stream();
        info!("Extracting {} for month {}", stream.label(), month);

        let query = template.render(month)?;
        let response = self.session.execute(&query).await?;
        let rows = self.decoder.decode(&response)?;

        let records = rows
            .iter()
            .enumerate()
            .map(|(ordinal, raw)| cleaner.clean(raw, ordinal))
            .collect::<Result<Vec<_>>>()?;

        info!(
            "Received {} for month {}: {} records",
            stream.label(),
            month,
            records.len()
        );
        Ok(records)
    }

    /// Raw field definitions of one report
    pub async fn browse_fields(&self, code: &str) -> Result<String> {
        let query = browse_fields_query(&self.office, code)?;
        info!("Reading browse fields of report {code}");
        self.session.execute(&query).await
    }

    /// Raw list of every browse field the remote offers
    pub async fn all_browse_fields(&self) -> Result<String> {
        info!("Listing all browse fields");
        self.session.execute(&all_browse_fields_query()).await
    }
}
