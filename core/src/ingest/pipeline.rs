use crate::ingest::normalize::{normalize, Normalized, RawRow};
use crate::prelude::{IngestError, IngestResult};
use crate::records::AccessPointRecord;
use crate::telemetry::log::LogManager;
use std::path::PathBuf;

/// One CSV input. Served files are read from disk; uploads arrive as
/// in-memory bytes. Both shapes funnel into the same row normalization.
#[derive(Debug, Clone)]
pub enum CsvSource {
    Path(PathBuf),
    Upload { name: String, bytes: Vec<u8> },
}

impl CsvSource {
    pub fn name(&self) -> String {
        match self {
            CsvSource::Path(path) => path.display().to_string(),
            CsvSource::Upload { name, .. } => name.clone(),
        }
    }
}

/// Merged result of one ingestion pass. An all-empty pass is a value
/// the view layer renders as "no data", never an error.
#[derive(Debug, Clone, Default)]
pub struct IngestReport {
    pub records: Vec<AccessPointRecord>,
    pub rows_parsed: usize,
    pub rows_rejected: usize,
    pub sources_failed: usize,
}

impl IngestReport {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Parses one CSV document and normalizes every row.
///
/// Headers are trimmed and matched case-sensitively against the alias
/// table in [`normalize`]; rows with fewer fields than headers are
/// tolerated. Returns (surviving records, rows seen, rows rejected).
pub fn parse_csv(source_name: &str, text: &str) -> IngestResult<(Vec<AccessPointRecord>, usize, usize)> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader.headers()?.clone();
    let mut records = Vec::new();
    let mut rows_parsed = 0usize;
    let mut rows_rejected = 0usize;

    for row in reader.records() {
        let row = row?;
        if row.iter().all(|field| field.trim().is_empty()) {
            continue;
        }
        rows_parsed += 1;

        let raw: RawRow = headers
            .iter()
            .zip(row.iter())
            .map(|(header, field)| (header.to_string(), field.to_string()))
            .collect();

        match normalize(&raw) {
            Normalized::Valid(mut record) => {
                record.source = Some(source_name.to_string());
                records.push(record);
            }
            Normalized::Rejected => rows_rejected += 1,
        }
    }

    Ok((records, rows_parsed, rows_rejected))
}

async fn load_one(source: &CsvSource) -> IngestResult<(Vec<AccessPointRecord>, usize, usize)> {
    let name = source.name();
    let text = match source {
        CsvSource::Path(path) => tokio::fs::read_to_string(path)
            .await
            .map_err(|err| IngestError::Source(format!("{}: {}", path.display(), err)))?,
        CsvSource::Upload { bytes, .. } => String::from_utf8_lossy(bytes).into_owned(),
    };
    parse_csv(&name, &text)
}

/// Fetches and parses every source, merging survivors in source order
/// then row order.
///
/// A source that fails to read or parse contributes zero records and a
/// bumped failure count; it never aborts the others. Row rejects are
/// dropped silently and only counted in aggregate.
pub async fn load_all(sources: &[CsvSource]) -> IngestReport {
    let logger = LogManager::new();
    let mut report = IngestReport::default();

    for source in sources {
        match load_one(source).await {
            Ok((records, parsed, rejected)) => {
                logger.record(&format!(
                    "ingested {}: {} rows, {} valid, {} rejected",
                    source.name(),
                    parsed,
                    records.len(),
                    rejected
                ));
                report.rows_parsed += parsed;
                report.rows_rejected += rejected;
                report.records.extend(records);
            }
            Err(err) => {
                log::warn!("skipping source {}: {}", source.name(), err);
                report.sources_failed += 1;
            }
        }
    }

    if report.is_empty() {
        log::warn!(
            "ingestion produced no records ({} sources failed)",
            report.sources_failed
        );
    }
    report
}
