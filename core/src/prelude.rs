use crate::records::AccessPointRecord;

/// Common error type for the ingestion pipeline. Failures here are
/// recovered per-source inside `load_all` and surface only as counts.
#[derive(thiserror::Error, Debug)]
pub enum IngestError {
    #[error("source unreadable: {0}")]
    Source(String),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

pub type IngestResult<T> = Result<T, IngestError>;

/// Common error type for the clustering engine. Marker failures are
/// contained per-item; the rest of a batch always proceeds.
#[derive(thiserror::Error, Debug)]
pub enum ClusterError {
    #[error("invalid marker: {0}")]
    InvalidMarker(String),
    #[error("unknown cluster id {0}")]
    UnknownCluster(u64),
}

pub type ClusterResult<T> = Result<T, ClusterError>;

/// Seam between the progressive loader and the clustering index.
///
/// `insert` may reject an individual record; the caller skips it and
/// continues with the rest of the batch.
pub trait MarkerSink {
    fn insert(&mut self, record: &AccessPointRecord) -> ClusterResult<()>;
    fn clear(&mut self);
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
