//! Ingestion, analysis, and marker-clustering core for the wardriving
//! dashboard.
//!
//! The modules mirror the browser dashboard's data path while providing
//! strongly-typed records, contained failure modes, and a headless
//! clustering engine that a map view can render from.

pub mod analysis;
pub mod cluster;
pub mod filter;
pub mod ingest;
pub mod loader;
pub mod prelude;
pub mod records;
pub mod telemetry;

pub use prelude::{ClusterError, IngestError, MarkerSink};
