pub mod normalize;
pub mod pipeline;

pub use normalize::{normalize, Normalized, RawRow};
pub use pipeline::{load_all, CsvSource, IngestReport};
