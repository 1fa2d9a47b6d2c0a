pub mod aggregate;
pub mod filter;
pub mod rows;

pub use aggregate::{compute_averages, AverageRecord, GroupKey, StatsResult};
pub use filter::AverageFilter;
pub use rows::{load_rows, Ingested, IngestError, Row};
