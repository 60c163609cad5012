//! Request outcomes, run summaries, and the shared statistics aggregator.
mod aggregator;
mod collector;
mod histogram;
mod percentiles;
mod types;


pub use aggregator::{StatsAggregator, StatsSettings};
pub use collector::spawn_collector;
pub use histogram::LatencyHistogram;
pub use percentiles::{DEFAULT_PERCENTILES, PercentileMethod};
pub use types::{
    ErrorKind, LatencyStats, PercentileValue, ProgressSnapshot, RequestOutcome, RunSummary,
};
