//! Monte Carlo experiment harness
//!
//! Repeatedly calibrates independent call sets, draws random samples from
//! each, and aggregates outcome statistics into patience ×
//! callback-delay buckets.
//!
//! See `experiment.rs` for the batch loop, `callback.rs` for re-arrival
//! matching, and `results.rs` for the shared sample table.

pub mod callback;
pub mod experiment;
pub mod results;

// Re-export main types for convenience
pub use callback::{match_tolerance, ArrivalIndex};
pub use experiment::{
    BatchSummary, ExperimentConfig, ExperimentError, ExperimentHarness, SamplingMode,
    DEFAULT_CALLBACK_DELAYS,
};
pub use results::{BucketKey, BucketRow, ResultTable, TableTotals};
