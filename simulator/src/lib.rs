//! Call Center Simulator Core
//!
//! Discrete-event simulation of caller wait times in a single-queue,
//! multi-agent call center, with Monte Carlo sampling over many simulated
//! days. Answers two questions: the expected remaining wait for a caller
//! who has already waited `P` minutes, and the expected extra wait if that
//! caller instead hangs up after `P` minutes and calls back `C` minutes
//! later.
//!
//! # Architecture
//!
//! - **models**: Domain types (Call, Event)
//! - **arrivals**: Candidate call generation from probability distributions
//! - **engine**: Discrete-event simulation loop
//! - **calibration**: Adaptive search for a target steady-state median wait
//! - **harness**: Parallel Monte Carlo batches and result aggregation
//! - **stats**: Descriptive statistics helpers
//! - **rng**: Deterministic random number generation
//!
//! # Critical Invariants
//!
//! 1. All randomness is deterministic (seeded RNG, independent streams per
//!    parallel task)
//! 2. A call's answered time is assigned exactly once per engine run, never
//!    earlier than its arrival
//! 3. Internal-consistency violations in the engine abort loudly; they are
//!    never recoverable errors

// Module declarations
pub mod arrivals;
pub mod calibration;
pub mod engine;
pub mod harness;
pub mod models;
pub mod rng;
pub mod stats;

// Re-exports for convenience
pub use arrivals::{ArrivalConfig, CallGenerator};
pub use calibration::{calibrate, CalibrationConfig, CalibrationError};
pub use harness::{
    ArrivalIndex, BatchSummary, BucketKey, BucketRow, ExperimentConfig, ExperimentError,
    ExperimentHarness, ResultTable, SamplingMode, TableTotals, DEFAULT_CALLBACK_DELAYS,
};
pub use models::{Call, Event, EventKind};
pub use rng::RngManager;
