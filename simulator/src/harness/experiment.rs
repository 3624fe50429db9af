//! Experiment harness - batch loop
//!
//! Runs many independent calibrated simulations, draws random samples from
//! each, and merges the outcomes into the shared [`ResultTable`].
//!
//! # Concurrency model
//!
//! Each batch dispatches a fixed number of tasks through rayon. A task owns
//! its own derived RNG stream, its own calibrated call set, its own engine
//! invocation, and produces a private sample list; no shared mutable state
//! exists during the parallel phase. The only suspension point is the batch
//! join; merging into the table afterwards is single-threaded.
//!
//! The outer loop is unbounded: it runs until the operator stops the
//! process, or until an optional cancellation flag (checked between
//! batches) is raised.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::info;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::calibration::{calibrate, CalibrationConfig, CalibrationError};
use crate::models::Call;
use crate::rng::RngManager;

use super::callback::{match_tolerance, ArrivalIndex};
use super::results::{BucketKey, ResultTable};

/// Callback delays (minutes) sampled by default in callback mode.
pub const DEFAULT_CALLBACK_DELAYS: &[u32] = &[
    0, 1, 2, 3, 4, 5, 10, 20, 30, 40, 50, 60, 90, 120, 240, 360, 720, 1440, 2160, 2880,
];

/// Which outcome the harness samples.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SamplingMode {
    /// Remaining wait for a caller who already waited each patience value
    RemainingWait,

    /// Extra wait caused by hanging up after each patience value and
    /// calling back after each of the given delays (minutes)
    Callback { delays: Vec<u32> },
}

/// Complete experiment configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperimentConfig {
    /// Per-run calibration parameters
    pub calibration: CalibrationConfig,

    /// Largest patience value sampled (inclusive, minutes)
    pub patience_max: u32,

    /// Random call draws per calibrated set
    pub samples_per_run: usize,

    /// Independent simulation tasks dispatched per batch
    pub batch_size: usize,

    /// Per-bucket sample cap in the shared result table
    pub bucket_cap: usize,

    /// Sampling mode
    pub mode: SamplingMode,

    /// Base seed; every task derives its own independent stream from it
    pub rng_seed: u64,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            calibration: CalibrationConfig::default(),
            patience_max: 80,
            samples_per_run: 1000,
            batch_size: 20,
            bucket_cap: 1_000_000,
            mode: SamplingMode::RemainingWait,
            rng_seed: 12345,
        }
    }
}

/// Experiment error types
#[derive(Debug, Error)]
pub enum ExperimentError {
    /// Configuration validation error
    #[error("invalid experiment config: {0}")]
    InvalidConfig(String),

    /// A task's calibration failed
    #[error(transparent)]
    Calibration(#[from] CalibrationError),
}

/// Result of one batch of parallel simulation-and-sampling tasks.
#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary {
    /// 1-based batch number
    pub batch: u64,

    /// Tasks completed in this batch
    pub runs: usize,

    /// Calls generated across this batch's calibrated sets
    pub calls_generated: u64,

    /// Samples produced by this batch (before the bucket cap)
    pub samples_observed: u64,
}

/// Private output of one simulation-and-sampling task.
struct RunOutput {
    calls_generated: u64,
    samples: Vec<(BucketKey, f64)>,
}

/// Monte Carlo experiment harness owning the shared result table.
pub struct ExperimentHarness {
    config: ExperimentConfig,
    table: ResultTable,
    batches_run: u64,
    runs_completed: u64,
    calls_generated: u64,
}

impl ExperimentHarness {
    /// Create a harness from a validated configuration.
    pub fn new(config: ExperimentConfig) -> Result<Self, ExperimentError> {
        config.calibration.validate()?;

        if config.samples_per_run == 0 {
            return Err(ExperimentError::InvalidConfig(
                "samples_per_run must be at least 1".to_string(),
            ));
        }
        if config.batch_size == 0 {
            return Err(ExperimentError::InvalidConfig(
                "batch_size must be at least 1".to_string(),
            ));
        }
        if config.bucket_cap == 0 {
            return Err(ExperimentError::InvalidConfig(
                "bucket_cap must be at least 1".to_string(),
            ));
        }
        if let SamplingMode::Callback { delays } = &config.mode {
            if delays.is_empty() {
                return Err(ExperimentError::InvalidConfig(
                    "callback mode needs at least one delay".to_string(),
                ));
            }
        }

        let table = ResultTable::new(config.bucket_cap);
        Ok(Self {
            config,
            table,
            batches_run: 0,
            runs_completed: 0,
            calls_generated: 0,
        })
    }

    /// Experiment configuration
    pub fn config(&self) -> &ExperimentConfig {
        &self.config
    }

    /// Shared result table
    pub fn table(&self) -> &ResultTable {
        &self.table
    }

    /// Shared result table, mutable (reporting sorts buckets in place)
    pub fn table_mut(&mut self) -> &mut ResultTable {
        &mut self.table
    }

    /// Batches completed so far
    pub fn batches_run(&self) -> u64 {
        self.batches_run
    }

    /// Calls generated across all batches (progress indicator)
    pub fn calls_generated(&self) -> u64 {
        self.calls_generated
    }

    /// Run one batch of independent calibrate-and-sample tasks in parallel
    /// and merge their sample lists into the table.
    pub fn run_batch(&mut self) -> Result<BatchSummary, ExperimentError> {
        let config = &self.config;
        let first_stream = self.runs_completed;

        let outputs: Result<Vec<RunOutput>, CalibrationError> = (0..config.batch_size)
            .into_par_iter()
            .map(|task| {
                let mut rng = RngManager::stream(config.rng_seed, first_stream + task as u64);
                let calls = calibrate(&config.calibration, &mut rng)?;
                let samples = sample_run(&calls, &mut rng, config);
                Ok(RunOutput {
                    calls_generated: calls.len() as u64,
                    samples,
                })
            })
            .collect();

        let mut batch_calls = 0;
        let mut batch_samples = 0;
        for output in outputs? {
            batch_calls += output.calls_generated;
            batch_samples += output.samples.len() as u64;
            self.table.merge(output.samples);
        }

        self.batches_run += 1;
        self.runs_completed += self.config.batch_size as u64;
        self.calls_generated += batch_calls;
        info!("total calls generated: {}", self.calls_generated);

        Ok(BatchSummary {
            batch: self.batches_run,
            runs: self.config.batch_size,
            calls_generated: batch_calls,
            samples_observed: batch_samples,
        })
    }

    /// Run batches until the optional stop flag is raised.
    ///
    /// The flag is checked between batches only; an in-flight batch always
    /// completes. After every batch the table and the batch summary are
    /// handed to `on_batch`, which is where the reporting sink plugs in.
    pub fn run_with_progress<F>(
        &mut self,
        stop_flag: Option<Arc<AtomicBool>>,
        mut on_batch: F,
    ) -> Result<(), ExperimentError>
    where
        F: FnMut(&mut ResultTable, &BatchSummary),
    {
        loop {
            if let Some(ref flag) = stop_flag {
                if flag.load(Ordering::Relaxed) {
                    return Ok(());
                }
            }
            let summary = self.run_batch()?;
            on_batch(&mut self.table, &summary);
        }
    }
}

/// Draw outcome samples from one calibrated set.
///
/// Each draw picks a random call. For every patience value the call
/// survived (`waiting > patience`), remaining-wait mode records
/// `waiting - patience`; callback mode instead looks up the call nearest
/// the hypothetical re-arrival instant for every delay and records the
/// extra wait caused by calling back. Combinations with no match inside
/// the tolerance window are skipped.
fn sample_run(
    calls: &[Call],
    rng: &mut RngManager,
    config: &ExperimentConfig,
) -> Vec<(BucketKey, f64)> {
    let index = match &config.mode {
        SamplingMode::Callback { .. } => Some(ArrivalIndex::new(calls)),
        SamplingMode::RemainingWait => None,
    };

    let mut samples = Vec::new();
    for _ in 0..config.samples_per_run {
        let call = &calls[rng.index(calls.len())];
        let waiting = call.waiting();

        for patience in 0..=config.patience_max {
            let patience_minutes = patience as f64;
            if waiting <= patience_minutes {
                // Answered before this patience ran out; nothing to observe.
                continue;
            }
            let time_left_if_staying = waiting - patience_minutes;

            match &config.mode {
                SamplingMode::RemainingWait => {
                    samples.push((BucketKey::patience(patience), time_left_if_staying));
                }
                SamplingMode::Callback { delays } => {
                    let index = index.as_ref().expect("index exists in callback mode");
                    for &delay in delays {
                        let wanted = call.arrival_time() + patience_minutes + delay as f64;
                        let matched = index.nearest_waiting(wanted, match_tolerance(delay));
                        if let Some(matched_waiting) = matched {
                            samples.push((
                                BucketKey::callback(patience, delay),
                                matched_waiting - time_left_if_staying,
                            ));
                        }
                    }
                }
            }
        }
    }
    samples
}
