//! Volume calibrator
//!
//! Searches for a call volume whose steady-state median wait lands just
//! under a target threshold, so experiments run at a realistic, comparable
//! load. Works by adaptive step search: the call set grows by doubling
//! steps while the median wait is below the target, then shrinks and
//! re-grows by halving steps until the step reaches zero.
//!
//! The whole set is re-simulated from scratch every round; there is no
//! incremental simulation. Shrinking removes the most recently added
//! candidates (tail removal, not a random subset), which overshoots the
//! target and re-approaches it from below.
//!
//! The exact convergence point is path-dependent: the guarantee is only
//! that the final median wait is just under the target.

use log::{debug, info};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::arrivals::{ArrivalConfig, CallGenerator};
use crate::engine;
use crate::models::Call;
use crate::rng::RngManager;
use crate::stats;

/// Parameters of one calibration run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalibrationConfig {
    /// Number of homogeneous agents serving the queue
    pub agent_count: usize,

    /// Median wait (minutes) the calibrated set should land just under
    pub median_wait_target: f64,

    /// Candidate-call generation parameters
    pub arrivals: ArrivalConfig,

    /// Hard cap on search rounds; exceeded means the target is unreachable
    /// with these parameters
    pub max_rounds: usize,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            agent_count: 5,
            median_wait_target: 5.0,
            arrivals: ArrivalConfig::default(),
            max_rounds: 10_000,
        }
    }
}

impl CalibrationConfig {
    /// Validate the numeric parameter sanity constraints.
    pub fn validate(&self) -> Result<(), CalibrationError> {
        if self.agent_count < 1 {
            return Err(CalibrationError::InvalidConfig(
                "agent_count must be at least 1".to_string(),
            ));
        }
        if !(self.median_wait_target > 0.0 && self.median_wait_target.is_finite()) {
            return Err(CalibrationError::InvalidConfig(
                "median_wait_target must be positive and finite".to_string(),
            ));
        }
        if !(self.arrivals.mean_talk_minutes > 0.0 && self.arrivals.mean_talk_minutes.is_finite()) {
            return Err(CalibrationError::InvalidConfig(
                "mean_talk_minutes must be positive and finite".to_string(),
            ));
        }
        if !(self.arrivals.horizon_minutes > 0.0 && self.arrivals.horizon_minutes.is_finite()) {
            return Err(CalibrationError::InvalidConfig(
                "horizon_minutes must be positive and finite".to_string(),
            ));
        }
        if self.max_rounds == 0 {
            return Err(CalibrationError::InvalidConfig(
                "max_rounds must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Errors that can occur during calibration
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CalibrationError {
    /// Configuration validation error
    #[error("invalid calibration config: {0}")]
    InvalidConfig(String),

    /// The step search did not reach step zero within the round cap
    #[error("calibration did not converge within {max_rounds} rounds (call set size {calls})")]
    RoundLimitExceeded { max_rounds: usize, calls: usize },
}

/// Size a call set so its median wait lands just under the configured
/// target, returning the set sorted ascending by waiting time.
///
/// Every call in the returned set has been through the simulation engine
/// and carries an answered time.
///
/// # Example
/// ```
/// use callcenter_simulator_core::arrivals::ArrivalConfig;
/// use callcenter_simulator_core::calibration::{calibrate, CalibrationConfig};
/// use callcenter_simulator_core::rng::RngManager;
///
/// let config = CalibrationConfig {
///     agent_count: 2,
///     median_wait_target: 2.0,
///     arrivals: ArrivalConfig {
///         horizon_minutes: 500.0,
///         mean_talk_minutes: 5.0,
///     },
///     max_rounds: 10_000,
/// };
/// let mut rng = RngManager::new(42);
///
/// let calls = calibrate(&config, &mut rng).unwrap();
/// assert!(!calls.is_empty());
/// ```
pub fn calibrate(
    config: &CalibrationConfig,
    rng: &mut RngManager,
) -> Result<Vec<Call>, CalibrationError> {
    config.validate()?;

    let generator = CallGenerator::new(config.arrivals.clone());
    let mut calls: Vec<Call> = Vec::new();
    let mut step: i64 = 1;
    let mut growing = true;

    for _round in 0..config.max_rounds {
        if step > 0 {
            calls.extend(generator.generate_batch(step as usize, rng));
        } else {
            // Tail removal. The set never empties: a lone call waits zero,
            // below any valid target.
            let shrink = (-step) as usize;
            calls.truncate(calls.len() - shrink);
        }

        engine::simulate(&mut calls, config.agent_count);

        let mut waits: Vec<f64> = calls.iter().map(Call::waiting).collect();
        waits.sort_unstable_by(f64::total_cmp);
        let median = stats::median_sorted(&waits).expect("calibration set is empty");

        debug!(
            "calls: {}, step: {}, median wait: {:.2}m",
            calls.len(),
            step,
            median
        );

        if median < config.median_wait_target {
            step = if growing { step.abs() * 2 } else { step.abs() / 2 };
        } else {
            growing = false;
            step = -(step.abs() / 2);
            if step == 0 {
                // Keep trimming one call at a time until the median drops
                // below the target; the search may only terminate from the
                // under-target side.
                step = -1;
            }
        }

        if step == 0 {
            info!(
                "calibrated: {} calls, median={:.2}m, 95%={:.2}m, max={:.2}m",
                calls.len(),
                median,
                stats::percentile_sorted(&waits, 95.0).expect("calibration set is empty"),
                waits.last().copied().expect("calibration set is empty"),
            );
            calls.sort_by(|a, b| a.waiting().total_cmp(&b.waiting()));
            return Ok(calls);
        }
    }

    Err(CalibrationError::RoundLimitExceeded {
        max_rounds: config.max_rounds,
        calls: calls.len(),
    })
}
