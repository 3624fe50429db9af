//! Arrival generation module for deterministic call creation.
//!
//! Produces raw candidate calls from two probability distributions: arrival
//! times uniform over a long horizon window, talk durations exponential with
//! a configured mean. All generation is deterministic based on the RNG seed.
//!
//! # Example
//!
//! ```
//! use callcenter_simulator_core::arrivals::{ArrivalConfig, CallGenerator};
//! use callcenter_simulator_core::rng::RngManager;
//!
//! let mut rng = RngManager::new(42);
//! let generator = CallGenerator::new(ArrivalConfig::default());
//!
//! let call = generator.generate(&mut rng);
//! assert!(call.arrival_time() < 100_000.0);
//! ```

use crate::models::Call;
use crate::rng::RngManager;

/// Configuration for candidate call generation.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ArrivalConfig {
    /// Length of the simulated window arrivals are spread over (minutes)
    pub horizon_minutes: f64,

    /// Mean of the exponential talk-duration distribution (minutes)
    pub mean_talk_minutes: f64,
}

impl Default for ArrivalConfig {
    fn default() -> Self {
        Self {
            horizon_minutes: 100_000.0,
            mean_talk_minutes: 5.0,
        }
    }
}

/// Generator for candidate calls.
///
/// Stateless apart from its configuration: every sample is a pure function
/// of the supplied random source.
#[derive(Debug, Clone)]
pub struct CallGenerator {
    config: ArrivalConfig,
}

impl CallGenerator {
    /// Create a new call generator.
    ///
    /// Configuration sanity (positive horizon and mean) is enforced by the
    /// calibration layer before a generator is constructed.
    pub fn new(config: ArrivalConfig) -> Self {
        Self { config }
    }

    /// Generator configuration
    pub fn config(&self) -> &ArrivalConfig {
        &self.config
    }

    /// Draw one candidate call.
    ///
    /// Arrival time is uniform over `[0, horizon_minutes)`; talk duration is
    /// exponential with mean `mean_talk_minutes` (inverse-CDF sampling).
    pub fn generate(&self, rng: &mut RngManager) -> Call {
        let arrival = rng.uniform(self.config.horizon_minutes);
        let talk = rng.exp(self.config.mean_talk_minutes);
        Call::new(arrival, talk)
    }

    /// Draw `count` candidate calls.
    pub fn generate_batch(&self, count: usize, rng: &mut RngManager) -> Vec<Call> {
        (0..count).map(|_| self.generate(rng)).collect()
    }
}
