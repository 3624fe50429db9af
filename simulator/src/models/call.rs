//! Call model
//!
//! Represents one caller attempt. Each call has:
//! - Arrival time (minutes, fixed at creation)
//! - Talk duration (minutes, fixed at creation, drawn from an exponential
//!   distribution once answered)
//! - Answered time (unset until the simulation engine assigns an agent;
//!   assigned exactly once, never earlier than the arrival)
//!
//! Derived values: `ended_time = answered + talk_duration` and
//! `waiting = answered - arrival` (non-negative once answered).

use serde::{Deserialize, Serialize};

/// One simulated customer contact
///
/// # Example
/// ```
/// use callcenter_simulator_core::Call;
///
/// let mut call = Call::new(10.0, 4.5);
/// assert!(!call.is_answered());
///
/// call.answer(12.0);
/// assert_eq!(call.waiting(), 2.0);
/// assert_eq!(call.ended_time(), 16.5);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Call {
    /// Simulated clock time the call enters the system (minutes)
    arrival_time: f64,

    /// Duration of service once answered (minutes)
    talk_duration: f64,

    /// Clock time an agent picked the call up; None while still unserved
    answered_time: Option<f64>,
}

impl Call {
    /// Create a new call
    ///
    /// # Panics
    /// Panics if either time is negative or non-finite
    pub fn new(arrival_time: f64, talk_duration: f64) -> Self {
        assert!(
            arrival_time >= 0.0 && arrival_time.is_finite(),
            "arrival_time must be non-negative and finite"
        );
        assert!(
            talk_duration >= 0.0 && talk_duration.is_finite(),
            "talk_duration must be non-negative and finite"
        );

        Self {
            arrival_time,
            talk_duration,
            answered_time: None,
        }
    }

    /// Arrival time in minutes
    pub fn arrival_time(&self) -> f64 {
        self.arrival_time
    }

    /// Talk duration in minutes
    pub fn talk_duration(&self) -> f64 {
        self.talk_duration
    }

    /// Answered time, if an agent has picked the call up
    pub fn answered_time(&self) -> Option<f64> {
        self.answered_time
    }

    /// Whether an agent has picked the call up
    pub fn is_answered(&self) -> bool {
        self.answered_time.is_some()
    }

    /// Record the moment an agent picks this call up.
    ///
    /// # Panics
    /// Panics if the call was already answered, or if `now` precedes the
    /// arrival time. Both indicate a defect in the simulation engine.
    pub fn answer(&mut self, now: f64) {
        assert!(
            self.answered_time.is_none(),
            "call answered twice (previous at {:?}, now at {})",
            self.answered_time,
            now
        );
        assert!(
            now >= self.arrival_time,
            "call answered at {} before its arrival at {}",
            now,
            self.arrival_time
        );
        self.answered_time = Some(now);
    }

    /// Forget the answered time so the call can go through a fresh
    /// engine run. Arrival and talk duration are unaffected.
    pub fn clear_answer(&mut self) {
        self.answered_time = None;
    }

    /// Clock time service finishes
    ///
    /// # Panics
    /// Panics if the call has not been answered
    pub fn ended_time(&self) -> f64 {
        self.expect_answered("ended_time") + self.talk_duration
    }

    /// Minutes spent on hold between arrival and being answered
    ///
    /// # Panics
    /// Panics if the call has not been answered
    pub fn waiting(&self) -> f64 {
        self.expect_answered("waiting") - self.arrival_time
    }

    fn expect_answered(&self, what: &str) -> f64 {
        match self.answered_time {
            Some(t) => t,
            None => panic!("{} requested for a call that was never answered", what),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_call_is_unanswered() {
        let call = Call::new(3.0, 7.0);
        assert!(!call.is_answered());
        assert_eq!(call.answered_time(), None);
        assert_eq!(call.arrival_time(), 3.0);
        assert_eq!(call.talk_duration(), 7.0);
    }

    #[test]
    fn test_answer_sets_derived_values() {
        let mut call = Call::new(3.0, 7.0);
        call.answer(5.0);

        assert!(call.is_answered());
        assert_eq!(call.waiting(), 2.0);
        assert_eq!(call.ended_time(), 12.0);
    }

    #[test]
    fn test_answer_at_arrival_gives_zero_wait() {
        let mut call = Call::new(3.0, 7.0);
        call.answer(3.0);
        assert_eq!(call.waiting(), 0.0);
    }

    #[test]
    fn test_clear_answer_allows_fresh_run() {
        let mut call = Call::new(3.0, 7.0);
        call.answer(5.0);
        call.clear_answer();
        assert!(!call.is_answered());
        call.answer(4.0);
        assert_eq!(call.waiting(), 1.0);
    }

    #[test]
    #[should_panic(expected = "answered twice")]
    fn test_double_answer_panics() {
        let mut call = Call::new(3.0, 7.0);
        call.answer(5.0);
        call.answer(6.0);
    }

    #[test]
    #[should_panic(expected = "before its arrival")]
    fn test_answer_before_arrival_panics() {
        let mut call = Call::new(3.0, 7.0);
        call.answer(2.0);
    }

    #[test]
    #[should_panic(expected = "never answered")]
    fn test_waiting_on_unanswered_panics() {
        let call = Call::new(3.0, 7.0);
        call.waiting();
    }

    #[test]
    #[should_panic(expected = "must be non-negative")]
    fn test_negative_arrival_panics() {
        Call::new(-1.0, 7.0);
    }
}
