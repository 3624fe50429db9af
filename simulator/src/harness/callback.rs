//! Re-arrival matching for callback sampling
//!
//! A caller who hangs up after `patience` minutes and calls back `delay`
//! minutes later would re-enter the system at
//! `arrival + patience + delay`. Rather than simulating that hypothetical
//! call, the harness looks up the actual call in the same calibrated set
//! whose arrival time is nearest the wanted instant, within a
//! delay-dependent tolerance window. Finding no match is expected and
//! simply excludes the combination from that bucket's samples.

use crate::models::Call;

/// Tolerance window (minutes) around the wanted re-arrival instant.
///
/// Short delays demand a tight match; long delays land in thinner regions
/// of the arrival stream and get a wider window.
pub fn match_tolerance(delay: u32) -> f64 {
    if delay == 0 {
        0.2
    } else if delay <= 10 {
        0.5
    } else if delay < 120 {
        1.0
    } else {
        3.0
    }
}

/// Arrival-sorted view of a calibrated call set for nearest-arrival lookup.
#[derive(Debug, Clone)]
pub struct ArrivalIndex {
    /// (arrival time, waiting time), sorted ascending by arrival
    entries: Vec<(f64, f64)>,
}

impl ArrivalIndex {
    /// Build the index from a calibrated set.
    ///
    /// # Panics
    /// Panics if any call has not been through the simulation engine.
    pub fn new(calls: &[Call]) -> Self {
        let mut entries: Vec<(f64, f64)> = calls
            .iter()
            .map(|c| (c.arrival_time(), c.waiting()))
            .collect();
        entries.sort_unstable_by(|a, b| a.0.total_cmp(&b.0));
        Self { entries }
    }

    /// Number of indexed calls
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Waiting time of the call whose arrival is nearest `wanted`, if that
    /// arrival lies within `±tolerance` minutes (inclusive).
    pub fn nearest_waiting(&self, wanted: f64, tolerance: f64) -> Option<f64> {
        let idx = self.entries.partition_point(|&(arrival, _)| arrival < wanted);

        // Nearest arrival is either the first at/after `wanted` or the one
        // just before it.
        let before = idx.checked_sub(1).and_then(|i| self.entries.get(i));
        let after = self.entries.get(idx);

        let mut best: Option<(f64, f64)> = None;
        for &(arrival, waiting) in before.into_iter().chain(after) {
            let distance = (arrival - wanted).abs();
            if best.map_or(true, |(d, _)| distance < d) {
                best = Some((distance, waiting));
            }
        }

        best.and_then(|(distance, waiting)| (distance <= tolerance).then_some(waiting))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answered_call(arrival: f64, waiting: f64) -> Call {
        let mut call = Call::new(arrival, 1.0);
        call.answer(arrival + waiting);
        call
    }

    #[test]
    fn test_empty_index_never_matches() {
        let index = ArrivalIndex::new(&[]);
        assert!(index.is_empty());
        assert_eq!(index.nearest_waiting(10.0, 100.0), None);
    }

    #[test]
    fn test_picks_nearest_neighbor() {
        let calls = vec![
            answered_call(10.0, 1.0),
            answered_call(20.0, 2.0),
            answered_call(30.0, 3.0),
        ];
        let index = ArrivalIndex::new(&calls);

        assert_eq!(index.nearest_waiting(19.0, 5.0), Some(2.0));
        assert_eq!(index.nearest_waiting(14.0, 5.0), Some(1.0));
        assert_eq!(index.nearest_waiting(31.0, 5.0), Some(3.0));
    }

    #[test]
    fn test_tolerance_is_inclusive() {
        let calls = vec![answered_call(10.0, 1.5)];
        let index = ArrivalIndex::new(&calls);

        assert_eq!(index.nearest_waiting(10.2, 0.2), Some(1.5));
        assert_eq!(index.nearest_waiting(10.21, 0.2), None);
    }
}
