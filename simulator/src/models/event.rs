//! Scheduled events for the simulation engine
//!
//! The engine processes events from a time-ordered queue. Two kinds exist:
//! a call arriving, and an agent finishing service on a call.
//!
//! # Ordering
//!
//! Events are totally ordered by:
//! 1. time, ascending;
//! 2. at equal time, end-of-service before arrival, so an agent freed at
//!    instant `t` can immediately pick up a call arriving at `t`;
//! 3. remaining ties by sequence number, so simultaneous arrivals enter the
//!    wait queue in insertion order.
//!
//! `Ord` is implemented **reversed** so that `std::collections::BinaryHeap`
//! (a max-heap) pops the earliest event first.

use std::cmp::Ordering;

/// What happened at the event's timestamp.
///
/// Calls are referenced by index into the engine's call slice; agents by
/// index into the agent bank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// A call entered the system and joins the wait queue
    Arrival {
        /// Index of the arriving call
        call: usize,
    },

    /// An agent finished serving a call and becomes idle
    EndOfService {
        /// Index of the call that just finished
        call: usize,
        /// Agent slot that was serving it
        agent: usize,
    },
}

impl EventKind {
    /// Rank used for same-timestamp ordering: completions before arrivals.
    fn rank(&self) -> u8 {
        match self {
            EventKind::EndOfService { .. } => 0,
            EventKind::Arrival { .. } => 1,
        }
    }
}

/// An instantaneous occurrence scheduled on the engine's event queue
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Event {
    /// Simulated clock time the event fires (minutes)
    pub time: f64,

    /// Monotonic insertion counter breaking remaining ties deterministically
    pub seq: u64,

    /// Event payload
    pub kind: EventKind,
}

impl Event {
    /// Create an arrival event for the call at `call`
    pub fn arrival(time: f64, seq: u64, call: usize) -> Self {
        Self {
            time,
            seq,
            kind: EventKind::Arrival { call },
        }
    }

    /// Create an end-of-service event for `call` on agent slot `agent`
    pub fn end_of_service(time: f64, seq: u64, call: usize, agent: usize) -> Self {
        Self {
            time,
            seq,
            kind: EventKind::EndOfService { call, agent },
        }
    }
}

impl Eq for Event {}

impl PartialOrd for Event {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Event {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so the std max-heap yields the earliest event.
        self.time
            .total_cmp(&other.time)
            .then_with(|| self.kind.rank().cmp(&other.kind.rank()))
            .then_with(|| self.seq.cmp(&other.seq))
            .reverse()
    }
}
