//! Discrete-event simulation engine
//!
//! Consumes a fixed set of calls and an agent count, runs the event loop,
//! and assigns each call's answered time in place.
//!
//! # Algorithm
//!
//! 1. Seed a min-priority queue of events with one arrival per call.
//! 2. Maintain a FIFO wait queue and a bank of agent slots, all idle.
//! 3. Pop events in time order. An arrival appends its call to the wait
//!    queue; an end of service frees the named agent slot.
//! 4. After each event, scan agent slots in index order and hand the head
//!    of the wait queue to every idle slot, scheduling the matching end of
//!    service at `now + talk_duration`.
//!
//! At equal timestamps, end-of-service events are processed before
//! arrivals, so a freed agent immediately picks up a simultaneously
//! arriving call (see [`crate::models::Event`] ordering).
//!
//! # Invariants
//!
//! Internal-consistency violations abort the run via `assert!` (active in
//! release builds): an end-of-service event must name the call its agent
//! slot currently holds, and the wait queue must be empty once the event
//! queue drains. Queue discipline is strict FIFO: no priorities, no
//! abandonment while waiting.

use std::collections::{BinaryHeap, VecDeque};

use crate::models::{Call, Event, EventKind};

/// Run the discrete-event loop over `calls` with `agent_count` agents,
/// assigning every call's answered time in place.
///
/// Any previously assigned answered times are cleared first, so running the
/// engine twice over the same set yields identical results.
///
/// Agent selection prefers the lowest-index idle slot. Agents are
/// homogeneous, so this does not affect wait-time statistics, only
/// per-agent utilization if that were ever measured.
///
/// # Panics
/// Panics if `agent_count` is zero, or on an internal invariant violation.
///
/// # Example
/// ```
/// use callcenter_simulator_core::{engine, Call};
///
/// let mut calls = vec![Call::new(0.0, 5.0), Call::new(0.0, 5.0)];
/// engine::simulate(&mut calls, 1);
///
/// assert_eq!(calls[0].waiting(), 0.0);
/// assert_eq!(calls[1].waiting(), 5.0);
/// ```
pub fn simulate(calls: &mut [Call], agent_count: usize) {
    assert!(agent_count >= 1, "agent_count must be at least 1");

    let mut events = BinaryHeap::with_capacity(calls.len() * 2);
    let mut seq: u64 = 0;
    for (id, call) in calls.iter_mut().enumerate() {
        call.clear_answer();
        events.push(Event::arrival(call.arrival_time(), seq, id));
        seq += 1;
    }

    // Both owned exclusively by this invocation.
    let mut waiting: VecDeque<usize> = VecDeque::new();
    let mut agents: Vec<Option<usize>> = vec![None; agent_count];

    while let Some(event) = events.pop() {
        let now = event.time;

        match event.kind {
            EventKind::Arrival { call } => {
                waiting.push_back(call);
            }
            EventKind::EndOfService { call, agent } => {
                assert_eq!(
                    agents[agent],
                    Some(call),
                    "agent slot {} finished call {} it was not serving",
                    agent,
                    call
                );
                agents[agent] = None;
            }
        }

        // Hand queued calls to free agents, lowest slot first.
        for agent in 0..agents.len() {
            if agents[agent].is_some() {
                continue;
            }
            let Some(id) = waiting.pop_front() else {
                break;
            };
            calls[id].answer(now);
            agents[agent] = Some(id);
            events.push(Event::end_of_service(calls[id].ended_time(), seq, id, agent));
            seq += 1;
        }
    }

    assert!(
        waiting.is_empty(),
        "{} calls still waiting after the event queue drained",
        waiting.len()
    );
}
