//! Simulation engine semantics: FIFO service order, tie-breaks, and the
//! universal wait-time invariants.

use callcenter_simulator_core::arrivals::{ArrivalConfig, CallGenerator};
use callcenter_simulator_core::rng::RngManager;
use callcenter_simulator_core::{engine, Call};

use proptest::prelude::*;

#[test]
fn test_single_agent_serves_simultaneous_arrivals_in_order() {
    let mut calls = vec![
        Call::new(0.0, 5.0),
        Call::new(0.0, 5.0),
        Call::new(0.0, 5.0),
    ];

    engine::simulate(&mut calls, 1);

    let answered: Vec<f64> = calls.iter().map(|c| c.answered_time().unwrap()).collect();
    let waits: Vec<f64> = calls.iter().map(Call::waiting).collect();
    assert_eq!(answered, vec![0.0, 5.0, 10.0]);
    assert_eq!(waits, vec![0.0, 5.0, 10.0]);
}

#[test]
fn test_enough_agents_means_nobody_waits() {
    let mut calls = vec![
        Call::new(0.0, 3.0),
        Call::new(0.0, 8.0),
        Call::new(0.0, 1.5),
        Call::new(0.0, 20.0),
    ];

    engine::simulate(&mut calls, 4);

    for call in &calls {
        assert_eq!(call.waiting(), 0.0);
    }
}

#[test]
fn test_freed_agent_picks_up_simultaneous_arrival() {
    // First call ends at exactly t=5.0, second arrives at exactly t=5.0.
    let mut calls = vec![Call::new(0.0, 5.0), Call::new(5.0, 2.0)];

    engine::simulate(&mut calls, 1);

    assert_eq!(calls[0].waiting(), 0.0);
    assert_eq!(calls[1].waiting(), 0.0);
    assert_eq!(calls[1].answered_time(), Some(5.0));
}

#[test]
fn test_fifo_order_over_interleaved_arrivals() {
    // One agent busy until t=10; three callers queue up meanwhile.
    let mut calls = vec![
        Call::new(0.0, 10.0),
        Call::new(2.0, 1.0),
        Call::new(1.0, 1.0),
        Call::new(3.0, 1.0),
    ];

    engine::simulate(&mut calls, 1);

    // Served strictly by arrival order: 1.0 first, then 2.0, then 3.0.
    assert_eq!(calls[2].answered_time(), Some(10.0));
    assert_eq!(calls[1].answered_time(), Some(11.0));
    assert_eq!(calls[3].answered_time(), Some(12.0));
}

#[test]
fn test_simulate_is_idempotent() {
    let generator = CallGenerator::new(ArrivalConfig {
        horizon_minutes: 200.0,
        mean_talk_minutes: 5.0,
    });
    let mut rng = RngManager::new(42);
    let mut calls = generator.generate_batch(300, &mut rng);

    engine::simulate(&mut calls, 3);
    let first: Vec<Option<f64>> = calls.iter().map(Call::answered_time).collect();

    engine::simulate(&mut calls, 3);
    let second: Vec<Option<f64>> = calls.iter().map(Call::answered_time).collect();

    assert_eq!(first, second);
}

#[test]
fn test_every_call_is_answered_no_earlier_than_arrival() {
    let generator = CallGenerator::new(ArrivalConfig {
        horizon_minutes: 500.0,
        mean_talk_minutes: 4.0,
    });
    let mut rng = RngManager::new(7);
    let mut calls = generator.generate_batch(1000, &mut rng);

    engine::simulate(&mut calls, 2);

    for call in &calls {
        assert!(call.is_answered());
        assert!(call.answered_time().unwrap() >= call.arrival_time());
        assert!(call.waiting() >= 0.0);
    }
}

#[test]
#[should_panic(expected = "agent_count must be at least 1")]
fn test_zero_agents_panics() {
    let mut calls = vec![Call::new(0.0, 1.0)];
    engine::simulate(&mut calls, 0);
}

proptest! {
    /// Universal invariants over arbitrary call sets and agent counts:
    /// every call gets answered, never before its arrival, and a second
    /// run reproduces the first exactly.
    #[test]
    fn prop_simulation_invariants(
        raw in prop::collection::vec((0.0f64..100.0, 0.0f64..10.0), 1..60),
        agent_count in 1usize..6,
    ) {
        let mut calls: Vec<Call> = raw
            .iter()
            .map(|&(arrival, talk)| Call::new(arrival, talk))
            .collect();

        engine::simulate(&mut calls, agent_count);

        for call in &calls {
            prop_assert!(call.is_answered());
            prop_assert!(call.waiting() >= 0.0);
        }

        let first: Vec<Option<f64>> = calls.iter().map(Call::answered_time).collect();
        engine::simulate(&mut calls, agent_count);
        let second: Vec<Option<f64>> = calls.iter().map(Call::answered_time).collect();
        prop_assert_eq!(first, second);
    }
}
