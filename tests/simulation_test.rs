//! End-to-end simulation runs for all three strategies.
//!
//! Timings are scaled down from the demo defaults so the suite stays
//! fast, but the ratios preserve the properties under test: the
//! deadlock pause dwarfs task startup skew, and the grace period
//! comfortably exceeds one think+eat cycle so live philosophers are
//! never misclassified as blocked. Deadlock detection is a timeout
//! heuristic, not wait-for-graph analysis, so those ratios are what the
//! assertions actually rely on.

use std::time::Duration;

use dining_sim::{DeadlockVerdict, SimConfig, SimulationError, Strategy, Table};

/// Config with millisecond-scale timings for tests.
fn quick_config(n: usize, strategy: Strategy, run_ms: u64) -> SimConfig {
    SimConfig::new(n, strategy, Duration::from_millis(run_ms))
        .with_timings(Duration::from_millis(5), Duration::from_millis(5))
        .with_grace_period(Duration::from_secs(1))
}

/// N=5 under the resource hierarchy: never deadlocks, and half a second
/// is enough for every philosopher to eat at least once.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn hierarchy_run_completes_without_deadlock() {
    let table = Table::configure(quick_config(5, Strategy::Hierarchy, 500)).unwrap();

    let result = table.run().await.unwrap();

    assert_eq!(result.deadlock_verdict, DeadlockVerdict::No);
    assert!(result.blocked_philosophers.is_empty());
    assert_eq!(result.per_philosopher_meals.len(), 5);
    assert!(
        result.min_meals() >= Some(1),
        "every philosopher should eat: {:?}",
        result.per_philosopher_meals
    );
    assert!(result.elapsed_duration >= result.requested_duration);
}

/// The asymmetric strategy is deadlock-free regardless of table parity.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn asymmetric_run_is_live_for_even_and_odd_tables() {
    for n in [4, 5] {
        let table = Table::configure(quick_config(n, Strategy::Asymmetric, 400)).unwrap();

        let result = table.run().await.unwrap();

        assert_eq!(result.deadlock_verdict, DeadlockVerdict::No, "n = {n}");
        assert!(result.blocked_philosophers.is_empty(), "n = {n}");
        assert!(result.total_meals() > 0, "n = {n}");
    }
}

/// The smallest valid table still works.
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn hierarchy_works_at_the_minimal_table() {
    let table = Table::configure(quick_config(2, Strategy::Hierarchy, 300)).unwrap();

    let result = table.run().await.unwrap();

    assert_eq!(result.deadlock_verdict, DeadlockVerdict::No);
    assert!(result.blocked_philosophers.is_empty());
}

/// The deadlock strategy does what it says: with the forced pause far
/// larger than spawn skew, every philosopher grabs its left fork, then
/// waits forever on its right one. Nobody eats; everybody blocks.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn deadlock_strategy_blocks_the_whole_table() {
    let config = SimConfig::new(5, Strategy::Deadlock, Duration::from_millis(400))
        .with_timings(Duration::from_millis(10), Duration::from_millis(10))
        .with_deadlock_pause(Duration::from_millis(300))
        // Narrowed on purpose: these tasks will never join.
        .with_grace_period(Duration::from_millis(250));
    let table = Table::configure(config).unwrap();

    let result = table.run().await.unwrap();

    assert_eq!(result.deadlock_verdict, DeadlockVerdict::Yes);
    assert!(result.is_deadlocked());
    assert_eq!(result.blocked_philosophers, vec![0, 1, 2, 3, 4]);
    assert_eq!(
        result.per_philosopher_meals,
        vec![0, 0, 0, 0, 0],
        "each philosopher pauses holding only its left fork, so nobody eats"
    );
}

/// A table for one is rejected before anything runs.
#[tokio::test]
async fn configure_rejects_a_single_philosopher() {
    let err = dining_sim::configure(1, Strategy::Hierarchy, Duration::from_secs(1)).unwrap_err();
    assert!(matches!(err, SimulationError::InvalidConfiguration(_)));
    assert_eq!(err.exit_code(), 2);
}
