//! # Table (Orchestrator)
//!
//! The table owns every fork and philosopher, wires each philosopher to
//! its two neighbours, runs the simulation, and classifies the outcome.
//!
//! Deadlock detection is timeout-based liveness inference, the same
//! heuristic the original used: after the stop signal, each
//! philosopher task gets a bounded grace period to join. A task still
//! pending at expiry is recorded as blocked and abandoned (its join
//! handle is dropped, not aborted) so the process itself never hangs on
//! a deadlocked ring. This is not wait-for-graph analysis: a
//! slow-but-live philosopher can be misclassified if the grace period
//! is short relative to the think/eat intervals.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio::time::{sleep, timeout, Instant};
use tracing::{error, info, warn};

use crate::config::SimConfig;
use crate::error::SimulationError;
use crate::fork::Fork;
use crate::philosopher::{Philosopher, PhilosopherHandle};
use crate::report::RunResult;

/// A fully wired table, ready to run once.
pub struct Table {
    config: SimConfig,
    philosophers: Vec<Philosopher>,
    running: Arc<AtomicBool>,
}

impl std::fmt::Debug for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Table")
            .field("config", &self.config)
            .field("philosophers", &self.philosophers.len())
            .field("running", &self.running)
            .finish()
    }
}

impl Table {
    /// Validates the configuration and builds N forks plus N
    /// philosophers with the cyclic assignment: philosopher *i* gets
    /// fork *i* on its left and fork *(i+1) mod N* on its right.
    ///
    /// Fails with [`SimulationError::InvalidConfiguration`] before any
    /// task starts; there is no partial run.
    pub fn configure(config: SimConfig) -> Result<Self, SimulationError> {
        config.validate()?;

        let n = config.num_philosophers;
        let running = Arc::new(AtomicBool::new(true));
        let forks: Vec<Arc<Fork>> = (0..n).map(|id| Arc::new(Fork::new(id))).collect();
        let philosophers = (0..n)
            .map(|id| {
                Philosopher::new(
                    id,
                    forks[id].clone(),
                    forks[(id + 1) % n].clone(),
                    &config,
                    running.clone(),
                )
            })
            .collect();

        info!(
            num_philosophers = n,
            strategy = %config.strategy,
            "table configured"
        );
        Ok(Self {
            config,
            philosophers,
            running,
        })
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Seat map as `(philosopher, left fork, right fork)` triples, in
    /// seat order. Lets callers check the wiring without running.
    pub fn topology(&self) -> Vec<(usize, usize, usize)> {
        self.philosophers
            .iter()
            .map(|p| (p.id(), p.left_fork(), p.right_fork()))
            .collect()
    }

    /// Runs the simulation to completion: spawn every philosopher,
    /// sleep for the configured duration, signal stop, then join each
    /// task under the grace period and classify the stragglers as
    /// blocked.
    ///
    /// Returns after stop + grace periods elapse, even if some
    /// philosophers never terminate. A detected deadlock is a normal
    /// result, not an error; the only run-time failure is a panicked
    /// philosopher task.
    pub async fn run(mut self) -> Result<RunResult, SimulationError> {
        let num = self.philosophers.len();
        info!(
            num_philosophers = num,
            strategy = %self.config.strategy,
            duration = ?self.config.run_duration,
            "starting simulation"
        );

        let started = Instant::now();
        let spawned: Vec<(PhilosopherHandle, JoinHandle<()>)> = self
            .philosophers
            .drain(..)
            .map(|philosopher| {
                let handle = philosopher.handle();
                (handle, tokio::spawn(philosopher.run()))
            })
            .collect();

        sleep(self.config.run_duration).await;
        let elapsed = started.elapsed();
        self.running.store(false, Ordering::Release);
        info!("stop signalled, waiting for philosophers");

        let mut handles = Vec::with_capacity(num);
        let mut blocked = Vec::new();
        for (handle, task) in spawned {
            match timeout(self.config.grace_period, task).await {
                Ok(Ok(())) => {}
                Ok(Err(join_error)) if join_error.is_panic() => {
                    error!(philosopher = handle.id, "philosopher task panicked");
                    return Err(SimulationError::PhilosopherPanicked { id: handle.id });
                }
                Ok(Err(_)) => {
                    // We never abort tasks, so a cancelled join means the
                    // runtime is shutting down under us; count the seat
                    // as blocked rather than invent a new outcome.
                    warn!(philosopher = handle.id, "task cancelled before joining");
                    blocked.push(handle.id);
                }
                Err(_) => {
                    // Timed out: dropping the join handle abandons the
                    // task without aborting it.
                    warn!(
                        philosopher = handle.id,
                        phase = ?handle.phase(),
                        "still blocked after grace period, abandoning"
                    );
                    blocked.push(handle.id);
                }
            }
            handles.push(handle);
        }

        let result = RunResult::from_run(
            self.config.strategy,
            self.config.run_duration,
            elapsed,
            &handles,
            blocked,
        );
        result.log_summary();
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::Strategy;
    use std::time::Duration;

    fn config(n: usize) -> SimConfig {
        SimConfig::new(n, Strategy::Hierarchy, Duration::from_secs(1))
    }

    #[test]
    fn wires_philosophers_in_a_cycle() {
        let table = Table::configure(config(5)).unwrap();
        let topology = table.topology();
        assert_eq!(topology.len(), 5);
        for (id, left, right) in topology {
            assert_eq!(left, id);
            assert_eq!(right, (id + 1) % 5);
            assert_ne!(left, right);
        }
    }

    #[test]
    fn every_fork_has_exactly_one_left_and_one_right_owner() {
        let table = Table::configure(config(7)).unwrap();
        let mut left_owners = vec![0usize; 7];
        let mut right_owners = vec![0usize; 7];
        for (_, left, right) in table.topology() {
            left_owners[left] += 1;
            right_owners[right] += 1;
        }
        assert!(left_owners.iter().all(|&count| count == 1));
        assert!(right_owners.iter().all(|&count| count == 1));
    }

    #[test]
    fn identical_configs_yield_identical_topologies() {
        let first = Table::configure(config(6)).unwrap();
        let second = Table::configure(config(6)).unwrap();
        assert_eq!(first.topology(), second.topology());
    }

    #[test]
    fn rejects_a_table_for_one() {
        let err = Table::configure(config(1)).unwrap_err();
        assert!(matches!(err, SimulationError::InvalidConfiguration(_)));
    }
}
