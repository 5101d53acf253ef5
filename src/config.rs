//! # Simulation Configuration
//!
//! All parameters of a run live in [`SimConfig`]: the table size, the
//! acquisition strategy, the requested run duration, and the timing
//! tunables. The batch harness sweeps configurations by constructing
//! different `SimConfig` values; nothing is baked into constants that
//! would have to be rewritten between runs.
//!
//! Timing defaults match the canonical demonstration: think 100 ms, eat
//! 200 ms, a 500 ms pause between pickups under the deadlock strategy,
//! and a 2 s grace period for the post-run join.

use std::time::Duration;

use crate::error::SimulationError;
use crate::strategy::Strategy;

/// Default interval a philosopher spends thinking per cycle.
pub const DEFAULT_THINK: Duration = Duration::from_millis(100);
/// Default interval a philosopher spends eating per cycle.
pub const DEFAULT_EAT: Duration = Duration::from_millis(200);
/// Default pause between first and second pickup under the deadlock
/// strategy. Tuned, not guaranteed: it only needs to dominate task
/// startup skew so that every philosopher holds its left fork before
/// any reaches for the right one.
pub const DEFAULT_DEADLOCK_PAUSE: Duration = Duration::from_millis(500);
/// Default per-philosopher join timeout after the stop signal.
pub const DEFAULT_GRACE_PERIOD: Duration = Duration::from_secs(2);

/// Configuration for one simulation run.
#[derive(Debug, Clone)]
pub struct SimConfig {
    pub num_philosophers: usize,
    pub strategy: Strategy,
    /// How long the table lets the philosophers run before signalling
    /// stop.
    pub run_duration: Duration,
    pub think_duration: Duration,
    pub eat_duration: Duration,
    /// Forced pause between pickups, deadlock strategy only.
    pub deadlock_pause: Duration,
    /// How long the table waits for each philosopher after the stop
    /// signal before declaring it blocked. A heuristic bound, not a
    /// wait-for-graph analysis: keep it comfortably above one
    /// think+eat cycle or a slow-but-live philosopher may be
    /// misclassified.
    pub grace_period: Duration,
}

impl SimConfig {
    /// A config with the default timings.
    pub fn new(num_philosophers: usize, strategy: Strategy, run_duration: Duration) -> Self {
        Self {
            num_philosophers,
            strategy,
            run_duration,
            think_duration: DEFAULT_THINK,
            eat_duration: DEFAULT_EAT,
            deadlock_pause: DEFAULT_DEADLOCK_PAUSE,
            grace_period: DEFAULT_GRACE_PERIOD,
        }
    }

    /// Overrides the think/eat intervals. Tests use this to keep runs
    /// short.
    pub fn with_timings(mut self, think: Duration, eat: Duration) -> Self {
        self.think_duration = think;
        self.eat_duration = eat;
        self
    }

    /// Overrides the deadlock-strategy pause.
    pub fn with_deadlock_pause(mut self, pause: Duration) -> Self {
        self.deadlock_pause = pause;
        self
    }

    /// Overrides the grace period. The harness narrows this for the
    /// deadlock strategy, which is expected never to terminate on its
    /// own.
    pub fn with_grace_period(mut self, grace: Duration) -> Self {
        self.grace_period = grace;
        self
    }

    /// Checks the invariants the table relies on. Called by
    /// [`Table::configure`](crate::table::Table::configure) before any
    /// task starts, so a bad configuration never yields a partial run.
    pub fn validate(&self) -> Result<(), SimulationError> {
        if self.num_philosophers < 2 {
            return Err(SimulationError::InvalidConfiguration(format!(
                "need at least 2 philosophers, got {}",
                self.num_philosophers
            )));
        }
        if self.run_duration.is_zero() {
            return Err(SimulationError::InvalidConfiguration(
                "run duration must be positive".into(),
            ));
        }
        Ok(())
    }
}
