//! # Run Results
//!
//! The structured record a run produces. The batch harness used to
//! scrape the human-readable log for totals and the word "DEADLOCK";
//! [`RunResult`] replaces that with a serializable record it can consume
//! directly, while [`RunResult::log_summary`] keeps the readable
//! summary as a side channel.

use std::time::Duration;

use serde::{Serialize, Serializer};
use tracing::info;

use crate::philosopher::PhilosopherHandle;
use crate::strategy::Strategy;

/// Post-run deadlock classification.
///
/// `Unknown` is reserved for runs aborted before any philosopher
/// reached a terminal classification (e.g. a panicked task); a
/// completed [`Table::run`](crate::table::Table::run) always answers
/// `Yes` or `No`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeadlockVerdict {
    Yes,
    No,
    Unknown,
}

impl DeadlockVerdict {
    /// The verdict implied by the set of blocked philosophers: any
    /// philosopher still alive past its grace period means deadlock.
    pub fn from_blocked(blocked: &[usize]) -> Self {
        if blocked.is_empty() {
            DeadlockVerdict::No
        } else {
            DeadlockVerdict::Yes
        }
    }
}

/// Final statistics of one simulation run. Immutable once produced.
#[derive(Debug, Clone, Serialize)]
pub struct RunResult {
    pub strategy: Strategy,
    pub num_philosophers: usize,
    #[serde(serialize_with = "duration_secs")]
    pub requested_duration: Duration,
    #[serde(serialize_with = "duration_secs")]
    pub elapsed_duration: Duration,
    /// Meals per philosopher, index-aligned with seat ids.
    pub per_philosopher_meals: Vec<u32>,
    /// Seat ids still blocked at grace-period expiry, ascending.
    pub blocked_philosophers: Vec<usize>,
    pub deadlock_verdict: DeadlockVerdict,
}

impl RunResult {
    /// Builds the record from the final philosopher states. `blocked`
    /// holds the seats whose tasks outlived their grace period.
    pub(crate) fn from_run(
        strategy: Strategy,
        requested_duration: Duration,
        elapsed_duration: Duration,
        handles: &[PhilosopherHandle],
        blocked: Vec<usize>,
    ) -> Self {
        Self {
            strategy,
            num_philosophers: handles.len(),
            requested_duration,
            elapsed_duration,
            per_philosopher_meals: handles.iter().map(PhilosopherHandle::meals).collect(),
            deadlock_verdict: DeadlockVerdict::from_blocked(&blocked),
            blocked_philosophers: blocked,
        }
    }

    pub fn total_meals(&self) -> u32 {
        self.per_philosopher_meals.iter().sum()
    }

    pub fn min_meals(&self) -> Option<u32> {
        self.per_philosopher_meals.iter().copied().min()
    }

    pub fn max_meals(&self) -> Option<u32> {
        self.per_philosopher_meals.iter().copied().max()
    }

    pub fn is_deadlocked(&self) -> bool {
        self.deadlock_verdict == DeadlockVerdict::Yes
    }

    /// Human-readable summary, info level. Observability only; nothing
    /// downstream should parse these lines.
    pub fn log_summary(&self) {
        info!(
            strategy = %self.strategy,
            num_philosophers = self.num_philosophers,
            elapsed = ?self.elapsed_duration,
            "simulation finished"
        );
        for (id, meals) in self.per_philosopher_meals.iter().enumerate() {
            let blocked = self.blocked_philosophers.contains(&id);
            info!(philosopher = id, meals, blocked, "final state");
        }
        info!(
            total_meals = self.total_meals(),
            blocked = self.blocked_philosophers.len(),
            verdict = ?self.deadlock_verdict,
            "verdict"
        );
    }
}

fn duration_secs<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(duration.as_secs_f64())
}
