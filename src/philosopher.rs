//! # Philosopher (Actor)
//!
//! Each philosopher is one tokio task cycling through
//! `Thinking → AcquiringFirst → AcquiringSecond → Eating → Releasing`
//! and back, using the [`AcquireProtocol`] chosen at construction.
//!
//! The stop signal is checked only at the top of the cycle. A
//! philosopher already parked inside fork acquisition never sees it;
//! under the deadlock strategy that is exactly how the task becomes a
//! permanently blocked "zombie" the table can observe at join time.
//! Once both forks are held there is no early exit either: eating always
//! completes and both forks are always released, in reverse acquisition
//! order, so the success path cannot leak a fork.
//!
//! The philosopher owns its own counters. The table only gets a
//! [`PhilosopherHandle`] with shared views of the meal count and phase,
//! which stay readable even when the task itself never terminates.

use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, info};

use crate::config::SimConfig;
use crate::fork::Fork;
use crate::strategy::{AcquireProtocol, TableSeat};

/// Where a philosopher currently is in its cycle. Diagnostics only; the
/// authoritative blocked/finished classification is the table's
/// grace-period join.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Thinking,
    AcquiringFirst,
    AcquiringSecond,
    Eating,
    Releasing,
    Stopped,
}

impl Phase {
    fn from_u8(raw: u8) -> Phase {
        match raw {
            0 => Phase::Thinking,
            1 => Phase::AcquiringFirst,
            2 => Phase::AcquiringSecond,
            3 => Phase::Eating,
            4 => Phase::Releasing,
            _ => Phase::Stopped,
        }
    }
}

/// Shared, atomically updated view of a philosopher's [`Phase`].
///
/// Written only by the owning philosopher; read by the table when it
/// reports a philosopher as blocked ("stuck in AcquiringSecond" is far
/// more useful in a log line than "did not join").
#[derive(Debug, Clone, Default)]
pub struct PhaseCell(Arc<AtomicU8>);

impl PhaseCell {
    pub fn set(&self, phase: Phase) {
        self.0.store(phase as u8, Ordering::Release);
    }

    pub fn get(&self) -> Phase {
        Phase::from_u8(self.0.load(Ordering::Acquire))
    }
}

/// A seated philosopher, ready to run. Consumed by [`Philosopher::run`].
pub struct Philosopher {
    id: usize,
    left: Arc<Fork>,
    right: Arc<Fork>,
    protocol: Box<dyn AcquireProtocol>,
    think: Duration,
    eat: Duration,
    running: Arc<AtomicBool>,
    meals: Arc<AtomicU32>,
    phase: PhaseCell,
}

/// The table's view of one philosopher: counters that outlive the task.
#[derive(Debug, Clone)]
pub struct PhilosopherHandle {
    pub id: usize,
    meals: Arc<AtomicU32>,
    phase: PhaseCell,
}

impl PhilosopherHandle {
    pub fn meals(&self) -> u32 {
        self.meals.load(Ordering::Relaxed)
    }

    pub fn phase(&self) -> Phase {
        self.phase.get()
    }
}

impl Philosopher {
    /// Seats philosopher `id` between `left` and `right`, with the
    /// protocol dictated by `config.strategy`. `running` is the shared
    /// stop flag, written once by the table.
    pub fn new(
        id: usize,
        left: Arc<Fork>,
        right: Arc<Fork>,
        config: &SimConfig,
        running: Arc<AtomicBool>,
    ) -> Self {
        Self {
            id,
            left,
            right,
            protocol: config.strategy.protocol(config.deadlock_pause),
            think: config.think_duration,
            eat: config.eat_duration,
            running,
            meals: Arc::new(AtomicU32::new(0)),
            phase: PhaseCell::default(),
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn left_fork(&self) -> usize {
        self.left.id()
    }

    pub fn right_fork(&self) -> usize {
        self.right.id()
    }

    /// Handle the table keeps while the task runs (and after, if the
    /// task never terminates).
    pub fn handle(&self) -> PhilosopherHandle {
        PhilosopherHandle {
            id: self.id,
            meals: self.meals.clone(),
            phase: self.phase.clone(),
        }
    }

    /// The lifecycle loop. Runs until the stop flag is observed at the
    /// top of a cycle, or forever if the philosopher ends up in a
    /// circular wait.
    pub async fn run(self) {
        info!(
            philosopher = self.id,
            protocol = self.protocol.name(),
            left = self.left.id(),
            right = self.right.id(),
            "seated"
        );

        while self.running.load(Ordering::Acquire) {
            self.phase.set(Phase::Thinking);
            debug!(philosopher = self.id, "thinking");
            sleep(self.think).await;

            let seat = TableSeat {
                id: self.id,
                left: self.left.as_ref(),
                right: self.right.as_ref(),
                phase: &self.phase,
            };
            let (first, second) = self.protocol.acquire_both(&seat).await;

            self.phase.set(Phase::Eating);
            debug!(philosopher = self.id, "eating");
            sleep(self.eat).await;
            let meals = self.meals.fetch_add(1, Ordering::Relaxed) + 1;
            debug!(philosopher = self.id, meals, "finished eating");

            self.phase.set(Phase::Releasing);
            // Reverse acquisition order.
            drop(second);
            drop(first);
        }

        self.phase.set(Phase::Stopped);
        info!(
            philosopher = self.id,
            meals = self.meals.load(Ordering::Relaxed),
            "left the table"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::Strategy;

    fn quick_config(strategy: Strategy) -> SimConfig {
        SimConfig::new(2, strategy, Duration::from_millis(100))
            .with_timings(Duration::from_millis(1), Duration::from_millis(1))
    }

    #[tokio::test]
    async fn stops_at_cycle_top_when_flag_is_cleared() {
        let forks = [Arc::new(Fork::new(0)), Arc::new(Fork::new(1))];
        let running = Arc::new(AtomicBool::new(true));
        let philosopher = Philosopher::new(
            0,
            forks[0].clone(),
            forks[1].clone(),
            &quick_config(Strategy::Hierarchy),
            running.clone(),
        );
        let handle = philosopher.handle();

        let task = tokio::spawn(philosopher.run());
        sleep(Duration::from_millis(30)).await;
        running.store(false, Ordering::Release);

        task.await.unwrap();
        assert_eq!(handle.phase(), Phase::Stopped);
        assert!(handle.meals() > 0, "should have eaten at least once");
        // Both forks released on the way out.
        assert_eq!(forks[0].holder(), None);
        assert_eq!(forks[1].holder(), None);
    }

    #[tokio::test]
    async fn never_starts_a_cycle_when_flag_is_already_cleared() {
        let forks = [Arc::new(Fork::new(0)), Arc::new(Fork::new(1))];
        let running = Arc::new(AtomicBool::new(false));
        let philosopher = Philosopher::new(
            0,
            forks[0].clone(),
            forks[1].clone(),
            &quick_config(Strategy::Asymmetric),
            running,
        );
        let handle = philosopher.handle();

        philosopher.run().await;
        assert_eq!(handle.meals(), 0);
        assert_eq!(handle.phase(), Phase::Stopped);
    }
}
