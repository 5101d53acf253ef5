//! # Dining Philosophers Simulator
//!
//! Simulates N concurrent philosophers contending for N forks arranged
//! in a cycle, under three selectable acquisition strategies: one that
//! deliberately deadlocks and two that provably avoid it.
//!
//! ## Architecture Overview
//!
//! - **[`fork`]**: the shared resource: an exclusively lockable fork
//!   with an RAII guard and holder diagnostics.
//! - **[`strategy`]**: pure pickup-order decisions plus the
//!   [`AcquireProtocol`] trait, one implementation per strategy,
//!   selected once at philosopher construction.
//! - **[`philosopher`]**: one tokio task per seat, cycling
//!   think → acquire → eat → release and checking the stop flag only at
//!   the top of each cycle.
//! - **[`table`]**: the orchestrator: builds the ring, runs the
//!   simulation, and detects deadlock by joining each task under a
//!   bounded grace period.
//! - **[`report`]**: the structured [`RunResult`] the batch harness
//!   consumes instead of scraping log output.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), dining_sim::SimulationError> {
//!     let table =
//!         dining_sim::configure(5, dining_sim::Strategy::Hierarchy, Duration::from_secs(2))?;
//!     let result = table.run().await?;
//!     assert!(!result.is_deadlocked());
//!     Ok(())
//! }
//! ```
//!
//! ## Concurrency Model
//!
//! - Each philosopher runs in its own tokio task; forks are
//!   `tokio::sync::Mutex`es, so waiting suspends the task, not a
//!   worker thread.
//! - The stop signal is a single-writer `AtomicBool`; a philosopher
//!   blocked inside fork acquisition never observes it. That blindness
//!   is deliberate: it is what makes a deadlocked ring observable as
//!   tasks that outlive their grace period.
//! - A detected deadlock is a *result* (`deadlock_verdict = yes`),
//!   never an error.

pub mod config;
pub mod error;
pub mod fork;
pub mod philosopher;
pub mod report;
pub mod strategy;
pub mod table;
pub mod tracing;

// Re-export core types for convenience
pub use config::SimConfig;
pub use error::SimulationError;
pub use fork::{Fork, ForkGuard};
pub use philosopher::{Phase, Philosopher, PhilosopherHandle};
pub use report::{DeadlockVerdict, RunResult};
pub use strategy::{AcquireProtocol, Hand, Strategy};
pub use table::Table;

use std::time::Duration;

/// Builds a [`Table`] with the default timings: the one-call entry
/// point for embedders and the test harness.
///
/// Fails with [`SimulationError::InvalidConfiguration`] for fewer than
/// two philosophers or a zero duration.
pub fn configure(
    num_philosophers: usize,
    strategy: Strategy,
    duration: Duration,
) -> Result<Table, SimulationError> {
    Table::configure(SimConfig::new(num_philosophers, strategy, duration))
}
