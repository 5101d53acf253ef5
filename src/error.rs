//! # Simulation Errors
//!
//! This module defines the error types shared by the library and the CLI
//! binary. By centralizing error definitions, we ensure a single mapping
//! from failure modes to process exit codes.
//!
//! Note that a detected deadlock is **not** an error: it is the expected
//! outcome of the `deadlock` strategy and is reported as data in
//! [`RunResult`](crate::report::RunResult).

/// Errors that can abort a simulation run.
#[derive(Debug, thiserror::Error)]
pub enum SimulationError {
    /// Rejected before any philosopher task starts: unknown strategy
    /// name, fewer than two philosophers, or a zero run duration.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A philosopher task panicked mid-run. tokio mutexes do not poison,
    /// so this is the closest analogue of a corrupted lock: the run's
    /// statistics can no longer be trusted and the run is abandoned.
    #[error("philosopher {id} panicked during the run")]
    PhilosopherPanicked { id: usize },

    /// The final result record could not be serialized for `--json`.
    #[error("failed to encode run result: {0}")]
    ReportEncoding(#[from] serde_json::Error),
}

impl SimulationError {
    /// Process exit code for this error.
    ///
    /// `InvalidConfiguration` gets a distinct code so the batch harness
    /// can tell "bad invocation" apart from "run failed", and both
    /// apart from a successful run that happened to detect deadlock
    /// (which exits 0).
    pub fn exit_code(&self) -> i32 {
        match self {
            SimulationError::InvalidConfiguration(_) => 2,
            _ => 1,
        }
    }
}
