//! # Observability
//!
//! Structured logging for the simulation. Every philosopher event
//! (thinking, fork pickups, eating, putting forks down) is a `tracing`
//! event with structured fields (`philosopher`, `fork`, `meals`,
//! `phase`) rather than formatted prose, so the narration can be
//! filtered per seat.
//!
//! Levels follow the usual split:
//! - `info`: table lifecycle and the run summary
//! - `debug`: per-philosopher narration
//! - `trace`: individual fork acquire/release events
//!
//! ```bash
//! # Run summary only
//! RUST_LOG=info cargo run -- hierarchy
//!
//! # Full think/pickup/eat narration
//! RUST_LOG=debug cargo run -- deadlock -d 2 --grace 3
//! ```

/// Initializes the compact fmt subscriber with `RUST_LOG` filtering.
/// Call once, before the table starts.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false) // structured fields carry the context instead
        .compact()
        .init();
}
