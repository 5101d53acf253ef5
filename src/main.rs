//! CLI entry point for the dining philosophers simulator.
//!
//! ```bash
//! # 5 philosophers, resource hierarchy, 10 seconds
//! cargo run -- hierarchy
//!
//! # Demonstrate the deadlock with a narrowed grace period
//! RUST_LOG=debug cargo run -- deadlock -d 2 --grace 3
//!
//! # Machine-readable result for the batch harness
//! cargo run -- asymmetric -n 16 -d 60 --json
//! ```
//!
//! Exit codes: 0 for a completed run (a detected deadlock is a valid
//! result, not a failure), 2 for an invalid configuration, 1 for any
//! other failure.

use std::time::Duration;

use clap::Parser;
use tracing::error;

use dining_sim::tracing::setup_tracing;
use dining_sim::{SimConfig, SimulationError, Strategy, Table};

#[derive(Debug, Parser)]
#[command(name = "dining-sim", about = "Dining philosophers deadlock demonstrator")]
struct Cli {
    /// Acquisition strategy: deadlock, hierarchy or asymmetric.
    strategy: String,

    /// Number of philosophers (and forks) at the table.
    #[arg(short = 'n', long = "philosophers", default_value_t = 5)]
    philosophers: usize,

    /// Simulation duration in seconds.
    #[arg(short = 'd', long = "duration", default_value_t = 10)]
    duration_secs: u64,

    /// Per-philosopher join timeout in seconds after the stop signal.
    /// The harness narrows this for the deadlock strategy, which never
    /// terminates on its own.
    #[arg(long = "grace")]
    grace_secs: Option<u64>,

    /// Print the run result as JSON on stdout.
    #[arg(long)]
    json: bool,
}

async fn run(cli: Cli) -> Result<(), SimulationError> {
    let strategy: Strategy = cli.strategy.parse()?;

    let mut config = SimConfig::new(
        cli.philosophers,
        strategy,
        Duration::from_secs(cli.duration_secs),
    );
    if let Some(grace) = cli.grace_secs {
        config = config.with_grace_period(Duration::from_secs(grace));
    }

    let table = Table::configure(config)?;
    let result = table.run().await?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    setup_tracing();
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        error!(error = %e, "simulation failed");
        std::process::exit(e.exit_code());
    }
}
