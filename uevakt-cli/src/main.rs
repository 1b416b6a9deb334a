//! ## uevakt-cli
//! **Operational frontend for the UE reconciliation core**
//!
//! Runs the reconcile cycle against file-backed inputs and a local volume
//! directory, and exposes the on-demand reachability probe. Intended for
//! development and for debugging a deployed operator from inside the
//! workload pod.

use clap::Parser;
use uevakt_telemetry::logging::EventLogger;
use uevakt_telemetry::metrics::MetricsRecorder;

mod commands;

use commands::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    EventLogger::init();
    let metrics = MetricsRecorder::new();
    let cli = Cli::parse();

    match cli.command {
        Commands::Reconcile(args) => commands::run_reconcile(args, metrics).await,
        Commands::Ping(args) => commands::run_ping(args, metrics).await,
    }
}
