use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use bytes::Bytes;
use clap::{Args, Parser, Subcommand};
use tokio::sync::mpsc;
use tracing::{info, warn};

use uevakt_config::UeConfig;
use uevakt_engine::{
    ConfigSource, ReconcileEvent, Reconciler, ReconcilerRuntime, RelationPort, DEFAULT_PING_TARGET,
};
use uevakt_relation::RelationState;
use uevakt_telemetry::MetricsRecorder;
use uevakt_workload::{ExecOutput, FsVolume, Supervisor, SupervisorError, WorkloadStatus};

#[derive(Parser)]
#[command(version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run one reconcile cycle against file-backed inputs and a local volume
    Reconcile(ReconcileArgs),
    /// Run the reachability probe against the workload
    Ping(PingArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ReconcileArgs {
    /// Operator config YAML; falls back to `config/ue.yaml` plus environment
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Remote application databag as JSON. Present file means the relation
    /// is joined, a missing file means declared-but-unjoined, and omitting
    /// the flag means the integration is not part of this deployment.
    #[arg(short, long)]
    pub databag: Option<PathBuf>,
    /// Mount path of the config volume
    #[arg(short, long, default_value = "/tmp/conf")]
    pub volume: PathBuf,
}

#[derive(Args, Debug, Clone)]
pub struct PingArgs {
    /// Probe destination
    #[arg(short, long, default_value = DEFAULT_PING_TARGET)]
    pub target: String,
}

struct FileConfigSource {
    path: Option<PathBuf>,
}

impl ConfigSource for FileConfigSource {
    fn current(&self) -> Result<UeConfig, uevakt_config::ConfigError> {
        match &self.path {
            Some(path) => UeConfig::load_from_path(path),
            None => UeConfig::load(),
        }
    }
}

struct FileRelation {
    databag: Option<PathBuf>,
}

impl RelationPort for FileRelation {
    fn state(&self) -> RelationState {
        match &self.databag {
            None => RelationState::NotDeclared,
            Some(path) if path.exists() => match std::fs::read(path) {
                Ok(raw) => RelationState::Joined(Bytes::from(raw)),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "databag unreadable");
                    RelationState::NotJoined
                }
            },
            Some(_) => RelationState::NotJoined,
        }
    }
}

/// Local stand-in for the platform supervisor: reports a running workload,
/// logs restart signals, and executes probe commands on the spot.
struct LocalSupervisor;

#[async_trait]
impl Supervisor for LocalSupervisor {
    async fn is_ready(&self) -> bool {
        true
    }

    async fn restart(&self) -> Result<(), SupervisorError> {
        info!("restart signal (local run, nothing to restart)");
        Ok(())
    }

    async fn current_status(&self) -> Result<WorkloadStatus, SupervisorError> {
        Ok(WorkloadStatus::Running)
    }

    async fn exec(&self, command: &[&str]) -> Result<ExecOutput, SupervisorError> {
        let output = tokio::process::Command::new(command[0])
            .args(&command[1..])
            .output()
            .await
            .map_err(|e| SupervisorError::Exec(e.to_string()))?;

        Ok(ExecOutput {
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

fn build_reconciler(
    config: Option<PathBuf>,
    databag: Option<PathBuf>,
    volume: PathBuf,
    metrics: Arc<MetricsRecorder>,
) -> Reconciler {
    Reconciler::new(
        Arc::new(FileConfigSource { path: config }),
        Arc::new(FileRelation { databag }),
        Arc::new(FsVolume::new(volume)),
        Arc::new(LocalSupervisor),
        metrics,
    )
}

pub async fn run_reconcile(args: ReconcileArgs, metrics: MetricsRecorder) -> anyhow::Result<()> {
    let metrics = Arc::new(metrics);
    let reconciler = Arc::new(build_reconciler(
        args.config,
        args.databag,
        args.volume,
        metrics.clone(),
    ));

    let (runtime, status_rx) = ReconcilerRuntime::new(reconciler, metrics);
    let (tx, rx) = mpsc::channel(1);
    tx.send(ReconcileEvent::ConfigChanged)
        .await
        .context("queueing the reconcile trigger")?;
    drop(tx);
    runtime.run(rx).await;

    println!("{}", *status_rx.borrow());
    Ok(())
}

pub async fn run_ping(args: PingArgs, metrics: MetricsRecorder) -> anyhow::Result<()> {
    let reconciler = build_reconciler(
        None,
        None,
        std::env::temp_dir(),
        Arc::new(metrics),
    );

    let result = reconciler.run_ping(&args.target).await;
    if result.success {
        println!("{}", result.output);
        Ok(())
    } else {
        anyhow::bail!(
            "{}",
            result
                .error_reason
                .unwrap_or_else(|| "probe failed".to_string())
        )
    }
}
