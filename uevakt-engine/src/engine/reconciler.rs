//! The reconcile cycle: observe inputs, compute desired state, converge the
//! workload, derive status.
//!
//! A cycle is a pure function of the collaborator snapshot it reads at entry.
//! Nothing is cached across cycles; the on-disk config hash is read back
//! every time, so the loop stays correct across restarts of the operator
//! itself. Retries happen only through external re-triggering: the platform
//! guarantees re-delivery of config-changed / relation-changed / workload
//! events, and the next cycle re-evaluates from current state.

use std::sync::Arc;

use tracing::{info, instrument, warn};

use uevakt_config::UeConfig;
use uevakt_relation::{RelationState, RfsimCodec, RfsimData};
use uevakt_render::{content_hash, render};
use uevakt_telemetry::MetricsRecorder;
use uevakt_workload::{ConfigVolume, Supervisor, WorkloadStatus};

use crate::engine::error::ReconcileError;
use crate::engine::status::{self, HealthStatus};

/// Name of the workload's config file on the mounted volume.
pub const CONFIG_FILE_NAME: &str = "ue.conf";

/// Source of the operator-set static options.
pub trait ConfigSource: Send + Sync {
    /// Current snapshot of the options, not yet validated.
    fn current(&self) -> Result<UeConfig, uevakt_config::ConfigError>;
}

/// Observable state of the `fiveg_rfsim` integration.
pub trait RelationPort: Send + Sync {
    fn state(&self) -> RelationState;
}

/// Outcome of a single reconcile cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// User-fixable problem; will not clear without operator action.
    Blocked(String),
    /// Transient precondition not met yet; clears on a later cycle.
    Waiting(String),
    /// Config was (or is being) applied and the workload is coming up.
    Restarting,
    /// Nothing to do; the workload status is attached.
    Converged(WorkloadStatus),
    /// Cycle-scoped failure, retried via the next externally triggered cycle.
    Error(String),
}

impl From<ReconcileError> for CycleOutcome {
    fn from(err: ReconcileError) -> Self {
        match err {
            ReconcileError::Config(e) => CycleOutcome::Blocked(e.status_message()),
            ReconcileError::Relation(e) if e.is_fatal() => CycleOutcome::Blocked(
                "Can't establish communication over the `fiveg_rfsim` interface \
                 due to version mismatch!"
                    .into(),
            ),
            ReconcileError::Relation(_) => {
                CycleOutcome::Waiting("Waiting for RFSIM information".into())
            }
            ReconcileError::Storage(e) => CycleOutcome::Error(e.to_string()),
            ReconcileError::Workload(e) => CycleOutcome::Error(e.to_string()),
        }
    }
}

/// Converges the UE workload toward the configuration derived from the
/// current static options and relation data.
pub struct Reconciler {
    config: Arc<dyn ConfigSource>,
    relation: Arc<dyn RelationPort>,
    volume: Arc<dyn ConfigVolume>,
    supervisor: Arc<dyn Supervisor>,
    metrics: Arc<MetricsRecorder>,
}

impl Reconciler {
    pub fn new(
        config: Arc<dyn ConfigSource>,
        relation: Arc<dyn RelationPort>,
        volume: Arc<dyn ConfigVolume>,
        supervisor: Arc<dyn Supervisor>,
        metrics: Arc<MetricsRecorder>,
    ) -> Self {
        Self {
            config,
            relation,
            volume,
            supervisor,
            metrics,
        }
    }

    pub(crate) fn supervisor(&self) -> &dyn Supervisor {
        self.supervisor.as_ref()
    }

    /// Run one cycle and derive the status to publish for it.
    #[instrument(skip(self))]
    pub async fn reconcile(&self) -> HealthStatus {
        let outcome = match self.run_cycle().await {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(error = %err, "reconcile cycle failed");
                CycleOutcome::from(err)
            }
        };
        status::report(&outcome)
    }

    async fn run_cycle(&self) -> Result<CycleOutcome, ReconcileError> {
        // 1. Static config gates everything; an invalid option blocks the
        // cycle before any side effect.
        let config = self.config.current()?.validated()?;

        // 2. Platform readiness.
        if !self.supervisor.is_ready().await {
            return Ok(CycleOutcome::Waiting(
                "Waiting for container to be ready".into(),
            ));
        }
        if !self.volume.is_mounted() {
            return Ok(CycleOutcome::Waiting(
                "Waiting for storage to be attached".into(),
            ));
        }

        // 3. Relation data. A declared-but-unjoined integration blocks: the
        // RF simulator endpoint will not appear without operator action. An
        // integration absent from the deployment proceeds on the legacy
        // slice options.
        let rfsim: Option<RfsimData> = match self.relation.state() {
            RelationState::NotDeclared => None,
            RelationState::NotJoined => {
                return Ok(CycleOutcome::Blocked(
                    "Waiting for fiveg_rfsim relation to be created".into(),
                ))
            }
            RelationState::Joined(raw) => Some(RfsimCodec::decode(&raw)?),
        };

        // 4. Desired state.
        let rendered = render(&config, rfsim.as_ref());

        // 5. Read back what the workload currently sees. An absent file
        // counts as different.
        let on_disk = self.volume.read(CONFIG_FILE_NAME)?;
        let converged = on_disk
            .as_deref()
            .map(|bytes| content_hash(bytes) == rendered.hash)
            .unwrap_or(false);

        if converged {
            // 7. Unchanged inputs must not perturb a running workload.
            let workload = self.supervisor.current_status().await?;
            return Ok(CycleOutcome::Converged(workload));
        }

        // A reconfiguration while the workload is mid-(re)start is deferred
        // to the next cycle rather than interrupted.
        if on_disk.is_some()
            && self.supervisor.current_status().await? == WorkloadStatus::Starting
        {
            return Ok(CycleOutcome::Restarting);
        }

        // 6. Converge: atomic replace, then one restart signal.
        self.volume.write_atomic(CONFIG_FILE_NAME, &rendered.bytes)?;
        info!(hash = %rendered.hash, "config file written");

        self.supervisor.restart().await?;
        self.metrics.inc_workload_restarts();
        info!("restart signaled to UE service");

        Ok(CycleOutcome::Restarting)
    }
}
