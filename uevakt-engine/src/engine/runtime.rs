//! Event-triggered runtime: one reconcile cycle per observed change, run
//! strictly serially.
//!
//! External collaborator contract: the platform delivers change events one
//! at a time and guarantees eventual re-delivery of "config changed" /
//! "relation changed" / workload events. That re-delivery is the only retry
//! mechanism; a cycle never loops internally. A cycle is not preemptible —
//! a newer event simply triggers a fresh cycle that re-evaluates from
//! current state.

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tracing::{info, instrument};

use uevakt_telemetry::{EventLogger, MetricsRecorder};

use crate::engine::reconciler::Reconciler;
use crate::engine::status::HealthStatus;

/// Observed input changes that trigger a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileEvent {
    ConfigChanged,
    RelationChanged,
    WorkloadReady,
    UpdateStatus,
}

impl ReconcileEvent {
    fn label(&self) -> &'static str {
        match self {
            ReconcileEvent::ConfigChanged => "config_changed",
            ReconcileEvent::RelationChanged => "relation_changed",
            ReconcileEvent::WorkloadReady => "workload_ready",
            ReconcileEvent::UpdateStatus => "update_status",
        }
    }
}

/// Drives the reconciler from a serialized event stream and publishes one
/// status per cycle.
pub struct ReconcilerRuntime {
    reconciler: Arc<Reconciler>,
    metrics: Arc<MetricsRecorder>,
    status_tx: watch::Sender<HealthStatus>,
    log_endpoint: Option<String>,
}

impl ReconcilerRuntime {
    pub fn new(
        reconciler: Arc<Reconciler>,
        metrics: Arc<MetricsRecorder>,
    ) -> (Self, watch::Receiver<HealthStatus>) {
        let (status_tx, status_rx) =
            watch::channel(HealthStatus::maintenance("Waiting for first reconcile cycle"));
        (
            Self {
                reconciler,
                metrics,
                status_tx,
                log_endpoint: None,
            },
            status_rx,
        )
    }

    /// Coordinates of the external log-collection endpoint, forwarded to the
    /// workload untouched.
    pub fn with_log_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.log_endpoint = Some(endpoint.into());
        self
    }

    pub fn log_endpoint(&self) -> Option<&str> {
        self.log_endpoint.as_deref()
    }

    /// Consume events until the source closes.
    #[instrument(skip(self, events))]
    pub async fn run(self, mut events: mpsc::Receiver<ReconcileEvent>) {
        info!("reconciler runtime started");

        while let Some(event) = events.recv().await {
            EventLogger::log_event(event.label(), vec![]).await;

            let timer = self.metrics.cycle_duration.start_timer();
            let status = self.reconciler.reconcile().await;
            timer.observe_duration();
            self.metrics.inc_reconcile_cycles();

            info!(event = event.label(), status = %status, "reconcile cycle complete");
            let _ = self.status_tx.send(status);
        }

        info!("event source closed, runtime shutting down");
    }
}
