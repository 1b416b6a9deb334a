//! On-demand diagnostic action: a reachability probe run inside the
//! workload.

use tracing::{info, instrument};

use uevakt_workload::WorkloadStatus;

use crate::engine::reconciler::Reconciler;

/// Probe destination used when the operator does not name one.
pub const DEFAULT_PING_TARGET: &str = "8.8.8.8";

/// Tunnel interface the UE session traffic leaves through.
const UE_TUN_INTERFACE: &str = "oaitun_ue1";

const PING_COUNT: &str = "10";

/// Raw result of one probe execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    pub success: bool,
    pub output: String,
    pub error_reason: Option<String>,
}

impl ExecutionResult {
    fn failed(reason: impl Into<String>) -> Self {
        Self {
            success: false,
            output: String::new(),
            error_reason: Some(reason.into()),
        }
    }
}

impl Reconciler {
    /// Run the reachability probe against `target` inside the workload.
    ///
    /// The workload must be up: a probe invoked while the UE is not running
    /// fails immediately, without executing anything. The probe's output is
    /// surfaced verbatim; an exit code of zero means at least one reply was
    /// received and nothing beyond that is interpreted here.
    #[instrument(skip(self))]
    pub async fn run_ping(&self, target: &str) -> ExecutionResult {
        let supervisor = self.supervisor();

        if !supervisor.is_ready().await {
            return ExecutionResult::failed("Container is not ready");
        }
        match supervisor.current_status().await {
            Ok(WorkloadStatus::Running) => {}
            Ok(_) => return ExecutionResult::failed("UE service is not ready"),
            Err(e) => return ExecutionResult::failed(e.to_string()),
        }

        let command = ["ping", "-I", UE_TUN_INTERFACE, target, "-c", PING_COUNT];
        match supervisor.exec(&command).await {
            Ok(output) => {
                info!(exit_code = output.exit_code, "ping probe finished");
                let error_reason = (!output.success()).then(|| {
                    let detail = if output.stderr.is_empty() {
                        &output.stdout
                    } else {
                        &output.stderr
                    };
                    format!("Ping failed: {}", detail)
                });
                ExecutionResult {
                    success: output.success(),
                    output: output.stdout,
                    error_reason,
                }
            }
            Err(e) => ExecutionResult::failed(e.to_string()),
        }
    }
}
