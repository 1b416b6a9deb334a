//! Workload supervisor seam.
//!
//! The platform collaborator that actually owns the UE container implements
//! this trait; the reconciler only ever talks through it.

use async_trait::async_trait;
use thiserror::Error;

/// Coarse workload process state as reported by the supervisor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkloadStatus {
    Starting,
    Running,
    Errored,
}

/// Output of a command executed inside the workload container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl ExecOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

#[derive(Debug, Error)]
pub enum SupervisorError {
    #[error("supervisor is unreachable: {0}")]
    Unreachable(String),
    #[error("failed to restart workload: {0}")]
    Restart(String),
    #[error("failed to execute command in workload: {0}")]
    Exec(String),
}

/// Interface to the workload supervisor.
///
/// `is_ready` answers whether the container side-channel accepts commands at
/// all (the equivalent of "can connect"); `current_status` reports the UE
/// process itself.
#[async_trait]
pub trait Supervisor: Send + Sync {
    async fn is_ready(&self) -> bool;

    async fn restart(&self) -> Result<(), SupervisorError>;

    async fn current_status(&self) -> Result<WorkloadStatus, SupervisorError>;

    /// Run a command inside the workload container and wait for it.
    async fn exec(&self, command: &[&str]) -> Result<ExecOutput, SupervisorError>;
}
