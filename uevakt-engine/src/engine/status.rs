//! Status derivation: cycle outcomes to the externally visible health state.

use std::fmt;

use uevakt_workload::WorkloadStatus;

use crate::engine::reconciler::CycleOutcome;

/// Externally visible health states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthState {
    Blocked,
    Waiting,
    Maintenance,
    Active,
    Error,
}

impl fmt::Display for HealthState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HealthState::Blocked => "blocked",
            HealthState::Waiting => "waiting",
            HealthState::Maintenance => "maintenance",
            HealthState::Active => "active",
            HealthState::Error => "error",
        };
        f.write_str(name)
    }
}

/// One (state, message) pair, always published whole.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthStatus {
    pub state: HealthState,
    pub message: String,
}

impl HealthStatus {
    pub fn blocked(message: impl Into<String>) -> Self {
        Self {
            state: HealthState::Blocked,
            message: message.into(),
        }
    }

    pub fn waiting(message: impl Into<String>) -> Self {
        Self {
            state: HealthState::Waiting,
            message: message.into(),
        }
    }

    pub fn maintenance(message: impl Into<String>) -> Self {
        Self {
            state: HealthState::Maintenance,
            message: message.into(),
        }
    }

    pub fn active() -> Self {
        Self {
            state: HealthState::Active,
            message: String::new(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            state: HealthState::Error,
            message: message.into(),
        }
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.message.is_empty() {
            write!(f, "{}", self.state)
        } else {
            write!(f, "{}: {}", self.state, self.message)
        }
    }
}

/// Map a cycle outcome to the one status published for that cycle.
pub fn report(outcome: &CycleOutcome) -> HealthStatus {
    match outcome {
        CycleOutcome::Blocked(message) => HealthStatus::blocked(message.clone()),
        CycleOutcome::Waiting(message) => HealthStatus::waiting(message.clone()),
        CycleOutcome::Restarting => HealthStatus::maintenance("Restarting UE service"),
        CycleOutcome::Converged(WorkloadStatus::Running) => HealthStatus::active(),
        CycleOutcome::Converged(WorkloadStatus::Starting) => {
            HealthStatus::maintenance("UE service is starting")
        }
        CycleOutcome::Converged(WorkloadStatus::Errored) => {
            HealthStatus::error("UE service reported an error")
        }
        CycleOutcome::Error(message) => HealthStatus::error(message.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converged_running_is_active_with_empty_message() {
        let status = report(&CycleOutcome::Converged(WorkloadStatus::Running));
        assert_eq!(status, HealthStatus::active());
        assert_eq!(status.to_string(), "active");
    }

    #[test]
    fn restarting_is_maintenance() {
        let status = report(&CycleOutcome::Restarting);
        assert_eq!(status.state, HealthState::Maintenance);
    }

    #[test]
    fn errored_workload_is_error() {
        let status = report(&CycleOutcome::Converged(WorkloadStatus::Errored));
        assert_eq!(status.state, HealthState::Error);
    }

    #[test]
    fn display_includes_the_message() {
        let status = HealthStatus::blocked("Waiting for fiveg_rfsim relation to be created");
        assert_eq!(
            status.to_string(),
            "blocked: Waiting for fiveg_rfsim relation to be created"
        );
    }
}
