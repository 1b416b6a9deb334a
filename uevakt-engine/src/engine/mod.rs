mod actions;
mod error;
mod reconciler;
mod runtime;
mod status;

#[cfg(test)]
pub(crate) mod testing;

pub use self::{
    actions::{ExecutionResult, DEFAULT_PING_TARGET},
    error::ReconcileError,
    reconciler::{ConfigSource, CycleOutcome, Reconciler, RelationPort, CONFIG_FILE_NAME},
    runtime::{ReconcileEvent, ReconcilerRuntime},
    status::{HealthState, HealthStatus},
};

pub mod prelude {
    pub use super::{
        ConfigSource, CycleOutcome, ExecutionResult, HealthState, HealthStatus, ReconcileError,
        ReconcileEvent, Reconciler, ReconcilerRuntime, RelationPort,
    };
}
