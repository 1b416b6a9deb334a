//! # uevakt-engine
//!
//! Reconciliation core for the UE simulator operator: the per-cycle control
//! loop, status derivation, the on-demand diagnostic action, and the
//! event-triggered runtime that serializes cycles.

pub mod engine;

// Re-export the engine types so frontends can simply do:
pub use engine::{
    ConfigSource, CycleOutcome, ExecutionResult, HealthState, HealthStatus, ReconcileError,
    ReconcileEvent, Reconciler, ReconcilerRuntime, RelationPort, CONFIG_FILE_NAME,
    DEFAULT_PING_TARGET,
};
