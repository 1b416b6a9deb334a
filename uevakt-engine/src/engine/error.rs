use thiserror::Error;

use uevakt_config::ConfigError;
use uevakt_relation::RfsimDecodeError;
use uevakt_workload::{SupervisorError, VolumeError};

/// Any failure a reconcile cycle can hit.
///
/// Nothing here crosses the cycle boundary uncaught: every variant is mapped
/// to exactly one `HealthStatus` before the cycle ends, and clears on a later
/// cycle once the underlying condition clears.
#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Relation(#[from] RfsimDecodeError),

    #[error(transparent)]
    Storage(#[from] VolumeError),

    #[error(transparent)]
    Workload(#[from] SupervisorError),
}
