//! # UE Workload Collaborators
//!
//! Trait seams toward the two external collaborators the reconciler
//! converges: the workload supervisor (process lifecycle, in-container
//! command execution) and the mounted config volume (single config file,
//! atomic replace semantics).

pub mod supervisor;
pub mod volume;

pub use supervisor::{ExecOutput, Supervisor, SupervisorError, WorkloadStatus};
pub use volume::{ConfigVolume, FsVolume, VolumeError};
