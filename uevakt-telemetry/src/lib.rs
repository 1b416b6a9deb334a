//! # UE Operator Telemetry
//!
//! Crate for logging and metrics of the reconciliation core.

pub mod logging;
pub mod metrics;

pub use logging::EventLogger;
pub use metrics::MetricsRecorder;
