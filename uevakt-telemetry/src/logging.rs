//! ## uevakt-telemetry::logging
//! Structured logging with tracing and OpenTelemetry metadata.
//!
//! The operator also forwards workload logs to an external collection
//! endpoint when one is related in; that is an opaque passthrough and only
//! the endpoint coordinate travels through here.

use opentelemetry::KeyValue;
use tracing::{info_span, Instrument};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Clone)]
pub struct EventLogger;

impl EventLogger {
    pub fn init() {
        fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_thread_names(true)
            .with_span_events(FmtSpan::ENTER)
            .init()
    }

    pub async fn log_event(event_type: &str, metadata: Vec<KeyValue>) {
        let span = info_span!(
            "reconcile_event",
            event_type = event_type,
            otel.kind = "INTERNAL"
        );

        async {
            tracing::info!(
                metadata = ?metadata,
                "Reconcile event occurred"
            );
        }
        .instrument(span)
        .await
    }
}
