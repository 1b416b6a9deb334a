//! ## uevakt-telemetry::metrics
//! Prometheus counters and histograms for the reconcile loop.

use prometheus::{Counter, Histogram, HistogramOpts, Registry};

#[derive(Debug, Clone)]
pub struct MetricsRecorder {
    pub registry: prometheus::Registry,
    pub reconcile_cycles: prometheus::Counter,
    pub workload_restarts: prometheus::Counter,
    pub cycle_duration: prometheus::Histogram,
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsRecorder {
    pub fn new() -> Self {
        let registry = Registry::new();
        let reconcile_cycles =
            Counter::new("uevakt_reconcile_cycles_total", "Total reconcile cycles run").unwrap();
        let workload_restarts = Counter::new(
            "uevakt_workload_restarts_total",
            "Total restart signals sent to the UE workload",
        )
        .unwrap();

        let cycle_duration = Histogram::with_opts(
            HistogramOpts::new(
                "uevakt_cycle_duration_seconds",
                "Wall-clock duration of one reconcile cycle",
            )
            .buckets(vec![0.001, 0.01, 0.1, 1.0, 10.0]),
        )
        .unwrap();

        registry
            .register(Box::new(reconcile_cycles.clone()))
            .unwrap();
        registry
            .register(Box::new(workload_restarts.clone()))
            .unwrap();
        registry.register(Box::new(cycle_duration.clone())).unwrap();

        Self {
            registry,
            reconcile_cycles,
            workload_restarts,
            cycle_duration,
        }
    }

    pub fn gather_metrics(&self) -> Result<String, prometheus::Error> {
        use prometheus::Encoder;
        let encoder = prometheus::TextEncoder::new();
        let mut buffer = Vec::<u8>::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8(buffer).unwrap())
    }

    pub fn inc_reconcile_cycles(&self) {
        self.reconcile_cycles.inc();
    }

    pub fn inc_workload_restarts(&self) {
        self.workload_restarts.inc();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_advance_and_are_gatherable() {
        let metrics = MetricsRecorder::new();
        metrics.inc_reconcile_cycles();
        metrics.inc_reconcile_cycles();
        metrics.inc_workload_restarts();

        let rendered = metrics.gather_metrics().unwrap();
        assert!(rendered.contains("uevakt_reconcile_cycles_total 2"));
        assert!(rendered.contains("uevakt_workload_restarts_total 1"));
    }
}
