//! Prometheus metrics for the verification gateway.
//!
//! The [`GateMetrics`] struct owns a dedicated [`Registry`] that the
//! `/metrics` endpoint encodes into the Prometheus text exposition format.

use prometheus::{
    register_histogram_with_registry, register_int_counter_with_registry, Histogram,
    HistogramOpts, IntCounter, Opts, Registry,
};

/// Central collection of gateway metrics.
pub struct GateMetrics {
    /// The Prometheus registry that owns every metric below.
    pub registry: Registry,

    /// Total HTTP requests received, before auth.
    pub http_requests: IntCounter,
    /// Verification requests that reached the orchestrator.
    pub verify_attempts: IntCounter,
    /// Verifications that confirmed the action and marked it on-chain.
    pub verify_confirmed: IntCounter,
    /// Structured rejections (not linked, not performed, already verified).
    pub verify_rejected: IntCounter,
    /// Unexpected upstream/chain errors surfaced as HTTP 500.
    pub verify_errors: IntCounter,
    /// Twitter linkages established via the proof-tweet flow.
    pub linkages_created: IntCounter,

    /// End-to-end verification latency, in milliseconds.
    pub verify_latency_ms: Histogram,
}

impl GateMetrics {
    /// Create a fresh set of metrics registered under a new [`Registry`].
    pub fn new() -> Self {
        let registry = Registry::new();

        let http_requests = register_int_counter_with_registry!(
            Opts::new("taskgate_http_requests_total", "Total HTTP requests received"),
            registry
        )
        .expect("metric registration");
        let verify_attempts = register_int_counter_with_registry!(
            Opts::new(
                "taskgate_verify_attempts_total",
                "Verification requests dispatched to the orchestrator"
            ),
            registry
        )
        .expect("metric registration");
        let verify_confirmed = register_int_counter_with_registry!(
            Opts::new(
                "taskgate_verify_confirmed_total",
                "Verifications confirmed and marked on-chain"
            ),
            registry
        )
        .expect("metric registration");
        let verify_rejected = register_int_counter_with_registry!(
            Opts::new(
                "taskgate_verify_rejected_total",
                "Verification requests rejected with a structured failure"
            ),
            registry
        )
        .expect("metric registration");
        let verify_errors = register_int_counter_with_registry!(
            Opts::new(
                "taskgate_verify_errors_total",
                "Verification requests that failed with an unexpected error"
            ),
            registry
        )
        .expect("metric registration");
        let linkages_created = register_int_counter_with_registry!(
            Opts::new(
                "taskgate_linkages_created_total",
                "Twitter linkages established via proof tweet"
            ),
            registry
        )
        .expect("metric registration");

        let verify_latency_ms = register_histogram_with_registry!(
            HistogramOpts::new(
                "taskgate_verify_latency_ms",
                "End-to-end verification latency in milliseconds"
            )
            .buckets(vec![
                50.0, 100.0, 250.0, 500.0, 1000.0, 2500.0, 5000.0, 10000.0, 30000.0
            ]),
            registry
        )
        .expect("metric registration");

        Self {
            registry,
            http_requests,
            verify_attempts,
            verify_confirmed,
            verify_rejected,
            verify_errors,
            linkages_created,
            verify_latency_ms,
        }
    }
}

impl Default for GateMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metrics_register_and_count() {
        let metrics = GateMetrics::new();
        metrics.verify_attempts.inc();
        metrics.verify_confirmed.inc();
        assert_eq!(metrics.verify_attempts.get(), 1);
        assert_eq!(metrics.verify_confirmed.get(), 1);
        assert!(!metrics.registry.gather().is_empty());
    }

    #[test]
    fn two_instances_do_not_collide() {
        // Each instance owns its registry, so tests can create many.
        let a = GateMetrics::new();
        let b = GateMetrics::new();
        a.http_requests.inc();
        assert_eq!(b.http_requests.get(), 0);
    }
}
