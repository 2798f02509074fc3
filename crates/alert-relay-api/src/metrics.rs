//! Metrics collection for the relay service.
//!
//! Metrics live in a registry owned by [`RelayMetrics`] rather than the
//! process-global one, so several instances (one per test, for example) can
//! coexist without registration conflicts.

use alert_relay_core::PayloadLayout;
use axum::http::StatusCode;
use prometheus::{Histogram, HistogramOpts, IntCounterVec, Opts, Registry, TextEncoder};
use std::sync::Arc;
use std::time::Duration;

/// Service metrics for observability
#[derive(Debug)]
pub struct RelayMetrics {
    registry: Registry,

    /// Inbound relay requests by layout and outcome
    pub relay_requests_total: IntCounterVec,

    /// Outbound forwards by outcome
    pub forwards_total: IntCounterVec,

    /// Outbound forward latency
    pub forward_duration_seconds: Histogram,
}

impl RelayMetrics {
    pub fn new() -> Result<Arc<Self>, prometheus::Error> {
        let registry = Registry::new();

        let relay_requests_total = IntCounterVec::new(
            Opts::new("relay_requests_total", "Total relay requests received"),
            &["layout", "outcome"],
        )?;
        let forwards_total = IntCounterVec::new(
            Opts::new("relay_forwards_total", "Total alerts forwarded to destinations"),
            &["outcome"],
        )?;
        let forward_duration_seconds = Histogram::with_opts(
            HistogramOpts::new(
                "relay_forward_duration_seconds",
                "Time spent forwarding a single alert",
            )
            .buckets(vec![0.01, 0.05, 0.1, 0.5, 1.0, 2.0, 5.0, 10.0]),
        )?;

        registry.register(Box::new(relay_requests_total.clone()))?;
        registry.register(Box::new(forwards_total.clone()))?;
        registry.register(Box::new(forward_duration_seconds.clone()))?;

        Ok(Arc::new(Self {
            registry,
            relay_requests_total,
            forwards_total,
            forward_duration_seconds,
        }))
    }

    /// Count one relay request by the status it was answered with.
    pub fn record_request(&self, layout: PayloadLayout, status: StatusCode) {
        self.relay_requests_total
            .with_label_values(&[layout.as_str(), outcome_label(status)])
            .inc();
    }

    /// Count one forward and observe its duration.
    pub fn record_forward(&self, success: bool, elapsed: Duration) {
        let outcome = if success { "success" } else { "failure" };
        self.forwards_total.with_label_values(&[outcome]).inc();
        self.forward_duration_seconds
            .observe(elapsed.as_secs_f64());
    }

    /// Encode every metric in the Prometheus text format.
    pub fn encode(&self) -> Result<String, prometheus::Error> {
        TextEncoder::new().encode_to_string(&self.registry.gather())
    }
}

fn outcome_label(status: StatusCode) -> &'static str {
    if status.is_success() {
        "ok"
    } else if status.is_client_error() {
        "client_error"
    } else {
        "server_error"
    }
}

#[cfg(test)]
#[path = "metrics_tests.rs"]
mod tests;
