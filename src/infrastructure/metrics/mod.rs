//! Prometheus Metrics Module
//!
//! Provides application-wide metrics collection using Prometheus.
//!
//! # Metrics Collected
//! - HTTP request counts by method, path, and status
//! - HTTP request latency histograms
//! - Wash job lifecycle events (registered, completed, deleted)
//! - Revenue booked by completed wash jobs

use once_cell::sync::Lazy;
use prometheus::{
    Counter, Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder,
};

/// Global metrics registry
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

/// HTTP request counter - tracks total requests by method, path, and status code
pub static HTTP_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("http_requests_total", "Total number of HTTP requests").namespace("carwash"),
        &["method", "path", "status"],
    )
    .expect("Failed to create HTTP_REQUESTS_TOTAL metric")
});

/// HTTP request latency histogram - tracks request duration in seconds
pub static HTTP_REQUEST_DURATION_SECONDS: Lazy<HistogramVec> = Lazy::new(|| {
    let buckets = vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0];
    HistogramVec::new(
        HistogramOpts::new(
            "http_request_duration_seconds",
            "HTTP request latency in seconds",
        )
        .namespace("carwash")
        .buckets(buckets),
        &["method", "path"],
    )
    .expect("Failed to create HTTP_REQUEST_DURATION_SECONDS metric")
});

/// Wash job events
pub static WASH_JOBS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("wash_jobs_total", "Wash job lifecycle events").namespace("carwash"),
        &["event"], // "registered", "completed", "deleted"
    )
    .expect("Failed to create WASH_JOBS_TOTAL metric")
});

/// Sum of amounts charged on completion
pub static REVENUE_TOTAL: Lazy<Counter> = Lazy::new(|| {
    Counter::with_opts(
        Opts::new("revenue_total", "Amount charged by completed wash jobs").namespace("carwash"),
    )
    .expect("Failed to create REVENUE_TOTAL metric")
});

/// Register all metrics with the registry
fn register_metrics(registry: &Registry) {
    registry
        .register(Box::new(HTTP_REQUESTS_TOTAL.clone()))
        .expect("Failed to register HTTP_REQUESTS_TOTAL");
    registry
        .register(Box::new(HTTP_REQUEST_DURATION_SECONDS.clone()))
        .expect("Failed to register HTTP_REQUEST_DURATION_SECONDS");
    registry
        .register(Box::new(WASH_JOBS_TOTAL.clone()))
        .expect("Failed to register WASH_JOBS_TOTAL");
    registry
        .register(Box::new(REVENUE_TOTAL.clone()))
        .expect("Failed to register REVENUE_TOTAL");
}

/// Collect and encode all metrics as Prometheus text format
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!(error = %e, "Failed to encode metrics");
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}

/// Helper to record HTTP request metrics
pub fn record_http_request(method: &str, path: &str, status: u16, duration_secs: f64) {
    let status = status.to_string();
    HTTP_REQUESTS_TOTAL
        .with_label_values(&[method, path, status.as_str()])
        .inc();
    HTTP_REQUEST_DURATION_SECONDS
        .with_label_values(&[method, path])
        .observe(duration_secs);
}

/// Helper to record a wash job lifecycle event
pub fn record_wash_job_event(event: &str) {
    WASH_JOBS_TOTAL.with_label_values(&[event]).inc();
}

/// Helper to book the amount charged for a completed job
pub fn record_revenue(amount: f64) {
    if amount > 0.0 {
        REVENUE_TOTAL.inc_by(amount);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_registration() {
        // Force lazy initialization
        let _ = &*REGISTRY;
        let _ = &*HTTP_REQUESTS_TOTAL;
        let _ = &*HTTP_REQUEST_DURATION_SECONDS;
        let _ = &*WASH_JOBS_TOTAL;
        let _ = &*REVENUE_TOTAL;
    }

    #[test]
    fn test_record_http_request() {
        record_http_request("GET", "/health", 200, 0.001);
        let metrics = gather_metrics();
        assert!(metrics.contains("carwash_http_requests_total"));
    }

    #[test]
    fn test_record_wash_job_event() {
        record_wash_job_event("completed");
        record_revenue(45.5);
        let metrics = gather_metrics();
        assert!(metrics.contains("carwash_wash_jobs_total"));
        assert!(metrics.contains("carwash_revenue_total"));
    }

    #[test]
    fn test_negative_revenue_is_ignored() {
        let before = REVENUE_TOTAL.get();
        record_revenue(-10.0);
        assert!(REVENUE_TOTAL.get() >= before);
    }
}
