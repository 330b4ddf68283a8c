//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Submissions (per pipeline and outcome)
//! - Job poller (attempts, transient errors, terminal states)
//! - Collaborating services (request latency by service/operation)

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts};

// =============================================================================
// Submissions
// =============================================================================

/// Submissions by pipeline ("ocr", "etl") and outcome.
pub static SUBMISSIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("docflow_submissions_total", "Total document submissions"),
        &["pipeline", "outcome"], // outcome: "success", "failure", "timeout", "cancelled", "rejected"
    )
    .unwrap()
});

/// End-to-end pipeline duration in seconds.
pub static PIPELINE_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "docflow_pipeline_duration_seconds",
            "Duration of a submission from upload to terminal state",
        )
        .buckets(vec![0.5, 1.0, 2.5, 5.0, 10.0, 20.0, 30.0, 45.0, 60.0, 120.0]),
        &["pipeline"],
    )
    .unwrap()
});

// =============================================================================
// Job poller
// =============================================================================

/// Status queries issued by the job poller.
pub static POLL_ATTEMPTS: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new("docflow_poll_attempts_total", "Total job status queries").unwrap()
});

/// Status queries that failed at the transport or parse level.
pub static POLL_TRANSIENT_ERRORS: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "docflow_poll_transient_errors_total",
        "Job status queries that failed and were retried",
    )
    .unwrap()
});

/// Terminal states reached by the poller.
pub static POLL_TERMINAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("docflow_poll_terminal_total", "Terminal poll states"),
        &["state"], // "completed", "failed", "timed_out", "cancelled"
    )
    .unwrap()
});

// =============================================================================
// External services
// =============================================================================

/// Collaborator call latency.
pub static SERVICE_REQUEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "docflow_service_request_duration_seconds",
            "Duration of calls to collaborating services",
        )
        .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
        &["service", "operation", "result"],
    )
    .unwrap()
});

// =============================================================================
// Helper functions
// =============================================================================

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(SUBMISSIONS_TOTAL.clone()),
        Box::new(PIPELINE_DURATION.clone()),
        Box::new(POLL_ATTEMPTS.clone()),
        Box::new(POLL_TRANSIENT_ERRORS.clone()),
        Box::new(POLL_TERMINAL.clone()),
        Box::new(SERVICE_REQUEST_DURATION.clone()),
    ]
}

/// Record a collaborator call.
pub fn observe_service_call(service: &str, operation: &str, ok: bool, seconds: f64) {
    let result = if ok { "ok" } else { "error" };
    SERVICE_REQUEST_DURATION
        .with_label_values(&[service, operation, result])
        .observe(seconds);
}

/// Await a collaborator call and record its latency.
pub async fn time_service_call<T, E, F>(service: &str, operation: &str, call: F) -> Result<T, E>
where
    F: std::future::Future<Output = Result<T, E>>,
{
    let start = std::time::Instant::now();
    let result = call.await;
    observe_service_call(service, operation, result.is_ok(), start.elapsed().as_secs_f64());
    result
}
