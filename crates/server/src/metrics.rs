//! Prometheus metrics for observability.
//!
//! This module provides metrics for monitoring the docflow console:
//! - HTTP request metrics (latency, counts, in flight)
//! - WebSocket connection metrics
//! - Operator state (busy flag, progress)
//! - Core submission, poller and collaborator metrics

use once_cell::sync::Lazy;
use prometheus::{
    self, Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts,
    Registry, TextEncoder,
};

use docflow_core::StatusReporter;

/// Global metrics registry.
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

// =============================================================================
// HTTP Request Metrics
// =============================================================================

/// HTTP request duration in seconds.
pub static HTTP_REQUEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "docflow_http_request_duration_seconds",
            "HTTP request duration in seconds",
        )
        .buckets(vec![
            0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0,
        ]),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests total count.
pub static HTTP_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("docflow_http_requests_total", "Total HTTP requests"),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests currently in flight.
pub static HTTP_REQUESTS_IN_FLIGHT: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "docflow_http_requests_in_flight",
        "Number of HTTP requests currently being processed",
    )
    .unwrap()
});

// =============================================================================
// WebSocket Metrics
// =============================================================================

/// Active WebSocket connections.
pub static WS_CONNECTIONS_ACTIVE: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "docflow_ws_connections_active",
        "Number of active WebSocket connections",
    )
    .unwrap()
});

/// Total WebSocket connections (cumulative).
pub static WS_CONNECTIONS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "docflow_ws_connections_total",
        "Total WebSocket connections since startup",
    )
    .unwrap()
});

/// WebSocket messages sent by type.
pub static WS_MESSAGES_SENT: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("docflow_ws_messages_sent_total", "WebSocket messages sent"),
        &["type"],
    )
    .unwrap()
});

// =============================================================================
// Operator State (collected dynamically)
// =============================================================================

/// Whether a submission is in flight (1) or not (0).
pub static SUBMISSION_BUSY: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "docflow_submission_busy",
        "Whether a submission is in flight (1) or idle (0)",
    )
    .unwrap()
});

/// Progress of the in-flight submission.
pub static SUBMISSION_PROGRESS: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "docflow_submission_progress_percent",
        "Progress of the in-flight submission",
    )
    .unwrap()
});

// =============================================================================
// Registration
// =============================================================================

fn register_metrics(registry: &Registry) {
    // HTTP
    registry
        .register(Box::new(HTTP_REQUEST_DURATION.clone()))
        .unwrap();
    registry
        .register(Box::new(HTTP_REQUESTS_TOTAL.clone()))
        .unwrap();
    registry
        .register(Box::new(HTTP_REQUESTS_IN_FLIGHT.clone()))
        .unwrap();

    // WebSocket
    registry
        .register(Box::new(WS_CONNECTIONS_ACTIVE.clone()))
        .unwrap();
    registry
        .register(Box::new(WS_CONNECTIONS_TOTAL.clone()))
        .unwrap();
    registry
        .register(Box::new(WS_MESSAGES_SENT.clone()))
        .unwrap();

    // Operator state
    registry
        .register(Box::new(SUBMISSION_BUSY.clone()))
        .unwrap();
    registry
        .register(Box::new(SUBMISSION_PROGRESS.clone()))
        .unwrap();

    // Core metrics (submissions, poller, collaborators)
    for metric in docflow_core::metrics::all_metrics() {
        registry.register(metric).unwrap();
    }
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!("Failed to encode metrics: {}", e);
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}

/// Update gauges from the current operator state.
pub fn collect_dynamic_metrics(reporter: &StatusReporter) {
    let state = reporter.snapshot();
    SUBMISSION_BUSY.set(i64::from(state.busy));
    SUBMISSION_PROGRESS.set(i64::from(state.progress_percent));
}

/// Normalize a path for metric labels (replace job ids with placeholders).
pub fn normalize_path(path: &str) -> String {
    path.split('/')
        .map(|segment| {
            if looks_like_id(segment) {
                "{id}"
            } else {
                segment
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}

fn looks_like_id(segment: &str) -> bool {
    if segment.is_empty() {
        return false;
    }
    let is_numeric = segment.chars().all(|c| c.is_ascii_digit());
    let is_uuid = segment.len() == 36
        && segment
            .chars()
            .all(|c| c.is_ascii_hexdigit() || c == '-')
        && segment.matches('-').count() == 4;
    is_numeric || is_uuid
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path_uuid() {
        let path = "/api/v1/jobs/550e8400-e29b-41d4-a716-446655440000";
        assert_eq!(normalize_path(path), "/api/v1/jobs/{id}");
    }

    #[test]
    fn test_normalize_path_numeric() {
        assert_eq!(normalize_path("/api/v1/jobs/42"), "/api/v1/jobs/{id}");
        assert_eq!(normalize_path("/api/v1/jobs/42/result"), "/api/v1/jobs/{id}/result");
    }

    #[test]
    fn test_normalize_path_static() {
        assert_eq!(normalize_path("/api/v1/submissions"), "/api/v1/submissions");
        assert_eq!(normalize_path("/api/v1/v2"), "/api/v1/v2");
        assert_eq!(normalize_path("/"), "/");
    }

    #[test]
    fn test_encode_metrics_includes_core() {
        docflow_core::metrics::POLL_ATTEMPTS.inc();
        HTTP_REQUESTS_IN_FLIGHT.set(0);
        let text = encode_metrics();
        assert!(text.contains("docflow_poll_attempts_total"));
        assert!(text.contains("docflow_http_requests_in_flight"));
    }

    #[test]
    fn test_collect_dynamic_metrics() {
        let reporter = StatusReporter::new();
        let guard = reporter.begin("Uploading file...").unwrap();
        guard.set_progress(40);
        collect_dynamic_metrics(&reporter);
        assert_eq!(SUBMISSION_BUSY.get(), 1);
        assert_eq!(SUBMISSION_PROGRESS.get(), 40);
        drop(guard);
        collect_dynamic_metrics(&reporter);
        assert_eq!(SUBMISSION_BUSY.get(), 0);
    }
}
