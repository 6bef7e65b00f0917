//! Prometheus metrics for the API server.

use axum::body::Body;
use axum::http::{Request, Response};
use axum::middleware::Next;
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use std::time::Instant;

use trim_models::SummaryVariant;

/// Initialize the Prometheus metrics recorder.
/// Returns a handle that can be used to render metrics.
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new().install_recorder()
}

/// Metric names as constants for consistency.
pub mod names {
    // HTTP metrics
    pub const HTTP_REQUESTS_TOTAL: &str = "trim_http_requests_total";
    pub const HTTP_REQUEST_DURATION_SECONDS: &str = "trim_http_request_duration_seconds";
    pub const HTTP_REQUESTS_IN_FLIGHT: &str = "trim_http_requests_in_flight";

    // Pipeline metrics
    pub const SUMMARY_RUNS_TOTAL: &str = "trim_summary_runs_total";
    pub const SUMMARY_DURATION_SECONDS: &str = "trim_summary_duration_seconds";
    pub const SEGMENTS_SKIPPED_TOTAL: &str = "trim_segments_skipped_total";
    pub const UPLOAD_BYTES: &str = "trim_upload_bytes";
}

/// Record an HTTP request.
pub fn record_http_request(method: &str, path: &str, status: u16, duration_secs: f64) {
    let labels = [
        ("method", method.to_string()),
        ("path", sanitize_path(path)),
        ("status", status.to_string()),
    ];

    counter!(names::HTTP_REQUESTS_TOTAL, &labels).increment(1);
    histogram!(names::HTTP_REQUEST_DURATION_SECONDS, &labels).record(duration_secs);
}

/// Record a finished summary run. `outcome` is `ok` or an error code.
pub fn record_summary_run(variant: SummaryVariant, outcome: &str, duration_secs: f64) {
    let labels = [
        ("variant", variant.as_str().to_string()),
        ("outcome", outcome.to_string()),
    ];
    counter!(names::SUMMARY_RUNS_TOTAL, &labels).increment(1);
    histogram!(names::SUMMARY_DURATION_SECONDS, &labels).record(duration_secs);
}

/// Record segments dropped from a run after failed extraction.
pub fn record_segments_skipped(variant: SummaryVariant, count: usize) {
    if count == 0 {
        return;
    }
    let labels = [("variant", variant.as_str().to_string())];
    counter!(names::SEGMENTS_SKIPPED_TOTAL, &labels).increment(count as u64);
}

/// Record the size of a saved upload.
pub fn record_upload_bytes(bytes: u64) {
    histogram!(names::UPLOAD_BYTES).record(bytes as f64);
}

/// Collapse unknown variant names so labels stay bounded.
fn sanitize_path(path: &str) -> String {
    let mut parts: Vec<&str> = path.split('/').collect();
    // ["", "api", "summaries", variant, ...]
    if parts.len() > 3 && parts[1] == "api" && parts[2] == "summaries" {
        let known = SummaryVariant::ALL.iter().any(|v| v.as_str() == parts[3]);
        if !known {
            parts[3] = ":variant";
        }
    }
    parts.join("/")
}

/// Metrics middleware for HTTP requests.
pub async fn metrics_middleware(request: Request<Body>, next: Next) -> Response<Body> {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).increment(1.0);

    let response = next.run(request).await;

    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).decrement(1.0);

    let status = response.status().as_u16();
    let duration = start.elapsed().as_secs_f64();

    record_http_request(&method, &path, status, duration);

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_path() {
        assert_eq!(sanitize_path("/api/summaries/scene/file"), "/api/summaries/scene/file");
        assert_eq!(
            sanitize_path("/api/summaries/anything-else/download"),
            "/api/summaries/:variant/download"
        );
        assert_eq!(sanitize_path("/health"), "/health");
    }
}
