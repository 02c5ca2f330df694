//! Prometheus metrics for the API server.

use std::time::Instant;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::middleware::Next;
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};

/// Install the Prometheus metrics recorder.
/// Returns a handle that can be used to render metrics.
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new().install_recorder()
}

/// Metric names as constants for consistency.
pub mod names {
    // HTTP metrics
    pub const HTTP_REQUESTS_TOTAL: &str = "vsum_http_requests_total";
    pub const HTTP_REQUEST_DURATION_SECONDS: &str = "vsum_http_request_duration_seconds";
    pub const HTTP_REQUESTS_IN_FLIGHT: &str = "vsum_http_requests_in_flight";

    // Upload pipeline metrics
    pub const UPLOADS_STARTED_TOTAL: &str = "vsum_uploads_started_total";
    pub const UPLOADS_SUCCEEDED_TOTAL: &str = "vsum_uploads_succeeded_total";
    pub const UPLOADS_FAILED_TOTAL: &str = "vsum_uploads_failed_total";
    pub const PIPELINE_DURATION_SECONDS: &str = "vsum_pipeline_duration_seconds";
    pub const UPLOAD_BYTES: &str = "vsum_upload_bytes";

    // Rate limiting metrics
    pub const RATE_LIMIT_HITS_TOTAL: &str = "vsum_rate_limit_hits_total";
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

/// Record an upload entering the pipeline.
pub fn record_upload_started() {
    counter!(names::UPLOADS_STARTED_TOTAL).increment(1);
}

/// Record the size of a staged upload.
pub fn record_upload_bytes(bytes: u64) {
    histogram!(names::UPLOAD_BYTES).record(bytes as f64);
}

/// Record a pipeline run that persisted a record.
pub fn record_upload_succeeded(duration_secs: f64) {
    counter!(names::UPLOADS_SUCCEEDED_TOTAL).increment(1);
    histogram!(names::PIPELINE_DURATION_SECONDS, "outcome" => "success").record(duration_secs);
}

/// Record a failed pipeline run.
pub fn record_upload_failed(kind: &'static str, duration_secs: f64) {
    counter!(names::UPLOADS_FAILED_TOTAL, "kind" => kind).increment(1);
    histogram!(names::PIPELINE_DURATION_SECONDS, "outcome" => "failure").record(duration_secs);
}

/// Record rate limit hit.
pub fn record_rate_limit_hit(endpoint: &str) {
    let labels = [("endpoint", endpoint.to_string())];
    counter!(names::RATE_LIMIT_HITS_TOTAL, &labels).increment(1);
}

/// Collapse per-video path segments so label cardinality stays bounded.
fn sanitize_path(path: &str) -> String {
    match path.strip_prefix("/summary/") {
        Some(rest) if !rest.is_empty() => "/summary/:video_id".to_string(),
        _ => path.to_string(),
    }
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
