//! Vendor call metrics.

use metrics::{counter, histogram};

/// Metric name constants for consistency.
pub mod names {
    /// Total vendor requests by operation and outcome.
    pub const REQUESTS_TOTAL: &str = "vsum_indexer_requests_total";

    /// Request latency in seconds by operation.
    pub const LATENCY_SECONDS: &str = "vsum_indexer_latency_seconds";
}

/// Record metrics for a completed vendor request.
pub fn record_request(operation: &'static str, outcome: &'static str, latency_secs: f64) {
    counter!(
        names::REQUESTS_TOTAL,
        "operation" => operation,
        "outcome" => outcome
    )
    .increment(1);

    histogram!(
        names::LATENCY_SECONDS,
        "operation" => operation
    )
    .record(latency_secs);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_names() {
        assert!(names::REQUESTS_TOTAL.contains("requests"));
        assert!(names::LATENCY_SECONDS.contains("latency"));
    }
}
