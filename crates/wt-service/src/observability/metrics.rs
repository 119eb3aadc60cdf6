//! Metrics definitions for the warm transfer service.
//!
//! All metrics follow Prometheus naming conventions:
//! - `wt_` prefix
//! - `_total` suffix for counters
//! - `_seconds` suffix for duration histograms
//!
//! # Cardinality
//!
//! Labels are bounded:
//! - `method`: HTTP methods
//! - `endpoint`: the fixed route table, everything else is `/other`
//! - `status`: success, error (and timeout for HTTP)
//! - `flow`: token, warm_transfer
//! - `error_type`: bounded by `WtError` variants

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::time::Duration;

/// Initialize the Prometheus recorder and return the handle used by `/metrics`.
///
/// Must be called before any metrics are recorded.
///
/// # Errors
///
/// Returns error if the recorder fails to install (e.g., already installed).
pub fn init_metrics_recorder() -> Result<PrometheusHandle, String> {
    PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Prefix("wt_http_request".to_string()),
            &[
                0.005, 0.010, 0.025, 0.050, 0.100, 0.150, 0.200, 0.300, 0.500, 1.000, 2.000, 5.000,
            ],
        )
        .map_err(|e| format!("Failed to set HTTP request buckets: {e}"))?
        // Signing is local HMAC work; sub-millisecond is expected
        .set_buckets_for_metric(
            Matcher::Prefix("wt_token_issuance".to_string()),
            &[0.0001, 0.0005, 0.001, 0.002, 0.005, 0.010, 0.025, 0.050],
        )
        .map_err(|e| format!("Failed to set token issuance buckets: {e}"))?
        .set_buckets_for_metric(
            Matcher::Prefix("wt_summarization".to_string()),
            &[0.25, 0.5, 1.0, 2.0, 3.0, 5.0, 10.0, 20.0, 30.0],
        )
        .map_err(|e| format!("Failed to set summarization buckets: {e}"))?
        .install_recorder()
        .map_err(|e| format!("Failed to install Prometheus recorder: {e}"))
}

// ============================================================================
// HTTP Request Metrics
// ============================================================================

/// Record HTTP request completion.
///
/// Metric: `wt_http_requests_total`, `wt_http_request_duration_seconds`
/// Labels: `method`, `endpoint`, `status_code` / `status`
pub fn record_http_request(method: &str, endpoint: &str, status_code: u16, duration: Duration) {
    let normalized_endpoint = normalize_endpoint(endpoint);
    let status = categorize_status_code(status_code);

    histogram!("wt_http_request_duration_seconds",
        "method" => method.to_string(),
        "endpoint" => normalized_endpoint,
        "status" => status
    )
    .record(duration.as_secs_f64());

    counter!("wt_http_requests_total",
        "method" => method.to_string(),
        "endpoint" => normalized_endpoint,
        "status_code" => status_code.to_string()
    )
    .increment(1);
}

fn categorize_status_code(status_code: u16) -> &'static str {
    match status_code {
        200..=299 => "success",
        408 | 504 => "timeout",
        _ => "error",
    }
}

/// Map a request path onto the fixed route table.
pub fn normalize_endpoint(path: &str) -> &'static str {
    match path {
        "/token" => "/token",
        "/livekit/token" => "/livekit/token",
        "/livekit/warm-transfer" => "/livekit/warm-transfer",
        "/livekit/disconnect" => "/livekit/disconnect",
        "/llm/summarize" => "/llm/summarize",
        "/health" => "/health",
        "/ready" => "/ready",
        "/metrics" => "/metrics",
        _ => "/other",
    }
}

// ============================================================================
// Domain Metrics
// ============================================================================

/// Record a token issuance attempt.
///
/// Metric: `wt_token_issuance_total`, `wt_token_issuance_duration_seconds`
/// Labels: `flow` (token, warm_transfer), `status` (success, error)
pub fn record_token_issuance(flow: &'static str, status: &'static str, duration: Duration) {
    histogram!("wt_token_issuance_duration_seconds",
        "flow" => flow,
        "status" => status
    )
    .record(duration.as_secs_f64());

    counter!("wt_token_issuance_total",
        "flow" => flow,
        "status" => status
    )
    .increment(1);
}

/// Record a warm transfer outcome.
///
/// Metric: `wt_warm_transfers_total`
/// Labels: `status`
pub fn record_warm_transfer(status: &'static str) {
    counter!("wt_warm_transfers_total", "status" => status).increment(1);
}

/// Record a summarization call.
///
/// Metric: `wt_summarization_total`, `wt_summarization_duration_seconds`
/// Labels: `status`
pub fn record_summarization(status: &'static str, duration: Duration) {
    histogram!("wt_summarization_duration_seconds", "status" => status)
        .record(duration.as_secs_f64());

    counter!("wt_summarization_total", "status" => status).increment(1);
}

// ============================================================================
// Error Metrics
// ============================================================================

/// Record an error by category.
///
/// Metric: `wt_errors_total`
/// Labels: `operation`, `error_type`, `status_code`
pub fn record_error(operation: &'static str, error_type: &'static str, status_code: u16) {
    counter!("wt_errors_total",
        "operation" => operation,
        "error_type" => error_type,
        "status_code" => status_code.to_string()
    )
    .increment(1);
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use metrics_util::debugging::{DebugValue, DebuggingRecorder};

    /// Run `f` against a thread-local recorder and return `(name, labels, value)` tuples.
    fn capture<F: FnOnce()>(f: F) -> Vec<(String, Vec<(String, String)>, DebugValue)> {
        let recorder = DebuggingRecorder::new();
        let snapshotter = recorder.snapshotter();
        metrics::with_local_recorder(&recorder, f);

        snapshotter
            .snapshot()
            .into_vec()
            .into_iter()
            .map(|(key, _unit, _desc, value)| {
                let key = key.key();
                let labels = key
                    .labels()
                    .map(|l| (l.key().to_string(), l.value().to_string()))
                    .collect();
                (key.name().to_string(), labels, value)
            })
            .collect()
    }

    fn counter_value(
        captured: &[(String, Vec<(String, String)>, DebugValue)],
        name: &str,
    ) -> Option<u64> {
        captured.iter().find_map(|(n, _, v)| match v {
            DebugValue::Counter(c) if n == name => Some(*c),
            _ => None,
        })
    }

    #[test]
    fn test_normalize_known_endpoints() {
        assert_eq!(normalize_endpoint("/token"), "/token");
        assert_eq!(normalize_endpoint("/livekit/token"), "/livekit/token");
        assert_eq!(
            normalize_endpoint("/livekit/warm-transfer"),
            "/livekit/warm-transfer"
        );
        assert_eq!(normalize_endpoint("/llm/summarize"), "/llm/summarize");
        assert_eq!(normalize_endpoint("/metrics"), "/metrics");
    }

    #[test]
    fn test_normalize_unknown_endpoints() {
        assert_eq!(normalize_endpoint("/"), "/other");
        assert_eq!(normalize_endpoint("/token/extra"), "/other");
        assert_eq!(normalize_endpoint("/livekit/rooms/abc"), "/other");
    }

    #[test]
    fn test_categorize_status_code() {
        assert_eq!(categorize_status_code(200), "success");
        assert_eq!(categorize_status_code(204), "success");
        assert_eq!(categorize_status_code(400), "error");
        assert_eq!(categorize_status_code(500), "error");
        assert_eq!(categorize_status_code(408), "timeout");
        assert_eq!(categorize_status_code(504), "timeout");
    }

    #[test]
    fn test_record_http_request_labels() {
        let captured = capture(|| {
            record_http_request("GET", "/token", 200, Duration::from_millis(3));
        });

        let (_, labels, _) = captured
            .iter()
            .find(|(n, _, _)| n == "wt_http_requests_total")
            .unwrap();
        assert!(labels.contains(&("method".to_string(), "GET".to_string())));
        assert!(labels.contains(&("endpoint".to_string(), "/token".to_string())));
        assert!(labels.contains(&("status_code".to_string(), "200".to_string())));

        assert!(captured
            .iter()
            .any(|(n, _, _)| n == "wt_http_request_duration_seconds"));
    }

    #[test]
    fn test_record_token_issuance() {
        let captured = capture(|| {
            record_token_issuance("token", "success", Duration::from_micros(200));
            record_token_issuance("token", "success", Duration::from_micros(300));
        });

        assert_eq!(counter_value(&captured, "wt_token_issuance_total"), Some(2));
        assert!(captured
            .iter()
            .any(|(n, _, _)| n == "wt_token_issuance_duration_seconds"));
    }

    #[test]
    fn test_record_warm_transfer_and_summarization() {
        let captured = capture(|| {
            record_warm_transfer("success");
            record_summarization("error", Duration::from_secs(1));
        });

        assert_eq!(counter_value(&captured, "wt_warm_transfers_total"), Some(1));
        assert_eq!(counter_value(&captured, "wt_summarization_total"), Some(1));
    }

    #[test]
    fn test_record_error_labels() {
        let captured = capture(|| record_error("summarize", "configuration", 500));

        let (_, labels, value) = captured
            .iter()
            .find(|(n, _, _)| n == "wt_errors_total")
            .unwrap();
        assert!(matches!(value, DebugValue::Counter(1)));
        assert!(labels.contains(&("operation".to_string(), "summarize".to_string())));
        assert!(labels.contains(&("error_type".to_string(), "configuration".to_string())));
        assert!(labels.contains(&("status_code".to_string(), "500".to_string())));
    }
}
