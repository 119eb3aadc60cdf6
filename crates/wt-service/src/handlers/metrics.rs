//! Prometheus metrics endpoint handler.
//!
//! Unauthenticated for scraping. Labels are bounded and carry no identities
//! or secrets.

use axum::{extract::State, response::IntoResponse};
use metrics_exporter_prometheus::PrometheusHandle;

/// Handler for GET /metrics
///
/// ```text
/// # TYPE wt_http_requests_total counter
/// wt_http_requests_total{method="GET",endpoint="/token",status_code="200"} 42
/// ```
#[tracing::instrument(skip_all, name = "wt.metrics.scrape")]
pub async fn metrics_handler(State(handle): State<PrometheusHandle>) -> impl IntoResponse {
    handle.render()
}
