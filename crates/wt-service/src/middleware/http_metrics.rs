//! HTTP metrics middleware.
//!
//! Records every response, including the ones produced before a handler
//! runs (404 for unknown paths, 405 for a wrong method, 408 from the timeout
//! layer).

use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;

use crate::observability::metrics::record_http_request;

/// Record method, normalized path, status code, and duration of a request.
///
/// Applied as the outermost layer so nothing escapes it.
pub async fn http_metrics_middleware(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let path = request.uri().path().to_string();

    let response = next.run(request).await;

    record_http_request(&method, &path, response.status().as_u16(), start.elapsed());

    response
}
