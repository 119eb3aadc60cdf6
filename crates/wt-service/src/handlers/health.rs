//! Liveness and readiness handlers.

use crate::models::{HealthResponse, ReadinessResponse};
use crate::routes::AppState;
use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;
use tracing::instrument;

/// Liveness probe.
///
/// Always answers `{"status": "healthy"}` while the process is serving.
#[instrument(skip_all, name = "wt.health.check")]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse { status: "healthy" })
}

/// Readiness probe.
///
/// Ready when room token signing credentials are configured; the model
/// provider key is reported but does not affect readiness, since token
/// issuance is the primary function.
///
/// ## Example Response
///
/// ```json
/// {
///   "status": "ready",
///   "room_service": "configured",
///   "llm": "not_configured"
/// }
/// ```
#[instrument(skip_all, name = "wt.health.ready")]
pub async fn readiness_check(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<ReadinessResponse>) {
    let signing_ready = state.config.has_signing_credentials();
    let llm = if state.llm_client.is_some() {
        "configured"
    } else {
        "not_configured"
    };

    if signing_ready {
        (
            StatusCode::OK,
            Json(ReadinessResponse {
                status: "ready",
                room_service: "configured",
                llm,
                error: None,
            }),
        )
    } else {
        tracing::warn!(target: "wt.health", "Readiness check failed: signing credentials missing");
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ReadinessResponse {
                status: "not_ready",
                room_service: "not_configured",
                llm,
                error: Some("Room token signing credentials are not configured".to_string()),
            }),
        )
    }
}
