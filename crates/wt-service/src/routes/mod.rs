//! HTTP routes for the warm transfer service.
//!
//! Defines the Axum router and application state.

use crate::config::{Config, REQUEST_TIMEOUT_SECONDS};
use crate::handlers;
use crate::middleware::http_metrics_middleware;
use crate::services::LlmClientTrait;
use axum::{
    http::HeaderValue,
    middleware,
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

/// Request timeout applied to every route.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(REQUEST_TIMEOUT_SECONDS);

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Service configuration.
    pub config: Config,

    /// Summarizer; `None` when no provider key is configured.
    pub llm_client: Option<Arc<dyn LlmClientTrait>>,
}

/// Build the application routes.
///
/// Creates an Axum router with:
/// - `/token`, `/livekit/token` - Room token (GET query or POST JSON)
/// - `/livekit/warm-transfer` - Start a warm transfer
/// - `/livekit/disconnect` - Acknowledge a participant disconnect
/// - `/llm/summarize` - Conversation summary
/// - `/health` - Liveness probe
/// - `/ready` - Readiness probe (signing credentials configured)
/// - `/metrics` - Prometheus metrics endpoint
/// - CORS per `CORS_ALLOWED_ORIGINS`
/// - TraceLayer for request logging
/// - HTTP metrics middleware
/// - 30 second request timeout
pub fn build_routes(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    let cors = cors_layer(&state.config);

    let api_routes = Router::new()
        .route(
            "/token",
            get(handlers::issue_token_get).post(handlers::issue_token_post),
        )
        .route(
            "/livekit/token",
            get(handlers::issue_token_get).post(handlers::issue_token_post),
        )
        .route("/livekit/warm-transfer", post(handlers::warm_transfer))
        .route(
            "/livekit/disconnect",
            post(handlers::disconnect_participant),
        )
        .route("/llm/summarize", post(handlers::summarize_conversation))
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .with_state(state);

    // Metrics route with its own state
    let metrics_routes = Router::new()
        .route("/metrics", get(handlers::metrics_handler))
        .with_state(metrics_handle);

    // Layer order (bottom-to-top execution):
    // 1. TimeoutLayer - Timeout the request (innermost)
    // 2. TraceLayer - Log request details
    // 3. CorsLayer - Answer preflights, decorate responses
    // 4. http_metrics_middleware - Record ALL responses (outermost)
    api_routes
        .merge(metrics_routes)
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(middleware::from_fn(http_metrics_middleware))
}

/// Build the CORS layer from the configured origins.
///
/// `*` allows any origin without credentials; otherwise only the listed
/// origins are echoed back. Origins that are not valid header values are
/// skipped with a warning.
fn cors_layer(config: &Config) -> CorsLayer {
    if config.allows_any_origin() {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let origins: Vec<HeaderValue> = config
        .cors_allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(target: "wt.routes", origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}
