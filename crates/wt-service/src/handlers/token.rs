//! Room token handlers.
//!
//! Served at `/token` and `/livekit/token`, by query string (`GET`) or JSON
//! body (`POST`). Request fields are validated before the signing
//! credentials are checked.

use crate::errors::WtError;
use crate::handlers::parse_json_body;
use crate::models::{TokenRequest, TokenResponse};
use crate::observability::hash_for_correlation;
use crate::observability::metrics::{record_error, record_token_issuance};
use crate::routes::AppState;
use crate::services::{ParticipantGrant, TokenIssuer};
use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::instrument;

/// Handler for GET /token and GET /livekit/token
///
/// ## Query Parameters
///
/// - `identity` (or `participantName` / `participant_name`)
/// - `room` (or `roomName` / `room_name`)
/// - `name` (optional display name)
#[instrument(skip_all, name = "wt.token.get")]
pub async fn issue_token_get(
    State(state): State<Arc<AppState>>,
    query: Result<Query<TokenRequest>, QueryRejection>,
) -> Result<Json<TokenResponse>, WtError> {
    let result = query
        .map_err(|e| WtError::Validation(format!("Invalid query string: {e}")))
        .and_then(|Query(request)| issue(&state, &request));

    finish(result)
}

/// Handler for POST /token and POST /livekit/token
///
/// ## Request Body
///
/// ```json
/// {"identity": "agent-1", "room": "support-42", "name": "Alice"}
/// ```
#[instrument(skip_all, name = "wt.token.post")]
pub async fn issue_token_post(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<TokenResponse>, WtError> {
    let result =
        parse_json_body::<TokenRequest>(&body).and_then(|request| issue(&state, &request));

    finish(result)
}

fn issue(state: &AppState, request: &TokenRequest) -> Result<Json<TokenResponse>, WtError> {
    request
        .validate()
        .map_err(|msg| WtError::Validation(msg.to_string()))?;

    let (Some(identity), Some(room)) = (request.identity(), request.room()) else {
        return Err(WtError::Validation(
            "identity and room are required".to_string(),
        ));
    };

    let issuer = TokenIssuer::from_config(&state.config)?;

    let start = Instant::now();
    let grant = ParticipantGrant::new(identity, room).with_display_name(request.display_name());
    let issued = issuer.issue(&grant);
    let status = if issued.is_ok() { "success" } else { "error" };
    record_token_issuance("token", status, start.elapsed());
    let issued = issued?;

    tracing::info!(
        target: "wt.handlers.token",
        identity_hash = %hash_for_correlation(identity),
        room_hash = %hash_for_correlation(room),
        expires_at = issued.expires_at,
        "Room token issued"
    );

    Ok(Json(TokenResponse {
        token: issued.token,
        livekit_url: state.config.livekit_url.clone(),
    }))
}

fn finish(result: Result<Json<TokenResponse>, WtError>) -> Result<Json<TokenResponse>, WtError> {
    if let Err(e) = &result {
        record_error("issue_token", e.error_type(), e.status_code());
    }
    result
}
