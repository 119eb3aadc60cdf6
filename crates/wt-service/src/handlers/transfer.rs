//! Warm transfer and disconnect handlers.

use crate::errors::WtError;
use crate::handlers::parse_json_body;
use crate::models::{
    DisconnectRequest, DisconnectResponse, WarmTransferRequest, WarmTransferResponse,
};
use crate::observability::hash_for_correlation;
use crate::observability::metrics::{record_error, record_token_issuance, record_warm_transfer};
use crate::routes::AppState;
use crate::services::{plan_warm_transfer, TokenIssuer, TransferParties};
use axum::{body::Bytes, extract::State, Json};
use std::sync::Arc;
use std::time::Instant;
use tracing::instrument;

/// Handler for POST /livekit/warm-transfer
///
/// Creates a new room and returns tokens for the caller and the receiving
/// agent. The conversation context is accepted for the receiving agent's
/// client; it is not stored.
///
/// ## Response
///
/// ```json
/// {
///   "new_room": "transfer-5b0c...",
///   "caller_token": "eyJ...",
///   "agent_b_token": "eyJ...",
///   "livekit_url": "wss://example.livekit.cloud"
/// }
/// ```
#[instrument(skip_all, name = "wt.transfer.start")]
pub async fn warm_transfer(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<WarmTransferResponse>, WtError> {
    let result = parse_json_body::<WarmTransferRequest>(&body)
        .and_then(|request| start_transfer(&state, &request));

    match &result {
        Ok(_) => record_warm_transfer("success"),
        Err(e) => {
            record_warm_transfer("error");
            record_error("warm_transfer", e.error_type(), e.status_code());
        }
    }

    result
}

fn start_transfer(
    state: &AppState,
    request: &WarmTransferRequest,
) -> Result<Json<WarmTransferResponse>, WtError> {
    request
        .validate()
        .map_err(|msg| WtError::Validation(msg.to_string()))?;

    let issuer = TokenIssuer::from_config(&state.config)?;

    let parties = TransferParties {
        caller_id: request.caller_id.trim(),
        agent_a_id: request.agent_a_id.trim(),
        agent_b_id: request.agent_b_id.trim(),
        current_room: request.current_room.trim(),
    };

    let start = Instant::now();
    let plan = plan_warm_transfer(&issuer, &parties);
    let status = if plan.is_ok() { "success" } else { "error" };
    record_token_issuance("warm_transfer", status, start.elapsed());
    let plan = plan?;

    tracing::info!(
        target: "wt.handlers.transfer",
        caller_hash = %hash_for_correlation(parties.caller_id),
        agent_a_hash = %hash_for_correlation(parties.agent_a_id),
        agent_b_hash = %hash_for_correlation(parties.agent_b_id),
        from_room_hash = %hash_for_correlation(parties.current_room),
        new_room_hash = %hash_for_correlation(&plan.new_room),
        context_len = request.conversation_context.len(),
        "Warm transfer initiated"
    );

    Ok(Json(WarmTransferResponse {
        new_room: plan.new_room,
        caller_token: plan.caller_token,
        agent_b_token: plan.agent_b_token,
        livekit_url: state.config.livekit_url.clone(),
    }))
}

/// Handler for POST /livekit/disconnect
///
/// Acknowledges the request without contacting the room service. Removing a
/// participant requires the provider's server-side `RemoveParticipant` call,
/// which this service does not make; clients leave the room themselves.
#[instrument(skip_all, name = "wt.transfer.disconnect")]
pub async fn disconnect_participant(body: Bytes) -> Result<Json<DisconnectResponse>, WtError> {
    let request = parse_json_body::<DisconnectRequest>(&body)
        .and_then(|request| {
            request
                .validate()
                .map_err(|msg| WtError::Validation(msg.to_string()))?;
            Ok(request)
        })
        .inspect_err(|e| record_error("disconnect", e.error_type(), e.status_code()))?;

    tracing::info!(
        target: "wt.handlers.transfer",
        participant_hash = %hash_for_correlation(request.participant_id.trim()),
        room_hash = %hash_for_correlation(request.room_name.trim()),
        "Disconnect acknowledged"
    );

    Ok(Json(DisconnectResponse {
        message: format!(
            "Participant {} disconnected from room {}",
            request.participant_id.trim(),
            request.room_name.trim()
        ),
    }))
}
