//! Warm transfer planning.
//!
//! A warm transfer moves a caller from the room they share with the first
//! agent into a brand-new room with the receiving agent. Planning mints the
//! new room name and one token per participant of that room; actually moving
//! the media is done by the clients.

use crate::errors::WtError;
use crate::observability::hash_for_correlation;
use crate::services::token_issuer::{ParticipantGrant, TokenIssuer};
use tracing::instrument;
use uuid::Uuid;

/// Prefix of every room created for a transfer.
pub const TRANSFER_ROOM_PREFIX: &str = "transfer-";

/// Participants of a transfer.
#[derive(Debug, Clone)]
pub struct TransferParties<'a> {
    pub caller_id: &'a str,
    pub agent_a_id: &'a str,
    pub agent_b_id: &'a str,
    pub current_room: &'a str,
}

/// Outcome of planning a transfer.
#[derive(Debug, Clone)]
pub struct TransferPlan {
    pub new_room: String,
    pub caller_token: String,
    pub agent_b_token: String,
}

/// Generate a fresh transfer room name (`transfer-<uuid v4>`).
pub fn generate_transfer_room_name() -> String {
    format!("{TRANSFER_ROOM_PREFIX}{}", Uuid::new_v4())
}

/// Plan a warm transfer.
///
/// The handing-off agent does not receive a token; they stay in the
/// original room.
///
/// # Errors
///
/// Propagates validation and signing errors from the issuer.
#[instrument(skip_all, name = "wt.transfer.plan")]
pub fn plan_warm_transfer(
    issuer: &TokenIssuer,
    parties: &TransferParties<'_>,
) -> Result<TransferPlan, WtError> {
    let new_room = generate_transfer_room_name();

    let caller = issuer.issue(&ParticipantGrant::new(parties.caller_id, new_room.as_str()))?;
    let agent_b = issuer.issue(&ParticipantGrant::new(parties.agent_b_id, new_room.as_str()))?;

    tracing::debug!(
        target: "wt.services.warm_transfer",
        from_room_hash = %hash_for_correlation(parties.current_room),
        new_room_hash = %hash_for_correlation(&new_room),
        "Warm transfer planned"
    );

    Ok(TransferPlan {
        new_room,
        caller_token: caller.token,
        agent_b_token: agent_b.token,
    })
}
