//! Request and response types for the warm transfer API.

use serde::{Deserialize, Serialize};

/// Maximum length of a participant identity (in characters, after trimming).
pub const MAX_IDENTITY_LENGTH: usize = 256;

/// Maximum length of a room name (in characters, after trimming).
pub const MAX_ROOM_NAME_LENGTH: usize = 256;

/// Maximum length of a display name (in characters, after trimming).
pub const MAX_DISPLAY_NAME_LENGTH: usize = 256;

/// Health check response.
///
/// Returned by the `/health` endpoint (liveness probe).
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Readiness check response.
///
/// Returned by the `/ready` endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    /// "ready" or "not_ready".
    pub status: &'static str,

    /// Whether room token signing credentials are configured.
    pub room_service: &'static str,

    /// Whether the model-provider key is configured.
    pub llm: &'static str,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

// ============================================================================
// Token API Models
// ============================================================================

/// Request for a room token.
///
/// Accepted from the query string (`GET`) or a JSON body (`POST`). Both the
/// canonical names (`identity`, `room`) and the names used by browser
/// clients (`participantName`/`participant_name`, `roomName`/`room_name`)
/// are accepted. When several are sent, the first non-blank one in that
/// order wins. Fields are optional at the serde level so that a missing
/// field produces a validation error instead of a deserialization rejection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TokenRequest {
    /// Participant identity.
    #[serde(default)]
    pub identity: Option<String>,

    #[serde(default, rename = "participantName")]
    pub participant_name_camel: Option<String>,

    #[serde(default)]
    pub participant_name: Option<String>,

    /// Room to join.
    #[serde(default)]
    pub room: Option<String>,

    #[serde(default, rename = "roomName")]
    pub room_name_camel: Option<String>,

    #[serde(default)]
    pub room_name: Option<String>,

    /// Optional display name.
    #[serde(default)]
    pub name: Option<String>,
}

impl TokenRequest {
    /// Trimmed identity, if present and non-empty.
    pub fn identity(&self) -> Option<&str> {
        first_present(&[
            &self.identity,
            &self.participant_name_camel,
            &self.participant_name,
        ])
    }

    /// Trimmed room name, if present and non-empty.
    pub fn room(&self) -> Option<&str> {
        first_present(&[&self.room, &self.room_name_camel, &self.room_name])
    }

    /// Trimmed display name, if present and non-empty.
    pub fn display_name(&self) -> Option<&str> {
        trimmed(self.name.as_deref())
    }

    /// Validate the request.
    ///
    /// # Errors
    ///
    /// Returns an error message if validation fails.
    pub fn validate(&self) -> Result<(), &'static str> {
        validate_identity(self.identity())?;
        validate_room(self.room())?;

        if self
            .display_name()
            .is_some_and(|n| n.chars().count() > MAX_DISPLAY_NAME_LENGTH)
        {
            return Err("name must be at most 256 characters");
        }

        Ok(())
    }
}

/// Response carrying a signed room token.
#[derive(Debug, Clone, Serialize)]
pub struct TokenResponse {
    /// Signed room token (JWT).
    pub token: String,

    /// Room-service URL the client should connect to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub livekit_url: Option<String>,
}

// ============================================================================
// Warm Transfer API Models
// ============================================================================

/// Request to start a warm transfer.
#[derive(Debug, Clone, Deserialize)]
pub struct WarmTransferRequest {
    /// Identity of the caller being transferred.
    pub caller_id: String,

    /// Identity of the agent handing off the call.
    pub agent_a_id: String,

    /// Identity of the agent receiving the call.
    pub agent_b_id: String,

    /// Room the caller is currently in.
    pub current_room: String,

    /// Conversation context to hand over (typically a summary).
    pub conversation_context: String,
}

impl WarmTransferRequest {
    /// Validate the request.
    ///
    /// Only the identities that receive tokens must be non-empty.
    ///
    /// # Errors
    ///
    /// Returns an error message if validation fails.
    pub fn validate(&self) -> Result<(), &'static str> {
        if trimmed(Some(&self.caller_id)).is_none() {
            return Err("caller_id is required");
        }
        if trimmed(Some(&self.agent_b_id)).is_none() {
            return Err("agent_b_id is required");
        }
        if self.caller_id.trim().chars().count() > MAX_IDENTITY_LENGTH
            || self.agent_b_id.trim().chars().count() > MAX_IDENTITY_LENGTH
        {
            return Err("identities must be at most 256 characters");
        }
        Ok(())
    }
}

/// Response for a warm transfer.
#[derive(Debug, Clone, Serialize)]
pub struct WarmTransferResponse {
    /// Freshly generated room shared by the caller and the receiving agent.
    pub new_room: String,

    /// Token for the caller in `new_room`.
    pub caller_token: String,

    /// Token for the receiving agent in `new_room`.
    pub agent_b_token: String,

    /// Room-service URL the clients should connect to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub livekit_url: Option<String>,
}

// ============================================================================
// Disconnect API Models
// ============================================================================

/// Request to disconnect a participant from a room.
#[derive(Debug, Clone, Deserialize)]
pub struct DisconnectRequest {
    pub room_name: String,
    pub participant_id: String,
}

impl DisconnectRequest {
    /// Validate the request.
    ///
    /// # Errors
    ///
    /// Returns an error message if validation fails.
    pub fn validate(&self) -> Result<(), &'static str> {
        if trimmed(Some(&self.room_name)).is_none() {
            return Err("room_name is required");
        }
        if trimmed(Some(&self.participant_id)).is_none() {
            return Err("participant_id is required");
        }
        Ok(())
    }
}

/// Confirmation for a disconnect request.
#[derive(Debug, Clone, Serialize)]
pub struct DisconnectResponse {
    pub message: String,
}

// ============================================================================
// Summarization API Models
// ============================================================================

/// Request to summarize a conversation.
#[derive(Debug, Clone, Deserialize)]
pub struct SummaryRequest {
    /// Conversation transcript.
    pub conversation_text: String,

    /// Optional extra context for the model.
    #[serde(default)]
    pub context: String,
}

impl SummaryRequest {
    /// Validate the request.
    ///
    /// # Errors
    ///
    /// Returns an error message if validation fails.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.conversation_text.trim().is_empty() {
            return Err("conversation_text is required");
        }
        Ok(())
    }
}

/// Summary produced by the model provider.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryResponse {
    pub summary: String,
}

fn trimmed(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn first_present<'a>(candidates: &[&'a Option<String>]) -> Option<&'a str> {
    candidates
        .iter()
        .find_map(|candidate| trimmed(candidate.as_deref()))
}

fn validate_identity(identity: Option<&str>) -> Result<(), &'static str> {
    match identity {
        None => Err("identity is required"),
        Some(i) if i.chars().count() > MAX_IDENTITY_LENGTH => {
            Err("identity must be at most 256 characters")
        }
        Some(_) => Ok(()),
    }
}

fn validate_room(room: Option<&str>) -> Result<(), &'static str> {
    match room {
        None => Err("room is required"),
        Some(r) if r.chars().count() > MAX_ROOM_NAME_LENGTH => {
            Err("room must be at most 256 characters")
        }
        Some(_) => Ok(()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_token_request_accepts_snake_case() {
        let req: TokenRequest = serde_json::from_str(
            r#"{"identity": "agent-1", "room_name": "support-42", "name": "Alice"}"#,
        )
        .unwrap();

        assert_eq!(req.identity(), Some("agent-1"));
        assert_eq!(req.room(), Some("support-42"));
        assert_eq!(req.display_name(), Some("Alice"));
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_token_request_accepts_browser_names() {
        let req: TokenRequest =
            serde_json::from_str(r#"{"participantName": "caller-1", "roomName": "lobby"}"#)
                .unwrap();

        assert_eq!(req.identity(), Some("caller-1"));
        assert_eq!(req.room(), Some("lobby"));
        assert_eq!(req.display_name(), None);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_token_request_missing_fields() {
        let req: TokenRequest = serde_json::from_str(r#"{"room": "lobby"}"#).unwrap();
        assert_eq!(req.validate(), Err("identity is required"));

        let req: TokenRequest = serde_json::from_str(r#"{"identity": "a"}"#).unwrap();
        assert_eq!(req.validate(), Err("room is required"));
    }

    #[test]
    fn test_token_request_blank_fields_are_missing() {
        let req = TokenRequest {
            identity: Some("   ".to_string()),
            room: Some("lobby".to_string()),
            name: Some("".to_string()),
            ..Default::default()
        };
        assert_eq!(req.validate(), Err("identity is required"));
        assert_eq!(req.display_name(), None);
    }

    #[test]
    fn test_token_request_length_limits() {
        let req = TokenRequest {
            identity: Some("a".repeat(MAX_IDENTITY_LENGTH + 1)),
            room: Some("lobby".to_string()),
            name: None,
            ..Default::default()
        };
        assert_eq!(
            req.validate(),
            Err("identity must be at most 256 characters")
        );

        let req = TokenRequest {
            identity: Some("agent".to_string()),
            room: Some("r".repeat(MAX_ROOM_NAME_LENGTH + 1)),
            name: None,
            ..Default::default()
        };
        assert_eq!(req.validate(), Err("room must be at most 256 characters"));
    }

    #[test]
    fn test_token_request_canonical_name_wins_over_alias() {
        let req: TokenRequest = serde_json::from_str(
            r#"{"identity": "a", "participantName": "b", "participant_name": "c",
                "room": "r1", "roomName": "r2", "room_name": "r3"}"#,
        )
        .unwrap();
        assert_eq!(req.identity(), Some("a"));
        assert_eq!(req.room(), Some("r1"));

        let req: TokenRequest =
            serde_json::from_str(r#"{"identity": " ", "participantName": "b", "room_name": "r3"}"#)
                .unwrap();
        assert_eq!(req.identity(), Some("b"));
        assert_eq!(req.room(), Some("r3"));
    }

    #[test]
    fn test_length_limits_count_characters() {
        let req = TokenRequest {
            identity: Some("é".repeat(MAX_IDENTITY_LENGTH)),
            room: Some("会".repeat(MAX_ROOM_NAME_LENGTH)),
            name: Some("ü".repeat(MAX_DISPLAY_NAME_LENGTH)),
            ..Default::default()
        };
        assert!(req.validate().is_ok());

        let req = TokenRequest {
            identity: Some("é".repeat(MAX_IDENTITY_LENGTH + 1)),
            room: Some("lobby".to_string()),
            ..Default::default()
        };
        assert_eq!(
            req.validate(),
            Err("identity must be at most 256 characters")
        );
    }

    #[test]
    fn test_token_response_omits_missing_url() {
        let json = serde_json::to_value(TokenResponse {
            token: "t".to_string(),
            livekit_url: None,
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({"token": "t"}));
    }

    #[test]
    fn test_warm_transfer_request_requires_all_fields() {
        let result: Result<WarmTransferRequest, _> = serde_json::from_str(
            r#"{"caller_id": "c", "agent_a_id": "a", "agent_b_id": "b", "current_room": "r"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_warm_transfer_request_validation() {
        let mut req = WarmTransferRequest {
            caller_id: "caller-1".to_string(),
            agent_a_id: "agent-a".to_string(),
            agent_b_id: "agent-b".to_string(),
            current_room: "support-42".to_string(),
            conversation_context: String::new(),
        };
        assert!(req.validate().is_ok());

        req.agent_b_id = " ".to_string();
        assert_eq!(req.validate(), Err("agent_b_id is required"));

        req.agent_b_id = "agent-b".to_string();
        req.caller_id = String::new();
        assert_eq!(req.validate(), Err("caller_id is required"));
    }

    #[test]
    fn test_disconnect_request_validation() {
        let req = DisconnectRequest {
            room_name: "support-42".to_string(),
            participant_id: "".to_string(),
        };
        assert_eq!(req.validate(), Err("participant_id is required"));
    }

    #[test]
    fn test_summary_request_context_defaults_to_empty() {
        let req: SummaryRequest =
            serde_json::from_str(r#"{"conversation_text": "customer asked for a refund"}"#)
                .unwrap();
        assert_eq!(req.context, "");
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_summary_request_rejects_blank_text() {
        let req = SummaryRequest {
            conversation_text: "  \n".to_string(),
            context: String::new(),
        };
        assert_eq!(req.validate(), Err("conversation_text is required"));
    }

    #[test]
    fn test_readiness_response_serialization() {
        let json = serde_json::to_string(&ReadinessResponse {
            status: "ready",
            room_service: "configured",
            llm: "not_configured",
            error: None,
        })
        .unwrap();
        assert!(json.contains("\"status\":\"ready\""));
        assert!(json.contains("\"llm\":\"not_configured\""));
        assert!(!json.contains("\"error\""));
    }
}
