//! Room token issuance.
//!
//! Builds room claims for a participant and signs them with the room-service
//! API secret. The issuer is constructed from configuration per request so a
//! missing key or secret surfaces as a configuration error before any token
//! is minted.

use crate::config::Config;
use crate::crypto;
use crate::errors::WtError;
use crate::models::{MAX_IDENTITY_LENGTH, MAX_ROOM_NAME_LENGTH};
use crate::observability::hash_for_correlation;
use common::jwt::{RoomClaims, VideoGrant};
use common::secret::SecretString;
use tracing::instrument;

/// Message returned when signing credentials are missing.
pub const MISSING_CREDENTIALS_MESSAGE: &str =
    "LIVEKIT_API_KEY and LIVEKIT_API_SECRET must be set in environment variables";

/// Media permissions carried in the room grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoomPermissions {
    pub can_publish: bool,
    pub can_subscribe: bool,
    pub can_publish_data: bool,
}

impl Default for RoomPermissions {
    /// Callers and agents both publish, subscribe, and exchange data.
    fn default() -> Self {
        Self {
            can_publish: true,
            can_subscribe: true,
            can_publish_data: true,
        }
    }
}

/// Everything needed to issue one room token.
#[derive(Debug, Clone)]
pub struct ParticipantGrant {
    identity: String,
    room: String,
    display_name: Option<String>,
    ttl_seconds: Option<u64>,
    permissions: RoomPermissions,
}

impl ParticipantGrant {
    /// Grant for `identity` to join `room` with default permissions.
    pub fn new(identity: impl Into<String>, room: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            room: room.into(),
            display_name: None,
            ttl_seconds: None,
            permissions: RoomPermissions::default(),
        }
    }

    /// Display name shown to other participants.
    pub fn with_display_name(mut self, name: Option<impl Into<String>>) -> Self {
        self.display_name = name.map(Into::into);
        self
    }

    /// Override the configured token lifetime.
    pub fn with_ttl_seconds(mut self, ttl_seconds: u64) -> Self {
        self.ttl_seconds = Some(ttl_seconds);
        self
    }

    pub fn with_permissions(mut self, permissions: RoomPermissions) -> Self {
        self.permissions = permissions;
        self
    }
}

/// A signed room token and its expiry.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    /// Unix timestamp (seconds) at which the token stops being accepted.
    pub expires_at: i64,
}

/// Signs room tokens with the configured API key and secret.
pub struct TokenIssuer {
    api_key: String,
    api_secret: SecretString,
    default_ttl_seconds: u64,
}

impl TokenIssuer {
    /// Build an issuer from configuration.
    ///
    /// # Errors
    ///
    /// Returns `WtError::Configuration` if the API key or secret is missing.
    pub fn from_config(config: &Config) -> Result<Self, WtError> {
        if !config.has_signing_credentials() {
            return Err(WtError::Configuration(
                MISSING_CREDENTIALS_MESSAGE.to_string(),
            ));
        }

        let (Some(api_key), Some(api_secret)) = (
            config.livekit_api_key.clone(),
            config.livekit_api_secret.clone(),
        ) else {
            return Err(WtError::Configuration(
                MISSING_CREDENTIALS_MESSAGE.to_string(),
            ));
        };

        Ok(Self {
            api_key,
            api_secret,
            default_ttl_seconds: config.token_ttl_seconds,
        })
    }

    /// Issue a signed token for a participant.
    ///
    /// `nbf` is the issuance time and `exp` is `nbf + ttl`.
    ///
    /// # Errors
    ///
    /// - `WtError::Validation` if identity or room is blank or too long, or the TTL is zero
    /// - `WtError::Crypto` if signing fails
    #[instrument(skip_all, name = "wt.token.issue")]
    pub fn issue(&self, grant: &ParticipantGrant) -> Result<IssuedToken, WtError> {
        let identity = grant.identity.trim();
        let room = grant.room.trim();

        if identity.is_empty() {
            return Err(WtError::Validation("identity is required".to_string()));
        }
        if room.is_empty() {
            return Err(WtError::Validation("room is required".to_string()));
        }
        if identity.chars().count() > MAX_IDENTITY_LENGTH {
            return Err(WtError::Validation(
                "identity must be at most 256 characters".to_string(),
            ));
        }
        if room.chars().count() > MAX_ROOM_NAME_LENGTH {
            return Err(WtError::Validation(
                "room must be at most 256 characters".to_string(),
            ));
        }

        let ttl_seconds = grant.ttl_seconds.unwrap_or(self.default_ttl_seconds);
        if ttl_seconds == 0 {
            return Err(WtError::Validation(
                "ttl_seconds must be greater than 0".to_string(),
            ));
        }
        let ttl = i64::try_from(ttl_seconds)
            .map_err(|_| WtError::Validation("ttl_seconds is too large".to_string()))?;

        let now = chrono::Utc::now().timestamp();
        let claims = RoomClaims {
            sub: identity.to_string(),
            iss: self.api_key.clone(),
            nbf: now,
            exp: now.saturating_add(ttl),
            name: grant
                .display_name
                .as_deref()
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .map(ToString::to_string),
            video: VideoGrant {
                room_join: true,
                room: room.to_string(),
                can_publish: grant.permissions.can_publish,
                can_subscribe: grant.permissions.can_subscribe,
                can_publish_data: grant.permissions.can_publish_data,
            },
        };

        let token = crypto::sign_room_token(&claims, &self.api_secret)?;

        tracing::debug!(
            target: "wt.services.token_issuer",
            room_hash = %hash_for_correlation(room),
            ttl_seconds = ttl_seconds,
            "Room token issued"
        );

        Ok(IssuedToken {
            token,
            expires_at: claims.exp,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::crypto::verify_room_token;
    use common::jwt::decode_claims_unverified;
    use std::collections::HashMap;

    fn config(with_creds: bool) -> Config {
        let mut vars = HashMap::new();
        if with_creds {
            vars.insert("LIVEKIT_API_KEY".to_string(), "APItest".to_string());
            vars.insert("LIVEKIT_API_SECRET".to_string(), "s3cr3t".to_string());
        }
        Config::from_vars(&vars).unwrap()
    }

    #[test]
    fn test_from_config_requires_credentials() {
        let err = TokenIssuer::from_config(&config(false)).err().unwrap();
        match err {
            WtError::Configuration(msg) => assert_eq!(msg, MISSING_CREDENTIALS_MESSAGE),
            other => panic!("expected configuration error, got {other:?}"),
        }
    }

    #[test]
    fn test_from_config_requires_both_halves() {
        let mut vars = HashMap::new();
        vars.insert("LIVEKIT_API_KEY".to_string(), "APItest".to_string());
        let config = Config::from_vars(&vars).unwrap();
        assert!(matches!(
            TokenIssuer::from_config(&config),
            Err(WtError::Configuration(_))
        ));
    }

    #[test]
    fn test_issue_produces_verifiable_token() {
        let issuer = TokenIssuer::from_config(&config(true)).unwrap();
        let issued = issuer
            .issue(&ParticipantGrant::new("agent-1", "support-42"))
            .unwrap();

        let claims =
            verify_room_token(&issued.token, "APItest", &SecretString::from("s3cr3t")).unwrap();
        assert_eq!(claims.sub, "agent-1");
        assert_eq!(claims.iss, "APItest");
        assert!(claims.video.room_join);
        assert_eq!(claims.video.room, "support-42");
        assert!(claims.video.can_publish);
        assert!(claims.video.can_subscribe);
        assert!(claims.video.can_publish_data);
        assert_eq!(claims.exp, issued.expires_at);
    }

    #[test]
    fn test_issue_uses_configured_ttl() {
        let issuer = TokenIssuer::from_config(&config(true)).unwrap();
        let issued = issuer
            .issue(&ParticipantGrant::new("agent-1", "support-42"))
            .unwrap();

        let claims = decode_claims_unverified(&issued.token).unwrap();
        assert_eq!(claims.ttl_seconds(), 3600);
    }

    #[test]
    fn test_issue_honors_ttl_override_and_name() {
        let issuer = TokenIssuer::from_config(&config(true)).unwrap();
        let grant = ParticipantGrant::new("caller-9", "lobby")
            .with_ttl_seconds(120)
            .with_display_name(Some("Bob"));
        let claims = decode_claims_unverified(&issuer.issue(&grant).unwrap().token).unwrap();

        assert_eq!(claims.ttl_seconds(), 120);
        assert_eq!(claims.name.as_deref(), Some("Bob"));
    }

    #[test]
    fn test_issue_omits_blank_display_name() {
        let issuer = TokenIssuer::from_config(&config(true)).unwrap();
        let grant = ParticipantGrant::new("caller-9", "lobby").with_display_name(Some("  "));
        let claims = decode_claims_unverified(&issuer.issue(&grant).unwrap().token).unwrap();
        assert!(claims.name.is_none());
    }

    #[test]
    fn test_issue_applies_custom_permissions() {
        let issuer = TokenIssuer::from_config(&config(true)).unwrap();
        let grant = ParticipantGrant::new("observer", "lobby").with_permissions(RoomPermissions {
            can_publish: false,
            can_subscribe: true,
            can_publish_data: false,
        });
        let claims = decode_claims_unverified(&issuer.issue(&grant).unwrap().token).unwrap();

        assert!(!claims.video.can_publish);
        assert!(claims.video.can_subscribe);
        assert!(!claims.video.can_publish_data);
    }

    #[test]
    fn test_issue_rejects_blank_identity_and_room() {
        let issuer = TokenIssuer::from_config(&config(true)).unwrap();

        assert!(matches!(
            issuer.issue(&ParticipantGrant::new("  ", "lobby")),
            Err(WtError::Validation(_))
        ));
        assert!(matches!(
            issuer.issue(&ParticipantGrant::new("agent", "")),
            Err(WtError::Validation(_))
        ));
    }

    #[test]
    fn test_later_issuance_expires_later() {
        let issuer = TokenIssuer::from_config(&config(true)).unwrap();
        let grant = ParticipantGrant::new("agent-1", "support-42");

        let first = issuer.issue(&grant).unwrap();
        std::thread::sleep(std::time::Duration::from_millis(1100));
        let second = issuer.issue(&grant).unwrap();

        assert!(second.expires_at > first.expires_at);
        assert_ne!(first.token, second.token);
    }

    #[test]
    fn test_issue_rejects_zero_ttl() {
        let issuer = TokenIssuer::from_config(&config(true)).unwrap();
        let grant = ParticipantGrant::new("agent", "lobby").with_ttl_seconds(0);
        assert!(matches!(issuer.issue(&grant), Err(WtError::Validation(_))));
    }

    #[test]
    fn test_issue_trims_identity_and_room() {
        let issuer = TokenIssuer::from_config(&config(true)).unwrap();
        let issued = issuer
            .issue(&ParticipantGrant::new(" agent-1 ", " support-42\n"))
            .unwrap();
        let claims = decode_claims_unverified(&issued.token).unwrap();
        assert_eq!(claims.sub, "agent-1");
        assert_eq!(claims.video.room, "support-42");
    }

    #[test]
    fn test_issue_length_limit_counts_characters() {
        let issuer = TokenIssuer::from_config(&config(true)).unwrap();

        let at_limit = "é".repeat(MAX_IDENTITY_LENGTH);
        assert!(issuer
            .issue(&ParticipantGrant::new(at_limit.as_str(), "lobby"))
            .is_ok());

        let over_limit = "é".repeat(MAX_IDENTITY_LENGTH + 1);
        assert!(matches!(
            issuer.issue(&ParticipantGrant::new(over_limit.as_str(), "lobby")),
            Err(WtError::Validation(_))
        ));
    }
}
