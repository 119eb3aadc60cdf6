//! Room access token claims shared by the service and its test utilities.
//!
//! Tokens follow the LiveKit access-token layout: an HS256-signed JWT whose
//! `sub` is the participant identity, `iss` is the API key that signed it,
//! and `video` carries the room grant.
//!
//! ```json
//! {
//!   "sub": "agent-1",
//!   "iss": "APIabc123",
//!   "nbf": 1707001200,
//!   "exp": 1707004800,
//!   "name": "Alice",
//!   "video": {
//!     "roomJoin": true,
//!     "room": "support-42",
//!     "canPublish": true,
//!     "canSubscribe": true,
//!     "canPublishData": true
//!   }
//! }
//! ```
//!
//! # Security
//!
//! - Tokens are size-checked BEFORE parsing (DoS prevention)
//! - [`decode_claims_unverified`] does NOT check the signature; it exists for
//!   inspection and tests. Anything that grants access must verify first.
//! - The `sub` field is redacted in Debug output

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// =============================================================================
// Constants
// =============================================================================

/// Maximum accepted JWT size in bytes (8KB).
///
/// Room tokens are typically 300-400 bytes. Anything larger is rejected
/// before base64 decoding.
pub const MAX_JWT_SIZE_BYTES: usize = 8192;

/// JWT algorithm used for room tokens.
pub const ROOM_TOKEN_ALGORITHM: &str = "HS256";

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur while decoding a token without verification.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClaimsDecodeError {
    /// Token size exceeds maximum allowed.
    #[error("Token exceeds maximum size of {MAX_JWT_SIZE_BYTES} bytes")]
    TokenTooLarge,

    /// Token is not three dot-separated base64url segments.
    #[error("Token is not a well-formed JWT")]
    MalformedToken,

    /// Payload is not a valid room claim set.
    #[error("Token payload is not a valid room claim set: {0}")]
    InvalidClaims(String),
}

// =============================================================================
// Claims Types
// =============================================================================

/// Room grant embedded in the `video` claim.
///
/// Field names are camelCase on the wire as the room-service provider expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoGrant {
    /// Permission to join `room`. Always true for tokens issued here.
    #[serde(default)]
    pub room_join: bool,

    /// Room the grant applies to.
    pub room: String,

    /// Permission to publish audio/video tracks.
    #[serde(default)]
    pub can_publish: bool,

    /// Permission to subscribe to other participants' tracks.
    #[serde(default)]
    pub can_subscribe: bool,

    /// Permission to publish data messages.
    #[serde(default)]
    pub can_publish_data: bool,
}

/// Claim set of a room access token.
///
/// The `sub` field holds the participant identity, which is redacted in Debug
/// output.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomClaims {
    /// Participant identity - redacted in Debug output.
    pub sub: String,

    /// API key (signing key id) that issued the token.
    pub iss: String,

    /// Not-before timestamp, equal to the issuance time (Unix epoch seconds).
    pub nbf: i64,

    /// Expiration timestamp (Unix epoch seconds).
    pub exp: i64,

    /// Optional display name shown to other participants.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Room grant.
    pub video: VideoGrant,
}

impl fmt::Debug for RoomClaims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoomClaims")
            .field("sub", &"[REDACTED]")
            .field("iss", &self.iss)
            .field("nbf", &self.nbf)
            .field("exp", &self.exp)
            .field("name", &self.name)
            .field("video", &self.video)
            .finish()
    }
}

impl RoomClaims {
    /// Participant identity the token was issued to.
    #[must_use]
    pub fn identity(&self) -> &str {
        &self.sub
    }

    /// Room the token grants access to.
    #[must_use]
    pub fn room(&self) -> &str {
        &self.video.room
    }

    /// Lifetime of the token in seconds.
    #[must_use]
    pub fn ttl_seconds(&self) -> i64 {
        self.exp - self.nbf
    }
}

// =============================================================================
// Functions
// =============================================================================

/// Decode the claim set of a room token WITHOUT verifying its signature.
///
/// # Errors
///
/// - `TokenTooLarge` - token exceeds [`MAX_JWT_SIZE_BYTES`]
/// - `MalformedToken` - not three segments, or the payload is not base64url
/// - `InvalidClaims` - payload JSON does not match [`RoomClaims`]
pub fn decode_claims_unverified(token: &str) -> Result<RoomClaims, ClaimsDecodeError> {
    if token.len() > MAX_JWT_SIZE_BYTES {
        tracing::debug!(
            target: "common.jwt",
            token_size = token.len(),
            max_size = MAX_JWT_SIZE_BYTES,
            "Token rejected: size exceeds maximum allowed"
        );
        return Err(ClaimsDecodeError::TokenTooLarge);
    }

    let mut parts = token.split('.');
    let (Some(_header), Some(payload), Some(_signature), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(ClaimsDecodeError::MalformedToken);
    };

    let payload_bytes = URL_SAFE_NO_PAD.decode(payload).map_err(|e| {
        tracing::debug!(target: "common.jwt", error = %e, "Failed to decode JWT payload base64");
        ClaimsDecodeError::MalformedToken
    })?;

    serde_json::from_slice(&payload_bytes)
        .map_err(|e| ClaimsDecodeError::InvalidClaims(e.to_string()))
}
