//! Custom test assertions for room tokens
//!
//! Provides trait-based assertions over issued tokens.

use crate::fixtures::{TEST_API_KEY, TEST_API_SECRET};
use common::jwt::{decode_claims_unverified, RoomClaims, ROOM_TOKEN_ALGORITHM};
use common::secret::SecretString;
use wt_service::crypto::verify_room_token;

/// Custom assertions for room tokens
///
/// # Example
/// ```rust,ignore
/// token
///     .assert_valid_room_token()
///     .assert_for_identity("agent-1")
///     .assert_for_room("support-42")
///     .assert_expires_in(3600);
/// ```
pub trait RoomTokenAssertions {
    /// Assert that the token verifies against the test API key and secret.
    fn assert_valid_room_token(&self) -> &Self;

    /// Assert the token's `sub`.
    fn assert_for_identity(&self, identity: &str) -> &Self;

    /// Assert the token's granted room.
    fn assert_for_room(&self, room: &str) -> &Self;

    /// Assert the token lives exactly `seconds` (`exp - nbf`) and has not expired.
    fn assert_expires_in(&self, seconds: i64) -> &Self;

    /// Assert the token grants join, publish, subscribe, and data.
    fn assert_full_media_grant(&self) -> &Self;

    /// Decoded claims, without signature verification.
    fn room_claims(&self) -> RoomClaims;
}

impl RoomTokenAssertions for str {
    fn assert_valid_room_token(&self) -> &Self {
        assert_eq!(
            self.split('.').count(),
            3,
            "JWT must have 3 parts (header.payload.signature)"
        );

        let header = decode_header_json(self);
        assert_eq!(header["alg"], ROOM_TOKEN_ALGORITHM, "Expected HS256 algorithm");
        assert_eq!(header["typ"], "JWT", "Expected JWT type");

        let verified = verify_room_token(
            self,
            TEST_API_KEY,
            &SecretString::from(TEST_API_SECRET),
        );
        assert!(
            verified.is_ok(),
            "Token failed verification: {:?}",
            verified.err()
        );
        self
    }

    fn assert_for_identity(&self, identity: &str) -> &Self {
        let claims = self.room_claims();
        assert_eq!(claims.sub, identity, "Token issued to unexpected identity");
        self
    }

    fn assert_for_room(&self, room: &str) -> &Self {
        let claims = self.room_claims();
        assert_eq!(claims.video.room, room, "Token granted unexpected room");
        assert!(claims.video.room_join, "Token does not grant roomJoin");
        self
    }

    fn assert_expires_in(&self, seconds: i64) -> &Self {
        let claims = self.room_claims();
        assert_eq!(claims.exp - claims.nbf, seconds, "Unexpected token lifetime");
        assert!(
            claims.exp > chrono::Utc::now().timestamp(),
            "Token is already expired"
        );
        self
    }

    fn assert_full_media_grant(&self) -> &Self {
        let video = self.room_claims().video;
        assert!(video.room_join, "roomJoin not granted");
        assert!(video.can_publish, "canPublish not granted");
        assert!(video.can_subscribe, "canSubscribe not granted");
        assert!(video.can_publish_data, "canPublishData not granted");
        self
    }

    fn room_claims(&self) -> RoomClaims {
        decode_claims_unverified(self).expect("token payload should decode as room claims")
    }
}

fn decode_header_json(token: &str) -> serde_json::Value {
    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};

    let header = token.split('.').next().expect("token should have a header");
    let bytes = URL_SAFE_NO_PAD
        .decode(header)
        .expect("JWT header should be base64url");
    serde_json::from_slice(&bytes).expect("JWT header should be JSON")
}
