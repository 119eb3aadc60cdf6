//! Room token signing and verification (HS256).

use crate::errors::WtError;
use common::jwt::{RoomClaims, MAX_JWT_SIZE_BYTES};
use common::secret::{ExposeSecret, SecretString};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use tracing::instrument;

/// Sign a room claim set with the shared API secret.
#[instrument(skip_all)]
pub fn sign_room_token(claims: &RoomClaims, api_secret: &SecretString) -> Result<String, WtError> {
    let secret = api_secret.expose_secret();
    if secret.is_empty() {
        return Err(WtError::Crypto("Signing secret is empty".to_string()));
    }

    let encoding_key = EncodingKey::from_secret(secret.as_bytes());

    let mut header = Header::new(Algorithm::HS256);
    header.typ = Some("JWT".to_string());

    encode(&header, claims, &encoding_key)
        .map_err(|e| WtError::Crypto(format!("JWT signing operation failed: {}", e)))
}

/// Verify a room token against the API key and secret that should have issued it.
///
/// Validates:
/// - Token size (must be <= MAX_JWT_SIZE_BYTES)
/// - HS256 signature
/// - Expiration (`exp`) and not-before (`nbf`)
/// - Issuer (`iss` must equal `api_key`)
#[instrument(skip_all)]
pub fn verify_room_token(
    token: &str,
    api_key: &str,
    api_secret: &SecretString,
) -> Result<RoomClaims, WtError> {
    if token.len() > MAX_JWT_SIZE_BYTES {
        tracing::debug!(
            target: "crypto",
            token_size = token.len(),
            max_size = MAX_JWT_SIZE_BYTES,
            "Token rejected: size exceeds maximum allowed"
        );
        return Err(WtError::InvalidToken(
            "The room token is invalid or expired".to_string(),
        ));
    }

    let decoding_key = DecodingKey::from_secret(api_secret.expose_secret().as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    validation.validate_nbf = true;
    validation.set_issuer(&[api_key]);
    validation.set_required_spec_claims(&["exp", "nbf", "iss", "sub"]);

    let token_data = decode::<RoomClaims>(token, &decoding_key, &validation).map_err(|e| {
        tracing::debug!(target: "crypto", error = %e, "Token verification failed");
        WtError::InvalidToken("The room token is invalid or expired".to_string())
    })?;

    Ok(token_data.claims)
}
