//! Observability for the warm transfer service.
//!
//! # Privacy by Default
//!
//! Handlers use `#[instrument(skip_all)]` and log fields explicitly:
//! - **SAFE**: operation names, status codes, lengths
//! - **HASHED**: participant identities and room names (see [`hash_for_correlation`])
//! - **NEVER**: tokens, API secrets, provider keys, conversation text

pub mod metrics;

use sha2::{Digest, Sha256};

/// Hash a field value for correlation in logs (SHA-256, first 8 hex chars).
///
/// Used for participant identities and room names, which need correlation
/// across log entries but should not be stored in plaintext.
pub fn hash_for_correlation(value: &str) -> String {
    let digest = Sha256::digest(value.as_bytes());
    hex::encode(digest.get(..4).unwrap_or_default())
}
