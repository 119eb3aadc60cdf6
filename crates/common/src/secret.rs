//! Secret types for protecting sensitive values from accidental logging.
//!
//! Re-exports the [`secrecy`] types used for the room-service signing secret
//! and the model-provider API key. `SecretString` implements `Debug` with
//! redaction, so any struct that derives `Debug` and holds one stays safe to
//! log with `{:?}` or `tracing`.
//!
//! Secrets are zeroized when dropped.
//!
//! # Example
//!
//! ```rust
//! use common::secret::{ExposeSecret, SecretString};
//!
//! #[derive(Debug)]
//! struct SigningCredentials {
//!     api_key: String,
//!     api_secret: SecretString,
//! }
//!
//! let creds = SigningCredentials {
//!     api_key: "APIabc123".to_string(),
//!     api_secret: SecretString::from("shared-secret"),
//! };
//!
//! // api_secret is redacted
//! println!("{:?}", creds);
//!
//! // Reading the value is always explicit
//! let secret: &str = creds.api_secret.expose_secret();
//! assert_eq!(secret, "shared-secret");
//! ```
//!
//! Use `SecretString` for:
//! - `LIVEKIT_API_SECRET`
//! - `OPENAI_API_KEY`
//! - Any bearer token built from the above

pub use secrecy::{ExposeSecret, SecretString};
