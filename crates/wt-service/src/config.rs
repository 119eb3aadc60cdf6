//! Warm transfer service configuration.
//!
//! Configuration is loaded once from environment variables at startup.
//! Integration credentials (room-service key/secret, model-provider key) are
//! optional here: their absence is reported per request as a configuration
//! error so the process can still serve `/health` and the endpoints that do
//! not need them. Malformed values abort startup.

use common::secret::{ExposeSecret, SecretString};
use std::collections::HashMap;
use std::env;
use std::fmt;
use thiserror::Error;

/// Default HTTP bind address.
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8000";

/// Default room token lifetime in seconds (1 hour).
pub const DEFAULT_TOKEN_TTL_SECONDS: u64 = 3600;

/// Maximum room token lifetime in seconds (24 hours).
pub const MAX_TOKEN_TTL_SECONDS: u64 = 86_400;

/// Default model-provider base URL.
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com";

/// Default chat model used for summaries.
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-3.5-turbo";

/// Whole-request timeout applied by the router, in seconds.
pub const REQUEST_TIMEOUT_SECONDS: u64 = 30;

/// Default model-provider request timeout in seconds.
pub const DEFAULT_LLM_TIMEOUT_SECONDS: u64 = 20;

/// Maximum model-provider request timeout in seconds.
///
/// Kept below [`REQUEST_TIMEOUT_SECONDS`] so a slow provider surfaces as an
/// upstream error rather than a router timeout.
pub const MAX_LLM_TIMEOUT_SECONDS: u64 = 25;

/// Default graceful-shutdown drain period in seconds.
pub const DEFAULT_DRAIN_SECONDS: u64 = 5;

/// Service configuration.
///
/// Secrets are held as `SecretString` and redacted in Debug output.
#[derive(Clone)]
pub struct Config {
    /// Server bind address (default: "0.0.0.0:8000").
    pub bind_address: String,

    /// Room-service URL handed to clients alongside their token.
    pub livekit_url: Option<String>,

    /// Room-service API key, used as the token issuer (`iss`).
    pub livekit_api_key: Option<String>,

    /// Room-service API secret used to sign tokens.
    pub livekit_api_secret: Option<SecretString>,

    /// Lifetime of issued room tokens in seconds.
    pub token_ttl_seconds: u64,

    /// Model-provider API key.
    pub openai_api_key: Option<SecretString>,

    /// Model-provider base URL (no trailing slash).
    pub openai_base_url: String,

    /// Chat model used for summaries.
    pub openai_model: String,

    /// Model-provider request timeout in seconds.
    pub llm_timeout_seconds: u64,

    /// Allowed CORS origins. A single "*" allows any origin.
    pub cors_allowed_origins: Vec<String>,

    /// Seconds to wait for in-flight requests after a shutdown signal.
    pub drain_seconds: u64,
}

/// Custom Debug implementation that redacts secrets.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("bind_address", &self.bind_address)
            .field("livekit_url", &self.livekit_url)
            .field("livekit_api_key", &self.livekit_api_key)
            .field(
                "livekit_api_secret",
                &redacted_presence(&self.livekit_api_secret),
            )
            .field("token_ttl_seconds", &self.token_ttl_seconds)
            .field("openai_api_key", &redacted_presence(&self.openai_api_key))
            .field("openai_base_url", &self.openai_base_url)
            .field("openai_model", &self.openai_model)
            .field("llm_timeout_seconds", &self.llm_timeout_seconds)
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .field("drain_seconds", &self.drain_seconds)
            .finish()
    }
}

fn redacted_presence(secret: &Option<SecretString>) -> &'static str {
    match secret {
        Some(_) => "[REDACTED]",
        None => "[NOT SET]",
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {reason}")]
    InvalidValue { name: String, reason: String },
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a HashMap (for testing).
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let bind_address =
            non_empty(vars, "BIND_ADDRESS").unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());

        let livekit_url = non_empty(vars, "LIVEKIT_URL");
        let livekit_api_key = non_empty(vars, "LIVEKIT_API_KEY");
        let livekit_api_secret = non_empty(vars, "LIVEKIT_API_SECRET").map(SecretString::from);

        let token_ttl_seconds = parse_u64(vars, "TOKEN_TTL_SECONDS", DEFAULT_TOKEN_TTL_SECONDS)?;
        if token_ttl_seconds == 0 || token_ttl_seconds > MAX_TOKEN_TTL_SECONDS {
            return Err(ConfigError::InvalidValue {
                name: "TOKEN_TTL_SECONDS".to_string(),
                reason: format!(
                    "must be between 1 and {MAX_TOKEN_TTL_SECONDS}, got {token_ttl_seconds}"
                ),
            });
        }

        let openai_api_key = non_empty(vars, "OPENAI_API_KEY").map(SecretString::from);

        let openai_base_url = non_empty(vars, "OPENAI_BASE_URL")
            .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let openai_model =
            non_empty(vars, "OPENAI_MODEL").unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string());

        let llm_timeout_seconds =
            parse_u64(vars, "LLM_TIMEOUT_SECONDS", DEFAULT_LLM_TIMEOUT_SECONDS)?;
        if llm_timeout_seconds == 0 || llm_timeout_seconds > MAX_LLM_TIMEOUT_SECONDS {
            return Err(ConfigError::InvalidValue {
                name: "LLM_TIMEOUT_SECONDS".to_string(),
                reason: format!(
                    "must be between 1 and {MAX_LLM_TIMEOUT_SECONDS}, got {llm_timeout_seconds}"
                ),
            });
        }

        let cors_allowed_origins = non_empty(vars, "CORS_ALLOWED_ORIGINS")
            .map(|value| {
                value
                    .split(',')
                    .map(str::trim)
                    .filter(|origin| !origin.is_empty())
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
            })
            .filter(|origins| !origins.is_empty())
            .unwrap_or_else(|| vec!["*".to_string()]);

        let drain_seconds = parse_u64(vars, "WT_DRAIN_SECONDS", DEFAULT_DRAIN_SECONDS)?;

        Ok(Config {
            bind_address,
            livekit_url,
            livekit_api_key,
            livekit_api_secret,
            token_ttl_seconds,
            openai_api_key,
            openai_base_url,
            openai_model,
            llm_timeout_seconds,
            cors_allowed_origins,
            drain_seconds,
        })
    }

    /// True when both the room-service API key and secret are present.
    pub fn has_signing_credentials(&self) -> bool {
        self.livekit_api_key.is_some()
            && self
                .livekit_api_secret
                .as_ref()
                .is_some_and(|s| !s.expose_secret().is_empty())
    }

    /// True when the model-provider API key is present.
    pub fn has_llm_credentials(&self) -> bool {
        self.openai_api_key.is_some()
    }

    /// True when CORS should allow any origin.
    pub fn allows_any_origin(&self) -> bool {
        self.cors_allowed_origins.iter().any(|o| o == "*")
    }
}

/// Returns the trimmed value of `name`, treating empty strings as unset.
fn non_empty(vars: &HashMap<String, String>, name: &str) -> Option<String> {
    vars.get(name)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(ToString::to_string)
}

fn parse_u64(
    vars: &HashMap<String, String>,
    name: &str,
    default: u64,
) -> Result<u64, ConfigError> {
    match non_empty(vars, name) {
        Some(value) => value.parse().map_err(|e| ConfigError::InvalidValue {
            name: name.to_string(),
            reason: format!("must be a valid non-negative integer, got '{value}': {e}"),
        }),
        None => Ok(default),
    }
}
