//! HTTP request handlers for the warm transfer service.

pub mod health;
pub mod metrics;
pub mod summarize;
pub mod token;
pub mod transfer;

pub use health::{health_check, readiness_check};
pub use metrics::metrics_handler;
pub use summarize::summarize_conversation;
pub use token::{issue_token_get, issue_token_post};
pub use transfer::{disconnect_participant, warm_transfer};

use crate::errors::WtError;
use serde::de::DeserializeOwned;

/// Parse a JSON request body.
///
/// Bodies are parsed by hand instead of through `Json<T>` so that malformed
/// or incomplete input is answered with the structured 400 error body.
pub(crate) fn parse_json_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, WtError> {
    serde_json::from_slice(body).map_err(|e| {
        tracing::debug!(target: "wt.handlers", error = %e, "Rejected request body");
        WtError::Validation(format!("Invalid request body: {e}"))
    })
}
