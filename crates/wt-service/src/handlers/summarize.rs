//! Conversation summarization handler.

use crate::errors::WtError;
use crate::handlers::parse_json_body;
use crate::models::{SummaryRequest, SummaryResponse};
use crate::observability::metrics::{record_error, record_summarization};
use crate::routes::AppState;
use axum::{body::Bytes, extract::State, Json};
use std::sync::Arc;
use std::time::Instant;
use tracing::instrument;

/// Message returned when no provider key is configured.
pub const MISSING_LLM_KEY_MESSAGE: &str = "OPENAI_API_KEY must be set in environment variables";

/// Handler for POST /llm/summarize
///
/// ## Request Body
///
/// ```json
/// {"conversation_text": "Customer: ...", "context": "billing"}
/// ```
///
/// Without a configured provider key this answers 500 and makes no
/// provider call.
#[instrument(skip_all, name = "wt.llm.summarize_request")]
pub async fn summarize_conversation(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<SummaryResponse>, WtError> {
    let result = summarize(&state, &body).await;

    if let Err(e) = &result {
        record_error("summarize", e.error_type(), e.status_code());
    }

    result
}

async fn summarize(state: &AppState, body: &[u8]) -> Result<Json<SummaryResponse>, WtError> {
    let request = parse_json_body::<SummaryRequest>(body)?;
    request
        .validate()
        .map_err(|msg| WtError::Validation(msg.to_string()))?;

    let Some(client) = state.llm_client.as_ref() else {
        return Err(WtError::Configuration(MISSING_LLM_KEY_MESSAGE.to_string()));
    };

    let start = Instant::now();
    let summary = client
        .summarize(&request.conversation_text, &request.context)
        .await;
    let status = if summary.is_ok() { "success" } else { "error" };
    record_summarization(status, start.elapsed());
    let summary = summary?;

    tracing::info!(
        target: "wt.handlers.summarize",
        input_len = request.conversation_text.len(),
        summary_len = summary.len(),
        "Conversation summarized"
    );

    Ok(Json(SummaryResponse { summary }))
}
