//! Model-provider HTTP client for conversation summaries.
//!
//! Calls the OpenAI-compatible chat-completions API.
//!
//! # Security
//!
//! - The API key is held as a `SecretString` and only exposed into the
//!   `Authorization` header
//! - Timeouts prevent hanging connections
//! - Conversation text is never logged

use crate::config::Config;
use crate::errors::WtError;
use async_trait::async_trait;
use common::secret::{ExposeSecret, SecretString};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{error, instrument, warn};

/// Connect timeout for provider requests in seconds.
const LLM_CONNECT_TIMEOUT_SECS: u64 = 5;

/// Upper bound on generated summary length.
pub const SUMMARY_MAX_TOKENS: u32 = 200;

/// Sampling temperature for summaries.
pub const SUMMARY_TEMPERATURE: f32 = 0.7;

/// System prompt sent with every summary request.
pub const SUMMARY_SYSTEM_PROMPT: &str =
    "You are a helpful assistant that summarizes conversations.";

/// Build the user prompt for a summary request.
pub fn summary_prompt(conversation_text: &str, context: &str) -> String {
    format!(
        "Please provide a concise, single-paragraph summary of the following customer service \
         conversation, focusing on the main issue, key points, and any resolution.\n\n\
         Context: {context}\n\nConversation:\n{conversation_text}"
    )
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Error envelope returned by the provider on non-2xx responses.
#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    error: ProviderErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorDetail {
    message: String,
}

/// Trait for summarization (enables mocking).
#[async_trait]
pub trait LlmClientTrait: Send + Sync {
    /// Summarize a conversation transcript.
    async fn summarize(&self, conversation_text: &str, context: &str) -> Result<String, WtError>;
}

/// HTTP client for the chat-completions API.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    base_url: String,
    api_key: SecretString,
    model: String,
}

impl LlmClient {
    /// Create a new client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Provider base URL without trailing slash (e.g., "https://api.openai.com")
    /// * `api_key` - Provider API key
    /// * `model` - Chat model name
    /// * `timeout` - Whole-request timeout
    ///
    /// # Errors
    ///
    /// Returns `WtError::Internal` if the HTTP client cannot be built.
    pub fn new(
        base_url: String,
        api_key: SecretString,
        model: String,
        timeout: Duration,
    ) -> Result<Self, WtError> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(LLM_CONNECT_TIMEOUT_SECS))
            .build()
            .map_err(|e| {
                error!(target: "wt.services.llm_client", error = %e, "Failed to build HTTP client");
                WtError::Internal
            })?;

        Ok(Self {
            client,
            base_url,
            api_key,
            model,
        })
    }

    /// Build a client from configuration, if a provider key is configured.
    ///
    /// # Errors
    ///
    /// Returns `WtError::Internal` if the HTTP client cannot be built.
    pub fn from_config(config: &Config) -> Result<Option<Self>, WtError> {
        let Some(api_key) = config.openai_api_key.clone() else {
            return Ok(None);
        };

        Self::new(
            config.openai_base_url.clone(),
            api_key,
            config.openai_model.clone(),
            Duration::from_secs(config.llm_timeout_seconds),
        )
        .map(Some)
    }

    /// Request a summary from the provider.
    ///
    /// # Errors
    ///
    /// Returns `WtError::Upstream` on transport failure, a non-2xx status,
    /// an unparsable body, or a response without content.
    #[instrument(skip_all, name = "wt.llm.summarize", fields(model = %self.model))]
    pub async fn summarize(
        &self,
        conversation_text: &str,
        context: &str,
    ) -> Result<String, WtError> {
        let url = format!("{}/v1/chat/completions", self.base_url);
        let prompt = summary_prompt(conversation_text, context);

        let body = ChatCompletionRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SUMMARY_SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt,
                },
            ],
            max_tokens: SUMMARY_MAX_TOKENS,
            temperature: SUMMARY_TEMPERATURE,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                warn!(target: "wt.services.llm_client", error = %e, "Provider request failed");
                WtError::Upstream(format!("Model provider request failed: {e}"))
            })?;

        self.handle_response(response).await
    }

    /// Map the provider response to a summary or an upstream error.
    async fn handle_response(&self, response: reqwest::Response) -> Result<String, WtError> {
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ProviderErrorBody>(&text)
                .map(|body| body.error.message)
                .unwrap_or_else(|_| format!("Model provider returned status {status}"));

            warn!(
                target: "wt.services.llm_client",
                status = %status,
                "Provider returned error status"
            );
            return Err(WtError::Upstream(message));
        }

        let parsed: ChatCompletionResponse = response.json().await.map_err(|e| {
            error!(target: "wt.services.llm_client", error = %e, "Failed to parse provider response");
            WtError::Upstream(format!("Model provider returned an invalid response: {e}"))
        })?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .ok_or_else(|| {
                WtError::Upstream("Model provider returned no summary".to_string())
            })
    }
}

#[async_trait]
impl LlmClientTrait for LlmClient {
    async fn summarize(&self, conversation_text: &str, context: &str) -> Result<String, WtError> {
        LlmClient::summarize(self, conversation_text, context).await
    }
}

/// Mock summarizer for tests.
pub mod mock {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Mock LLM client that returns a canned summary or fails.
    pub struct MockLlmClient {
        summary: Option<String>,
        failure: Option<String>,
        call_count: AtomicUsize,
        last_prompt: Mutex<Option<(String, String)>>,
    }

    impl MockLlmClient {
        /// Create a mock that always returns `summary`.
        pub fn returning(summary: impl Into<String>) -> Self {
            Self {
                summary: Some(summary.into()),
                failure: None,
                call_count: AtomicUsize::new(0),
                last_prompt: Mutex::new(None),
            }
        }

        /// Create a mock that always fails with an upstream error.
        pub fn failing(message: impl Into<String>) -> Self {
            Self {
                summary: None,
                failure: Some(message.into()),
                call_count: AtomicUsize::new(0),
                last_prompt: Mutex::new(None),
            }
        }

        /// Get the number of calls made.
        pub fn call_count(&self) -> usize {
            self.call_count.load(Ordering::SeqCst)
        }

        /// Conversation text and context of the most recent call.
        pub fn last_request(&self) -> Option<(String, String)> {
            self.last_prompt.lock().ok().and_then(|guard| guard.clone())
        }
    }

    #[async_trait]
    impl LlmClientTrait for MockLlmClient {
        async fn summarize(
            &self,
            conversation_text: &str,
            context: &str,
        ) -> Result<String, WtError> {
            self.call_count.fetch_add(1, Ordering::SeqCst);
            if let Ok(mut guard) = self.last_prompt.lock() {
                *guard = Some((conversation_text.to_string(), context.to_string()));
            }

            match (&self.summary, &self.failure) {
                (_, Some(message)) => Err(WtError::Upstream(message.clone())),
                (Some(summary), None) => Ok(summary.clone()),
                (None, None) => Err(WtError::Internal),
            }
        }
    }
}
