//! Groq generation provider using the OpenAI-compatible chat API.

use std::time::Duration;

use async_trait::async_trait;
use patent_rag::error::{RagError, Result};
use patent_rag::generation::{GenerationProvider, GenerationRequest};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

/// The Groq chat completions endpoint.
const GROQ_CHAT_URL: &str = "https://api.groq.com/openai/v1/chat/completions";

/// The default generation model.
const DEFAULT_MODEL: &str = "llama3-70b-8192";

/// The default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// A [`GenerationProvider`] backed by Groq's chat completions API.
///
/// One request per [`GenerationRequest`]: the persona instructions go in
/// the system message, retrieved context and question in the user
/// message, and the first choice's content is returned verbatim.
///
/// # Configuration
///
/// - `api_key` – from the constructor or the `GROQ_API_KEY` environment
///   variable.
/// - `model` – defaults to `llama3-70b-8192`.
/// - `timeout` – defaults to 120 s; an elapsed timeout surfaces as
///   [`RagError::ProviderTimeout`].
pub struct GroqGeneration {
    client: reqwest::Client,
    api_key: String,
    model: String,
    timeout: Duration,
}

impl GroqGeneration {
    /// Create a provider with the given API key.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(RagError::Generation {
                provider: "Groq".into(),
                message: "API key must not be empty".into(),
            });
        }

        let timeout = DEFAULT_TIMEOUT;
        let client = reqwest::Client::builder().timeout(timeout).build().map_err(|e| {
            RagError::Generation {
                provider: "Groq".into(),
                message: format!("cannot build HTTP client: {e}"),
            }
        })?;

        Ok(Self { client, api_key, model: DEFAULT_MODEL.into(), timeout })
    }

    /// Create a provider using the `GROQ_API_KEY` environment variable.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("GROQ_API_KEY").map_err(|_| RagError::Generation {
            provider: "Groq".into(),
            message: "GROQ_API_KEY environment variable not set".into(),
        })?;
        Self::new(api_key)
    }

    /// Set the model name.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    fn request_error(&self, e: reqwest::Error) -> RagError {
        if e.is_timeout() {
            return RagError::ProviderTimeout {
                provider: "Groq".into(),
                seconds: self.timeout.as_secs(),
            };
        }
        RagError::Generation { provider: "Groq".into(), message: e.to_string() }
    }
}

// ── Groq API request/response types ────────────────────────────────

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: String,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

// ── GenerationProvider implementation ──────────────────────────────

#[async_trait]
impl GenerationProvider for GroqGeneration {
    async fn generate(&self, request: GenerationRequest<'_>) -> Result<String> {
        debug!(
            provider = "Groq",
            model = %self.model,
            context_chars = request.context.len(),
            "generation call"
        );

        let user_content =
            format!("Context:\n{}\n\nQuestion:\n{}", request.context, request.question);
        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage { role: "system", content: request.instructions },
                ChatMessage { role: "user", content: &user_content },
            ],
        };

        let response = self
            .client
            .post(GROQ_CHAT_URL)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!(provider = "Groq", error = %e, "request failed");
                self.request_error(e)
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);

            error!(provider = "Groq", %status, "API error");
            return Err(RagError::Generation {
                provider: "Groq".into(),
                message: format!("API returned {status}: {detail}"),
            });
        }

        let chat_response: ChatResponse = response.json().await.map_err(|e| {
            error!(provider = "Groq", error = %e, "failed to parse response");
            RagError::Generation {
                provider: "Groq".into(),
                message: format!("failed to parse response: {e}"),
            }
        })?;

        chat_response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| RagError::Generation {
                provider: "Groq".into(),
                message: "API returned no choices".into(),
            })
    }
}
