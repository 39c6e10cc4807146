//! Ollama embedding provider using the local embeddings API.

use std::time::Duration;

use async_trait::async_trait;
use patent_rag::embedding::EmbeddingProvider;
use patent_rag::error::{RagError, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

/// The default Ollama base URL.
const DEFAULT_BASE_URL: &str = "http://localhost:11434";

/// The default embedding model.
const DEFAULT_MODEL: &str = "nomic-embed-text";

/// The dimensionality of `nomic-embed-text` embeddings.
const DEFAULT_DIMENSIONS: usize = 768;

/// The default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// An [`EmbeddingProvider`] backed by an Ollama embeddings endpoint.
///
/// Uses `reqwest` to call `/api/embed`, which accepts a batch of inputs
/// in one request. Deterministic for identical `(model, text)` pairs.
///
/// # Configuration
///
/// - `base_url` – defaults to `http://localhost:11434`.
/// - `model` – defaults to `nomic-embed-text` (768 dimensions).
/// - `timeout` – defaults to 60 s; an elapsed timeout surfaces as
///   [`RagError::ProviderTimeout`].
///
/// # Example
///
/// ```rust,ignore
/// use patent_model::OllamaEmbedding;
///
/// let provider = OllamaEmbedding::new()?;
/// let embedding = provider.embed("a pump with a rotor").await?;
/// assert_eq!(embedding.len(), 768);
/// ```
pub struct OllamaEmbedding {
    client: reqwest::Client,
    base_url: String,
    model: String,
    dimensions: usize,
    timeout: Duration,
}

impl OllamaEmbedding {
    /// Create a provider with default endpoint, model, and timeout.
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Create a provider with a custom request timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build().map_err(|e| {
            RagError::EmbeddingUnavailable {
                provider: "Ollama".into(),
                message: format!("cannot build HTTP client: {e}"),
            }
        })?;
        Ok(Self {
            client,
            base_url: DEFAULT_BASE_URL.into(),
            model: DEFAULT_MODEL.into(),
            dimensions: DEFAULT_DIMENSIONS,
            timeout,
        })
    }

    /// Set the base URL of the Ollama server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the model name and its embedding dimensionality.
    pub fn with_model(mut self, model: impl Into<String>, dimensions: usize) -> Self {
        self.model = model.into();
        self.dimensions = dimensions;
        self
    }

    fn request_error(&self, e: reqwest::Error) -> RagError {
        if e.is_timeout() {
            return RagError::ProviderTimeout {
                provider: "Ollama".into(),
                seconds: self.timeout.as_secs(),
            };
        }
        RagError::EmbeddingUnavailable { provider: "Ollama".into(), message: e.to_string() }
    }
}

// ── Ollama API request/response types ──────────────────────────────

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: Vec<&'a str>,
}

#[derive(Deserialize)]
struct EmbedResponse {
    embeddings: Vec<Vec<f32>>,
}

// ── EmbeddingProvider implementation ───────────────────────────────

#[async_trait]
impl EmbeddingProvider for OllamaEmbedding {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let results = self.embed_batch(&[text]).await?;
        results.into_iter().next().ok_or_else(|| RagError::EmbeddingUnavailable {
            provider: "Ollama".into(),
            message: "API returned empty response".into(),
        })
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        debug!(provider = "Ollama", batch_size = texts.len(), model = %self.model, "embedding batch");

        let url = format!("{}/api/embed", self.base_url.trim_end_matches('/'));
        let response = self
            .client
            .post(&url)
            .json(&EmbedRequest { model: &self.model, input: texts.to_vec() })
            .send()
            .await
            .map_err(|e| {
                error!(provider = "Ollama", error = %e, "request failed");
                self.request_error(e)
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!(provider = "Ollama", %status, "API error");
            return Err(RagError::EmbeddingUnavailable {
                provider: "Ollama".into(),
                message: format!("API returned {status}: {body}"),
            });
        }

        let embed_response: EmbedResponse = response.json().await.map_err(|e| {
            error!(provider = "Ollama", error = %e, "failed to parse response");
            RagError::EmbeddingUnavailable {
                provider: "Ollama".into(),
                message: format!("failed to parse response: {e}"),
            }
        })?;

        if embed_response.embeddings.len() != texts.len() {
            return Err(RagError::EmbeddingUnavailable {
                provider: "Ollama".into(),
                message: format!(
                    "API returned {} embeddings for {} inputs",
                    embed_response.embeddings.len(),
                    texts.len()
                ),
            });
        }

        Ok(embed_response.embeddings)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}
