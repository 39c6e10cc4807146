//! Generation provider trait for composing answers from retrieved context.

use async_trait::async_trait;

use crate::error::Result;

/// One synchronous round trip to the external generation service.
///
/// The three parts mirror the service contract: fixed persona
/// instructions, the retrieved context text, and the user's question.
#[derive(Debug, Clone, Copy)]
pub struct GenerationRequest<'a> {
    /// Fixed persona and refusal instructions.
    pub instructions: &'a str,
    /// Concatenated retrieved chunk texts, already bounded in size.
    pub context: &'a str,
    /// The user's question, verbatim.
    pub question: &'a str,
}

/// A provider that turns a [`GenerationRequest`] into answer text.
///
/// Implementations wrap an external text-generation service. The
/// response is returned verbatim; a failed or timed-out call surfaces as
/// a structured error, never as a partial or fabricated answer.
#[async_trait]
pub trait GenerationProvider: Send + Sync {
    /// Generate an answer for the request.
    async fn generate(&self, request: GenerationRequest<'_>) -> Result<String>;
}
