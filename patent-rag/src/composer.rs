//! Answer composition from retrieved chunks.
//!
//! [`AnswerComposer`] assembles a single bounded prompt (persona
//! instructions, retrieved context, question) and makes one call to the
//! configured [`GenerationProvider`]. It is never invoked for questions
//! the domain gate rejected; the gate's refusal string is returned
//! upstream instead.

use std::sync::Arc;

use tracing::{debug, info};

use crate::document::SearchResult;
use crate::error::Result;
use crate::generation::{GenerationProvider, GenerationRequest};

/// Persona and refusal instructions sent with every generation call.
pub const DEFAULT_INSTRUCTIONS: &str = "\
You are a specialized Patent Assistant with expertise in patent writing, analysis, and the \
patent application process.

Your capabilities include:
- Helping users draft patent claims and descriptions
- Analyzing patent documents for novelty and patentability
- Providing guidance on patent application processes
- Explaining patent terminology and concepts
- Offering insights on patent strategy

IMPORTANT INSTRUCTIONS:
1. You MUST ONLY answer questions related to patents, intellectual property, or the patent \
application process.
2. If the question is not related to patents or intellectual property, you MUST refuse to \
answer and explain that you are a specialized Patent Assistant.
3. Do not provide information on topics unrelated to patents, even if you know the answer.
4. If the context doesn't contain relevant information to answer a patent-related question, \
state that you don't have enough information, but still try to provide general patent \
guidance if possible.

Use the following context from patent documents to answer the question thoroughly and \
accurately. If the question is about writing a patent, provide clear, structured guidance \
with examples where appropriate.";

/// Assembles prompts and calls the generation provider.
pub struct AnswerComposer {
    provider: Arc<dyn GenerationProvider>,
    instructions: String,
    max_context_chars: usize,
}

impl AnswerComposer {
    /// Create a composer with the default persona instructions.
    pub fn new(provider: Arc<dyn GenerationProvider>, max_context_chars: usize) -> Self {
        Self { provider, instructions: DEFAULT_INSTRUCTIONS.to_string(), max_context_chars }
    }

    /// Replace the persona instructions.
    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = instructions.into();
        self
    }

    /// Compose an answer for `question` from retrieved results.
    ///
    /// Results must already be ordered by decreasing relevance; context
    /// is cut from the least-relevant end when the configured bound is
    /// exceeded. The provider's response is returned verbatim.
    ///
    /// # Errors
    ///
    /// Propagates the provider's failure unchanged; a failed generation
    /// call never yields a partial answer.
    pub async fn compose(&self, question: &str, results: &[SearchResult]) -> Result<String> {
        let context = self.build_context(results);
        debug!(
            results = results.len(),
            context_chars = context.chars().count(),
            "composing answer"
        );

        let answer = self
            .provider
            .generate(GenerationRequest {
                instructions: &self.instructions,
                context: &context,
                question,
            })
            .await?;

        info!(answer_chars = answer.chars().count(), "generation call completed");
        Ok(answer)
    }

    /// Concatenate chunk texts, most relevant first, within the bound.
    ///
    /// The chunk that crosses the bound is truncated at a character
    /// boundary; everything after it is dropped.
    fn build_context(&self, results: &[SearchResult]) -> String {
        let mut context = String::new();
        let mut remaining = self.max_context_chars;

        for result in results {
            if remaining == 0 {
                break;
            }
            if !context.is_empty() {
                context.push_str("\n\n");
            }
            let text = &result.chunk.text;
            let take = text.chars().count().min(remaining);
            if take == text.chars().count() {
                context.push_str(text);
            } else {
                context.extend(text.chars().take(take));
            }
            remaining -= take;
        }

        context
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::document::Chunk;
    use crate::metadata::PatentMetadata;

    /// Records the last request and echoes a canned answer.
    struct RecordingProvider {
        last_context: Mutex<Option<String>>,
    }

    #[async_trait]
    impl GenerationProvider for RecordingProvider {
        async fn generate(&self, request: GenerationRequest<'_>) -> Result<String> {
            *self.last_context.lock().unwrap() = Some(request.context.to_string());
            Ok(format!("answer to: {}", request.question))
        }
    }

    fn result(text: &str, score: f32) -> SearchResult {
        SearchResult {
            chunk: Chunk {
                id: "d_0".into(),
                document_id: "d".into(),
                ordinal: 0,
                text: text.into(),
                metadata: PatentMetadata::default(),
            },
            score,
        }
    }

    fn composer(max: usize) -> (Arc<RecordingProvider>, AnswerComposer) {
        let provider = Arc::new(RecordingProvider { last_context: Mutex::new(None) });
        (provider.clone(), AnswerComposer::new(provider, max))
    }

    #[tokio::test]
    async fn returns_provider_response_verbatim() {
        let (_, composer) = composer(1000);
        let answer = composer.compose("what is claim 1?", &[result("claim text", 0.9)]).await;
        assert_eq!(answer.unwrap(), "answer to: what is claim 1?");
    }

    #[tokio::test]
    async fn context_keeps_most_relevant_within_bound() {
        let (provider, composer) = composer(10);
        let results = [result("aaaaaaaa", 0.9), result("bbbbbbbb", 0.5)];
        composer.compose("q", &results).await.unwrap();

        let context = provider.last_context.lock().unwrap().clone().unwrap();
        // Most relevant chunk fits whole; the separator plus the less
        // relevant chunk are cut to the remaining budget.
        assert!(context.starts_with("aaaaaaaa"));
        assert_eq!(context.chars().filter(|c| *c == 'b').count(), 2);
    }

    #[tokio::test]
    async fn empty_results_produce_empty_context() {
        let (provider, composer) = composer(100);
        composer.compose("q", &[]).await.unwrap();
        assert_eq!(provider.last_context.lock().unwrap().as_deref(), Some(""));
    }
}
