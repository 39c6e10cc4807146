//! Question-to-context retrieval.

use std::sync::Arc;

use tracing::debug;

use crate::document::SearchResult;
use crate::embedding::EmbeddingProvider;
use crate::error::Result;
use crate::vectorstore::VectorStore;

/// Embeds a question and runs top-k similarity search over the store.
///
/// Stateless per request; safe to share across concurrent queries. An
/// empty store yields an empty result, not an error.
pub struct Retriever {
    embedder: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn VectorStore>,
    top_k: usize,
}

impl Retriever {
    /// Create a retriever returning at most `top_k` results per question.
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        store: Arc<dyn VectorStore>,
        top_k: usize,
    ) -> Self {
        Self { embedder, store, top_k }
    }

    /// Retrieve the chunks most relevant to `question`.
    ///
    /// # Errors
    ///
    /// Propagates embedding and store failures.
    pub async fn retrieve(&self, question: &str) -> Result<Vec<SearchResult>> {
        let embedding = self.embedder.embed(question).await?;
        let results = self.store.search(&embedding, self.top_k).await?;
        debug!(top_k = self.top_k, results = results.len(), "retrieved context");
        Ok(results)
    }
}
