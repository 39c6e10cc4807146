//! Pipeline orchestrator.
//!
//! [`PatentAssistant`] is the service object behind the two core entry
//! points any transport layer sees: [`ingest`](PatentAssistant::ingest)
//! and [`answer`](PatentAssistant::answer). It is constructed once at
//! process start via [`PatentAssistant::builder`] with its collaborators
//! passed in explicitly; there is no ambient state.

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::chunking::{Chunker, OverlapChunker};
use crate::composer::AnswerComposer;
use crate::config::PipelineConfig;
use crate::document::{Chunk, IndexEntry};
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::gate::{DomainGate, GateConfig};
use crate::generation::GenerationProvider;
use crate::loader::DocumentLoader;
use crate::retriever::Retriever;
use crate::vectorstore::VectorStore;

/// Number of chunk texts sent per embedding provider call.
const EMBED_BATCH_SIZE: usize = 32;

/// Outcome of one [`ingest`](PatentAssistant::ingest) call.
///
/// Skipped documents are reported here rather than aborting the batch;
/// an `Err` from `ingest` means the batch as a whole was rejected and
/// the index is unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IngestionReport {
    /// Documents chunked and indexed.
    pub documents_indexed: usize,
    /// Documents excluded from the index, with reasons.
    pub documents_skipped: Vec<SkippedDocument>,
    /// Index entries appended by this call.
    pub chunks_indexed: usize,
}

/// A document excluded from indexing and why.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedDocument {
    /// Source filename.
    pub filename: String,
    /// Human-readable reason the document was skipped.
    pub reason: String,
}

/// The ingestion-and-retrieval service.
///
/// Ingestion runs load → extract → chunk → embed → persist per batch;
/// failures of individual documents are isolated while provider
/// failures abort the batch with the index untouched. The query path is
/// stateless per request: gate → retrieve → compose.
pub struct PatentAssistant {
    config: PipelineConfig,
    loader: DocumentLoader,
    chunker: Arc<dyn Chunker>,
    embedder: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn VectorStore>,
    gate: DomainGate,
    retriever: Retriever,
    composer: Option<AnswerComposer>,
}

impl PatentAssistant {
    /// Create a new [`PatentAssistantBuilder`].
    pub fn builder() -> PatentAssistantBuilder {
        PatentAssistantBuilder::default()
    }

    /// Return a reference to the pipeline configuration.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Return a reference to the vector store.
    pub fn store(&self) -> &Arc<dyn VectorStore> {
        &self.store
    }

    /// Ingest every supported document under `dir` into the index.
    ///
    /// Per-document failures (unreadable file, empty extraction) are
    /// recorded in the report and do not stop the batch. Embedding is
    /// batched; any embedding failure rejects the entire call before the
    /// store is touched, and the store append itself is atomic.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Load`] when the directory is unusable,
    /// [`RagError::EmbeddingUnavailable`] / [`RagError::ProviderTimeout`]
    /// when the provider fails, and store errors from the final append.
    pub async fn ingest(&self, dir: &Path) -> Result<IngestionReport> {
        info!(dir = %dir.display(), "starting ingestion");
        let documents = self.loader.load_directory(dir).await?;

        let mut report = IngestionReport::default();
        let mut chunks: Vec<Chunk> = Vec::new();

        for document in &documents {
            if let Some(message) = &document.error {
                report.documents_skipped.push(SkippedDocument {
                    filename: document.filename.clone(),
                    reason: message.clone(),
                });
                continue;
            }
            if document.text.trim().is_empty() {
                warn!(file = %document.filename, "no text extracted, skipping");
                report.documents_skipped.push(SkippedDocument {
                    filename: document.filename.clone(),
                    reason: "no text extracted".to_string(),
                });
                continue;
            }

            let document_chunks = self.chunker.chunk(document);
            info!(
                document.id = %document.id,
                chunk_count = document_chunks.len(),
                "chunked document"
            );
            report.documents_indexed += 1;
            chunks.extend(document_chunks);
        }

        if chunks.is_empty() {
            info!("nothing to index");
            return Ok(report);
        }

        // Embed all chunks before the store sees anything: a provider
        // failure here leaves the index exactly as it was.
        let mut embeddings: Vec<Vec<f32>> = Vec::with_capacity(chunks.len());
        for batch in chunks.chunks(EMBED_BATCH_SIZE) {
            let texts: Vec<&str> = batch.iter().map(|c| c.text.as_str()).collect();
            let batch_embeddings = self.embedder.embed_batch(&texts).await.map_err(|e| {
                error!(error = %e, "embedding failed, batch rejected");
                e
            })?;
            if batch_embeddings.len() != texts.len() {
                return Err(RagError::Pipeline(format!(
                    "embedding provider returned {} vectors for {} texts",
                    batch_embeddings.len(),
                    texts.len()
                )));
            }
            embeddings.extend(batch_embeddings);
        }

        let entries: Vec<IndexEntry> = chunks
            .into_iter()
            .zip(embeddings)
            .map(|(chunk, embedding)| IndexEntry { chunk, embedding })
            .collect();

        report.chunks_indexed = entries.len();
        self.store.append(entries).await?;

        info!(
            documents = report.documents_indexed,
            skipped = report.documents_skipped.len(),
            chunks = report.chunks_indexed,
            "ingestion complete"
        );
        Ok(report)
    }

    /// Answer a natural-language question.
    ///
    /// Out-of-domain questions are answered with the gate's fixed
    /// refusal string; no retrieval and no generation call happens for
    /// them. In-domain questions run retrieve → compose; an empty index
    /// still produces a generation call with empty context.
    ///
    /// # Errors
    ///
    /// Propagates embedding, store, and generation failures as
    /// structured errors, never a fabricated answer.
    pub async fn answer(&self, question: &str) -> Result<String> {
        if !self.gate.is_in_domain(question) {
            info!("question rejected as out of domain");
            return Ok(self.gate.refusal().to_string());
        }

        let composer = self.composer.as_ref().ok_or_else(|| {
            RagError::Config("no generation provider configured".to_string())
        })?;

        let results = self.retriever.retrieve(question).await?;
        composer.compose(question, &results).await
    }
}

/// Builder for constructing a [`PatentAssistant`].
///
/// The embedding provider and vector store are required. The generation
/// provider is only needed by [`answer`](PatentAssistant::answer) on
/// in-domain questions; ingestion-only processes may omit it. Config,
/// gate, chunker, and instructions fall back to defaults.
#[derive(Default)]
pub struct PatentAssistantBuilder {
    config: Option<PipelineConfig>,
    gate: Option<GateConfig>,
    chunker: Option<Arc<dyn Chunker>>,
    embedder: Option<Arc<dyn EmbeddingProvider>>,
    store: Option<Arc<dyn VectorStore>>,
    generator: Option<Arc<dyn GenerationProvider>>,
    instructions: Option<String>,
}

impl PatentAssistantBuilder {
    /// Set the pipeline configuration.
    pub fn config(mut self, config: PipelineConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the domain gate configuration.
    pub fn gate(mut self, gate: GateConfig) -> Self {
        self.gate = Some(gate);
        self
    }

    /// Override the chunking strategy.
    pub fn chunker(mut self, chunker: Arc<dyn Chunker>) -> Self {
        self.chunker = Some(chunker);
        self
    }

    /// Set the embedding provider.
    pub fn embedding_provider(mut self, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedder = Some(embedder);
        self
    }

    /// Set the vector store backend.
    pub fn vector_store(mut self, store: Arc<dyn VectorStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Set the generation provider used for answer composition.
    pub fn generation_provider(mut self, generator: Arc<dyn GenerationProvider>) -> Self {
        self.generator = Some(generator);
        self
    }

    /// Replace the persona instructions sent with generation calls.
    pub fn instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = Some(instructions.into());
        self
    }

    /// Build the [`PatentAssistant`], validating required fields.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`] when the embedding provider or
    /// vector store is missing, or when the gate patterns do not
    /// compile.
    pub fn build(self) -> Result<PatentAssistant> {
        let config = self.config.unwrap_or_default();
        let embedder = self
            .embedder
            .ok_or_else(|| RagError::Config("embedding_provider is required".to_string()))?;
        let store = self
            .store
            .ok_or_else(|| RagError::Config("vector_store is required".to_string()))?;
        let gate = DomainGate::new(self.gate.unwrap_or_default())?;
        let chunker = self
            .chunker
            .unwrap_or_else(|| Arc::new(OverlapChunker::new(config.chunk_size, config.chunk_overlap)));

        let composer = self.generator.map(|generator| {
            let composer = AnswerComposer::new(generator, config.max_context_chars);
            match self.instructions {
                Some(instructions) => composer.with_instructions(instructions),
                None => composer,
            }
        });

        let retriever = Retriever::new(embedder.clone(), store.clone(), config.top_k);
        let loader = DocumentLoader::new(config.max_file_size);

        Ok(PatentAssistant { config, loader, chunker, embedder, store, gate, retriever, composer })
    }
}
