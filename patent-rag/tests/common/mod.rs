//! Shared test doubles for integration tests.
#![allow(dead_code)]

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use patent_rag::{EmbeddingProvider, GenerationProvider, GenerationRequest, RagError, Result};

/// Deterministic hash-based embeddings, optionally failing after a set
/// number of batch calls.
pub struct MockEmbedding {
    dimensions: usize,
    fail_after_batches: Option<usize>,
    batch_calls: AtomicUsize,
    embed_calls: AtomicUsize,
}

impl MockEmbedding {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions,
            fail_after_batches: None,
            batch_calls: AtomicUsize::new(0),
            embed_calls: AtomicUsize::new(0),
        }
    }

    /// Succeed for `batches` batch calls, then report the provider down.
    pub fn failing_after(dimensions: usize, batches: usize) -> Self {
        Self { fail_after_batches: Some(batches), ..Self::new(dimensions) }
    }

    pub fn embed_calls(&self) -> usize {
        self.embed_calls.load(Ordering::SeqCst)
    }

    /// Normalised vector whose direction depends only on the text.
    fn vector(&self, text: &str) -> Vec<f32> {
        let hash = text.bytes().fold(0u64, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u64));
        let mut emb = vec![0.0f32; self.dimensions];
        for (i, v) in emb.iter_mut().enumerate() {
            *v = ((hash.wrapping_add(i as u64)) as f32).sin();
        }
        let norm: f32 = emb.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            emb.iter_mut().for_each(|x| *x /= norm);
        }
        emb
    }
}

#[async_trait]
impl EmbeddingProvider for MockEmbedding {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.embed_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.vector(text))
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let call = self.batch_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(limit) = self.fail_after_batches {
            if call >= limit {
                return Err(RagError::EmbeddingUnavailable {
                    provider: "mock".to_string(),
                    message: "provider down".to_string(),
                });
            }
        }
        Ok(texts.iter().map(|t| self.vector(t)).collect())
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

/// Generation double that records calls and echoes a canned answer.
pub struct MockGeneration {
    calls: AtomicUsize,
    pub last_request: Mutex<Option<(String, String)>>,
}

impl MockGeneration {
    pub fn new() -> Self {
        Self { calls: AtomicUsize::new(0), last_request: Mutex::new(None) }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GenerationProvider for MockGeneration {
    async fn generate(&self, request: GenerationRequest<'_>) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() =
            Some((request.context.to_string(), request.question.to_string()));
        Ok("generated answer".to_string())
    }
}
