//! # patent-model
//!
//! Provider clients for the Patent Assistant.
//!
//! ## Overview
//!
//! Implementations of the `patent-rag` provider traits:
//!
//! - [`OllamaEmbedding`] — `patent_rag::EmbeddingProvider` against a
//!   local Ollama embeddings endpoint (`nomic-embed-text` by default)
//! - [`GroqGeneration`] — `patent_rag::GenerationProvider` against
//!   Groq's OpenAI-compatible chat completions API
//!
//! Both clients carry an explicit request timeout; a timed-out call is
//! reported as `RagError::ProviderTimeout`, distinct from other
//! provider failures.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use patent_model::{GroqGeneration, OllamaEmbedding};
//!
//! let embedder = Arc::new(OllamaEmbedding::new()?);
//! let generator = Arc::new(GroqGeneration::from_env()?);
//! ```

pub mod groq;
pub mod ollama;

pub use groq::GroqGeneration;
pub use ollama::OllamaEmbedding;
