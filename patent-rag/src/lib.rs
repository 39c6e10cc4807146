//! # patent-rag
//!
//! Ingestion-and-retrieval pipeline for the Patent Assistant.
//!
//! ## Overview
//!
//! The crate covers the full path from patent source files to a
//! generated answer:
//!
//! - [`DocumentLoader`] — raw text extraction from a documents directory
//! - [`metadata`] — rule-based patent field extraction
//! - [`OverlapChunker`] — overlapping retrieval units with natural cut points
//! - [`EmbeddingProvider`] / [`VectorStore`] — external-service and index
//!   abstractions, with [`DiskVectorStore`] as the persistent backend
//! - [`DomainGate`] — heuristic topic filter for incoming questions
//! - [`Retriever`] / [`AnswerComposer`] — top-k search and bounded prompt
//!   assembly against a [`GenerationProvider`]
//! - [`PatentAssistant`] — the service object exposing `ingest` and
//!   `answer` to a transport layer
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use patent_rag::{DiskVectorStore, PatentAssistant, PipelineConfig};
//!
//! let store = Arc::new(DiskVectorStore::open("index/patents.jsonl").await?);
//! let assistant = PatentAssistant::builder()
//!     .config(PipelineConfig::default())
//!     .embedding_provider(embedder)
//!     .vector_store(store)
//!     .generation_provider(generator)
//!     .build()?;
//!
//! let report = assistant.ingest(Path::new("data")).await?;
//! let answer = assistant.answer("What are the claims of US1234567?").await?;
//! ```

pub mod assistant;
pub mod chunking;
pub mod composer;
pub mod config;
pub mod disk;
pub mod document;
pub mod embedding;
pub mod error;
pub mod gate;
pub mod generation;
pub mod loader;
pub mod metadata;
pub mod retriever;
pub mod vectorstore;

pub use assistant::{IngestionReport, PatentAssistant, PatentAssistantBuilder, SkippedDocument};
pub use chunking::{Chunker, OverlapChunker};
pub use composer::{AnswerComposer, DEFAULT_INSTRUCTIONS};
pub use config::{PipelineConfig, PipelineConfigBuilder};
pub use disk::DiskVectorStore;
pub use document::{Chunk, Document, IndexEntry, SearchResult};
pub use embedding::EmbeddingProvider;
pub use error::{RagError, Result};
pub use gate::{DEFAULT_REFUSAL, DomainGate, GateConfig};
pub use generation::{GenerationProvider, GenerationRequest};
pub use loader::DocumentLoader;
pub use metadata::PatentMetadata;
pub use retriever::Retriever;
pub use vectorstore::VectorStore;
