//! Error types for the `patent-rag` crate.

use thiserror::Error;

/// Errors that can occur in the ingestion and retrieval pipeline.
#[derive(Debug, Error)]
pub enum RagError {
    /// A source file could not be read or parsed.
    ///
    /// During directory ingestion this is recorded per document and the
    /// batch continues; it only surfaces as an `Err` when the documents
    /// directory itself is unusable.
    #[error("failed to load '{file}': {message}")]
    Load {
        /// The file that could not be loaded.
        file: String,
        /// A description of the failure.
        message: String,
    },

    /// The embedding provider call failed.
    ///
    /// The affected ingestion batch is aborted as a whole; no partial
    /// set of vectors is ever written to the index.
    #[error("embedding provider '{provider}' unavailable: {message}")]
    EmbeddingUnavailable {
        /// The embedding provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// An external provider call exceeded its configured timeout.
    #[error("provider '{provider}' timed out after {seconds}s")]
    ProviderTimeout {
        /// The provider that timed out.
        provider: String,
        /// The configured timeout in seconds.
        seconds: u64,
    },

    /// An error occurred in the vector store backend.
    #[error("vector store error: {0}")]
    Store(String),

    /// The persisted index exists but cannot be reconstructed.
    ///
    /// Fatal at startup: queries must not be served against an
    /// unverified store.
    #[error("vector index at '{path}' is corrupt: {message}")]
    StoreCorrupt {
        /// Path of the index file.
        path: String,
        /// A description of what failed to parse.
        message: String,
    },

    /// The generation provider call failed during answer composition.
    #[error("generation provider '{provider}' failed: {message}")]
    Generation {
        /// The generation provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// A configuration validation error.
    #[error("configuration error: {0}")]
    Config(String),

    /// An error in pipeline orchestration.
    #[error("pipeline error: {0}")]
    Pipeline(String),
}

/// A convenience result type for pipeline operations.
pub type Result<T> = std::result::Result<T, RagError>;
