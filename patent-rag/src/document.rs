//! Data types for documents, chunks, and search results.

use serde::{Deserialize, Serialize};

use crate::metadata::{self, PatentMetadata};

/// A source document with extracted text and patent metadata.
///
/// One `Document` per source file. Metadata is extracted at construction
/// time and the document is immutable afterwards. A failed load produces
/// a document with empty text and an `error` annotation instead of
/// propagating; the rest of the batch is unaffected.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    /// Unique identifier, derived from the source filename stem.
    pub id: String,
    /// Name of the source file this document was extracted from.
    pub filename: String,
    /// The full extracted text. Empty when the load failed.
    pub text: String,
    /// Structured patent fields extracted from text and filename.
    pub metadata: PatentMetadata,
    /// Set when text extraction failed for the source file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Document {
    /// Create a document from extracted text, deriving id and metadata.
    pub fn new(filename: impl Into<String>, text: impl Into<String>) -> Self {
        let filename = filename.into();
        let text = text.into();
        let metadata = metadata::extract(&text, &filename);
        Self { id: id_from_filename(&filename), filename, text, metadata, error: None }
    }

    /// Create a placeholder for a file whose text could not be extracted.
    pub fn failed(filename: impl Into<String>, message: impl Into<String>) -> Self {
        let filename = filename.into();
        Self {
            id: id_from_filename(&filename),
            metadata: metadata::extract("", &filename),
            filename,
            text: String::new(),
            error: Some(message.into()),
        }
    }
}

/// Derive a document id from a filename by dropping the extension.
fn id_from_filename(filename: &str) -> String {
    std::path::Path::new(filename)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(filename)
        .to_string()
}

/// A segment of a [`Document`], the unit of retrieval.
///
/// Chunks are ordered by `ordinal` and collectively cover the parent
/// document's full text with configured overlap between neighbours. The
/// parent is referenced by id only; metadata is inherited by value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Chunk {
    /// Unique identifier, `{document_id}_{ordinal}`.
    pub id: String,
    /// Id of the parent [`Document`].
    pub document_id: String,
    /// Position of this chunk within the parent document.
    pub ordinal: usize,
    /// The text span covered by this chunk.
    pub text: String,
    /// Patent metadata inherited from the parent document.
    pub metadata: PatentMetadata,
}

/// A chunk paired with its embedding, as persisted in the vector store.
///
/// Entries are append-only: re-ingestion adds new entries and never
/// mutates existing ones.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IndexEntry {
    /// The indexed chunk.
    pub chunk: Chunk,
    /// The embedding vector for the chunk's text.
    pub embedding: Vec<f32>,
}

/// A retrieved [`Chunk`] paired with a relevance score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// The retrieved chunk.
    pub chunk: Chunk,
    /// The similarity score (higher is more relevant).
    pub score: f32,
}
