//! Vector store trait for persisting and searching index entries.

use async_trait::async_trait;

use crate::document::{IndexEntry, SearchResult};
use crate::error::Result;

/// A persistent nearest-neighbour index over [`IndexEntry`] values.
///
/// The store is append-only: entries are immutable once persisted and
/// re-ingestion adds new entries rather than mutating existing ones.
/// Writes are serialized; searches may run concurrently with an
/// in-progress append and observe either the pre- or post-append state,
/// never a partially written entry.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Append entries to the index.
    ///
    /// Atomic: on failure no entry is applied, in memory or on disk.
    async fn append(&self, entries: Vec<IndexEntry>) -> Result<()>;

    /// Return the `top_k` entries most similar to `embedding`, ordered by
    /// non-increasing score with ties broken by insertion order.
    async fn search(&self, embedding: &[f32], top_k: usize) -> Result<Vec<SearchResult>>;

    /// Number of entries currently in the index.
    async fn count(&self) -> Result<usize>;
}
