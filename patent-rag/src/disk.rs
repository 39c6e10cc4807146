//! Disk-backed vector store using cosine similarity.
//!
//! [`DiskVectorStore`] keeps the full index in memory behind a
//! `tokio::sync::RwLock` and persists it as JSON lines, one
//! [`IndexEntry`] per line. An empty or absent index file is a valid
//! fresh store; a file that exists but cannot be parsed is
//! [`RagError::StoreCorrupt`] and must stop startup. The store never
//! silently serves queries against unreadable data.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::document::{IndexEntry, SearchResult};
use crate::error::{RagError, Result};
use crate::vectorstore::VectorStore;

/// A persistent [`VectorStore`] backed by a JSON-lines file.
///
/// Appends rewrite the file to a temporary sibling and rename it into
/// place before the in-memory state is touched, so a failed append
/// leaves both representations unchanged. The embedding dimensionality
/// is fixed by the first appended entry and enforced afterwards.
#[derive(Debug)]
pub struct DiskVectorStore {
    path: PathBuf,
    inner: RwLock<StoreState>,
}

#[derive(Debug, Default)]
struct StoreState {
    entries: Vec<IndexEntry>,
    dimensions: Option<usize>,
}

impl DiskVectorStore {
    /// Open the store at `path`, reconstructing in-memory state from the
    /// persisted form.
    ///
    /// A missing file means "no data yet" and opens an empty store.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::StoreCorrupt`] when the file exists but any
    /// line fails to parse or the entries disagree on dimensionality;
    /// fatal at startup.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let state = read_state(&path).await?;
        info!(path = %path.display(), entries = state.entries.len(), "opened vector index");
        Ok(Self { path, inner: RwLock::new(state) })
    }

    /// Discard in-memory state and reconstruct it from disk.
    ///
    /// Same fresh-vs-corrupt semantics as [`open`](DiskVectorStore::open).
    pub async fn reload(&self) -> Result<()> {
        let state = read_state(&self.path).await?;
        let mut inner = self.inner.write().await;
        info!(path = %self.path.display(), entries = state.entries.len(), "reloaded vector index");
        *inner = state;
        Ok(())
    }
}

/// Read and validate the persisted index. Missing file → empty state.
async fn read_state(path: &Path) -> Result<StoreState> {
    let raw = match tokio::fs::read_to_string(path).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "no index file yet, starting empty");
            return Ok(StoreState::default());
        }
        Err(e) => {
            return Err(RagError::Store(format!("cannot read '{}': {e}", path.display())));
        }
    };

    let mut state = StoreState::default();
    for (lineno, line) in raw.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let entry: IndexEntry =
            serde_json::from_str(line).map_err(|e| RagError::StoreCorrupt {
                path: path.display().to_string(),
                message: format!("line {}: {e}", lineno + 1),
            })?;
        match state.dimensions {
            None => state.dimensions = Some(entry.embedding.len()),
            Some(d) if d != entry.embedding.len() => {
                return Err(RagError::StoreCorrupt {
                    path: path.display().to_string(),
                    message: format!(
                        "line {}: embedding has {} dimensions, expected {d}",
                        lineno + 1,
                        entry.embedding.len()
                    ),
                });
            }
            Some(_) => {}
        }
        state.entries.push(entry);
    }
    Ok(state)
}

/// Cosine similarity between two vectors of equal length.
///
/// Returns 0.0 if either vector has zero magnitude.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[async_trait]
impl VectorStore for DiskVectorStore {
    async fn append(&self, entries: Vec<IndexEntry>) -> Result<()> {
        if entries.is_empty() {
            return Ok(());
        }

        let mut state = self.inner.write().await;

        let dimensions = state.dimensions.unwrap_or(entries[0].embedding.len());
        for entry in &entries {
            if entry.embedding.len() != dimensions {
                return Err(RagError::Store(format!(
                    "entry '{}' has {} dimensions, index expects {dimensions}",
                    entry.chunk.id,
                    entry.embedding.len()
                )));
            }
        }

        // Serialize the complete new state first so a serialization
        // failure cannot leave a half-written file.
        let mut buf = String::new();
        for entry in state.entries.iter().chain(entries.iter()) {
            let line = serde_json::to_string(entry)
                .map_err(|e| RagError::Store(format!("cannot serialize entry: {e}")))?;
            buf.push_str(&line);
            buf.push('\n');
        }

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await.map_err(|e| {
                    RagError::Store(format!("cannot create '{}': {e}", parent.display()))
                })?;
            }
        }

        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, &buf)
            .await
            .map_err(|e| RagError::Store(format!("cannot write '{}': {e}", tmp.display())))?;
        tokio::fs::rename(&tmp, &self.path).await.map_err(|e| {
            RagError::Store(format!("cannot replace '{}': {e}", self.path.display()))
        })?;

        let appended = entries.len();
        state.dimensions = Some(dimensions);
        state.entries.extend(entries);
        debug!(appended, total = state.entries.len(), "appended index entries");
        Ok(())
    }

    async fn search(&self, embedding: &[f32], top_k: usize) -> Result<Vec<SearchResult>> {
        let state = self.inner.read().await;

        if let Some(dimensions) = state.dimensions {
            if embedding.len() != dimensions {
                return Err(RagError::Store(format!(
                    "query embedding has {} dimensions, index expects {dimensions}",
                    embedding.len()
                )));
            }
        }

        let mut scored: Vec<SearchResult> = state
            .entries
            .iter()
            .map(|entry| SearchResult {
                chunk: entry.chunk.clone(),
                score: cosine_similarity(&entry.embedding, embedding),
            })
            .collect();

        // Stable sort: equal scores keep insertion order.
        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(top_k);
        Ok(scored)
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.inner.read().await.entries.len())
    }
}
