//! Document chunking.
//!
//! This module provides the [`Chunker`] trait and [`OverlapChunker`], a
//! character-count splitter with configurable overlap that prefers
//! paragraph and sentence boundaries near the cut point.

use crate::document::{Chunk, Document};

/// A strategy for splitting documents into chunks.
///
/// Implementations produce ordered [`Chunk`]s that collectively cover the
/// document's full text. Embeddings are attached later by the pipeline.
pub trait Chunker: Send + Sync {
    /// Split a document into chunks.
    ///
    /// Returns an empty `Vec` if the document has empty text.
    fn chunk(&self, document: &Document) -> Vec<Chunk>;
}

/// Splits text by character count with overlap between consecutive chunks.
///
/// Every chunk after the first begins exactly `overlap` characters before
/// the end of its predecessor, so dropping each chunk's first `overlap`
/// characters and concatenating reconstructs the original text with no
/// loss. Cut points prefer the last paragraph break (`\n\n`), then the
/// last sentence break (`. `), found within `boundary_window` characters
/// of the size limit. When neither is present, or the natural cut would
/// not advance past the overlap region, the chunk is cut hard at
/// `chunk_size`. Text shorter than `chunk_size` yields a single chunk.
///
/// Sizes are counted in characters, never splitting a multi-byte scalar.
#[derive(Debug, Clone)]
pub struct OverlapChunker {
    chunk_size: usize,
    overlap: usize,
    boundary_window: usize,
}

impl OverlapChunker {
    /// Create a chunker with a boundary window of one fifth of `chunk_size`.
    ///
    /// Callers are expected to pass validated sizes (`overlap < chunk_size`,
    /// `chunk_size > 0`); see `PipelineConfig::builder`.
    pub fn new(chunk_size: usize, overlap: usize) -> Self {
        Self { chunk_size, overlap, boundary_window: chunk_size / 5 }
    }

    /// Override the window, in characters back from the size limit, that is
    /// searched for a natural break.
    pub fn with_boundary_window(mut self, window: usize) -> Self {
        self.boundary_window = window;
        self
    }

    /// Find a natural cut (in character positions) inside the trailing
    /// window of `[start, hard_end)`, preferring paragraph breaks.
    fn natural_cut(
        &self,
        text: &str,
        offsets: &[usize],
        start: usize,
        hard_end: usize,
    ) -> Option<usize> {
        let window_start = hard_end.saturating_sub(self.boundary_window).max(start);
        let window = &text[byte_at(offsets, text, window_start)..byte_at(offsets, text, hard_end)];

        // Both separators are ASCII, so byte arithmetic below stays on
        // character boundaries.
        let cut_byte = window
            .rfind("\n\n")
            .map(|p| p + 2)
            .or_else(|| window.rfind(". ").map(|p| p + 2))?;

        let absolute = byte_at(offsets, text, window_start) + cut_byte;
        Some(offsets.partition_point(|&o| o < absolute))
    }
}

/// Byte offset of the character at position `pos` (or the text length for
/// the one-past-the-end position).
fn byte_at(offsets: &[usize], text: &str, pos: usize) -> usize {
    if pos == offsets.len() { text.len() } else { offsets[pos] }
}

impl Chunker for OverlapChunker {
    fn chunk(&self, document: &Document) -> Vec<Chunk> {
        if document.text.is_empty() {
            return Vec::new();
        }

        let text = &document.text;
        let offsets: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
        let total = offsets.len();

        let mut chunks = Vec::new();
        let mut start = 0;
        let mut ordinal = 0;

        loop {
            let hard_end = (start + self.chunk_size).min(total);
            let mut end = hard_end;
            if hard_end < total {
                if let Some(cut) = self.natural_cut(text, &offsets, start, hard_end) {
                    // A cut that does not clear the overlap region would
                    // stall the walk; fall back to the hard cut instead.
                    if cut > start + self.overlap {
                        end = cut;
                    }
                }
            }

            chunks.push(Chunk {
                id: format!("{}_{ordinal}", document.id),
                document_id: document.id.clone(),
                ordinal,
                text: text[byte_at(&offsets, text, start)..byte_at(&offsets, text, end)]
                    .to_string(),
                metadata: document.metadata.clone(),
            });
            ordinal += 1;

            if end == total {
                break;
            }
            start = end - self.overlap;
        }

        chunks
    }
}
