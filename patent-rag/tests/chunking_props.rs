//! Property tests for chunk coverage and overlap.

use patent_rag::{Chunker, Document, OverlapChunker};
use proptest::prelude::*;

/// Rebuild a document from its chunks by dropping each chunk's leading
/// overlap region.
fn reconstruct(chunks: &[patent_rag::Chunk], overlap: usize) -> String {
    let mut out = String::new();
    for (i, chunk) in chunks.iter().enumerate() {
        if i == 0 {
            out.push_str(&chunk.text);
        } else {
            out.extend(chunk.text.chars().skip(overlap));
        }
    }
    out
}

/// chunk_size in a workable range plus a strictly smaller overlap.
fn arb_sizes() -> impl Strategy<Value = (usize, usize)> {
    (20usize..200).prop_flat_map(|size| (Just(size), 0..size))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Dropping each overlap region and concatenating reconstructs the
    /// document exactly: chunking never loses or duplicates text.
    #[test]
    fn chunks_reconstruct_original_text(
        text in "[a-zé Σ.\\n]{0,800}",
        (chunk_size, overlap) in arb_sizes(),
    ) {
        let document = Document::new("prop.txt", text.clone());
        let chunks = OverlapChunker::new(chunk_size, overlap).chunk(&document);

        if text.is_empty() {
            prop_assert!(chunks.is_empty());
        } else {
            prop_assert_eq!(reconstruct(&chunks, overlap), text);
        }
    }

    /// The suffix of each chunk equals the prefix of its successor for
    /// the configured overlap length.
    #[test]
    fn consecutive_chunks_share_the_overlap_region(
        text in "[a-z .\\n]{1,800}",
        (chunk_size, overlap) in arb_sizes(),
    ) {
        let document = Document::new("prop.txt", text);
        let chunks = OverlapChunker::new(chunk_size, overlap).chunk(&document);

        for pair in chunks.windows(2) {
            let first: Vec<char> = pair[0].text.chars().collect();
            let suffix: String = first[first.len() - overlap..].iter().collect();
            let prefix: String = pair[1].text.chars().take(overlap).collect();
            prop_assert_eq!(suffix, prefix);
        }
    }

    /// No chunk exceeds the configured size, and only the final chunk of
    /// a document may be produced by exhausting the text.
    #[test]
    fn chunks_respect_the_size_limit(
        text in "[a-z .\\n]{1,800}",
        (chunk_size, overlap) in arb_sizes(),
    ) {
        let document = Document::new("prop.txt", text);
        let chunks = OverlapChunker::new(chunk_size, overlap).chunk(&document);

        prop_assert!(!chunks.is_empty());
        for chunk in &chunks {
            prop_assert!(chunk.text.chars().count() <= chunk_size);
        }
        for (i, chunk) in chunks.iter().enumerate() {
            prop_assert_eq!(chunk.ordinal, i);
        }
    }
}
