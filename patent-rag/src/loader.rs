//! Text extraction from a directory of patent source files.

use std::path::Path;

use tracing::{info, warn};

use crate::document::Document;
use crate::error::{RagError, Result};

/// File extensions the loader will pick up.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["pdf", "txt", "md"];

/// Default maximum file size: 50 MiB.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 50 * 1024 * 1024;

/// Extracts raw text from the supported files in a documents directory.
///
/// Extraction failures are isolated per file: the failed file becomes a
/// [`Document`] with empty text and an error annotation, and the batch
/// continues. Only an unusable directory aborts the whole load.
#[derive(Debug, Clone)]
pub struct DocumentLoader {
    max_file_size: u64,
}

impl Default for DocumentLoader {
    fn default() -> Self {
        Self { max_file_size: DEFAULT_MAX_FILE_SIZE }
    }
}

impl DocumentLoader {
    /// Create a loader rejecting files larger than `max_file_size` bytes.
    pub fn new(max_file_size: u64) -> Self {
        Self { max_file_size }
    }

    /// Load every supported file in `dir`, in filename order.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Load`] when the directory itself cannot be
    /// read. Per-file failures are recorded on the returned documents
    /// instead.
    pub async fn load_directory(&self, dir: &Path) -> Result<Vec<Document>> {
        let mut entries = tokio::fs::read_dir(dir).await.map_err(|e| RagError::Load {
            file: dir.display().to_string(),
            message: e.to_string(),
        })?;

        let mut paths = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(|e| RagError::Load {
            file: dir.display().to_string(),
            message: e.to_string(),
        })? {
            let path = entry.path();
            let supported = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext.to_lowercase().as_str()));
            if path.is_file() && supported {
                paths.push(path);
            }
        }
        paths.sort();

        let mut documents = Vec::with_capacity(paths.len());
        for path in &paths {
            documents.push(self.load_file(path).await);
        }
        info!(dir = %dir.display(), documents = documents.len(), "loaded documents directory");
        Ok(documents)
    }

    /// Load one file; failures become an error-annotated document.
    async fn load_file(&self, path: &Path) -> Document {
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();

        match self.extract_text(path).await {
            Ok(text) => {
                info!(file = %filename, chars = text.chars().count(), "extracted text");
                Document::new(filename, text)
            }
            Err(e) => {
                warn!(file = %filename, error = %e, "skipping file, extraction failed");
                Document::failed(filename, e.to_string())
            }
        }
    }

    /// Extract raw text from a single supported file.
    async fn extract_text(&self, path: &Path) -> Result<String> {
        let load_err = |message: String| RagError::Load {
            file: path.display().to_string(),
            message,
        };

        let meta = tokio::fs::metadata(path).await.map_err(|e| load_err(e.to_string()))?;
        if meta.len() > self.max_file_size {
            return Err(load_err(format!(
                "file is {} bytes, limit is {}",
                meta.len(),
                self.max_file_size
            )));
        }

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("").to_lowercase();
        match ext.as_str() {
            "pdf" => {
                // pdf-extract is CPU-bound; keep it off the async runtime.
                let path = path.to_path_buf();
                let text = tokio::task::spawn_blocking(move || {
                    pdf_extract::extract_text(&path).map_err(|e| e.to_string())
                })
                .await
                .map_err(|e| load_err(e.to_string()))?
                .map_err(load_err)?;
                Ok(text)
            }
            _ => tokio::fs::read_to_string(path).await.map_err(|e| load_err(e.to_string())),
        }
    }
}
