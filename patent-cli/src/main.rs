//! Command-line launcher for the Patent Assistant.
//!
//! Wires configuration, provider clients, and the persistent index into
//! the core pipeline and exposes its two entry points as subcommands.
//! All domain logic lives in `patent-rag`.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use patent_model::{GroqGeneration, OllamaEmbedding};
use patent_rag::{DiskVectorStore, PatentAssistant, PipelineConfig};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "patent-assist", about = "Patent document Q&A over a local index")]
struct Cli {
    /// Path of the persistent vector index.
    #[arg(long, default_value = "index/patents.jsonl", global = true)]
    index: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Ingest every supported document in a directory into the index.
    Ingest {
        /// Directory containing patent documents (pdf, txt, md).
        data_dir: PathBuf,

        /// Maximum chunk size in characters.
        #[arg(long, default_value_t = 1000)]
        chunk_size: usize,

        /// Overlap between consecutive chunks in characters.
        #[arg(long, default_value_t = 100)]
        chunk_overlap: usize,
    },
    /// Ask a question against the index.
    Ask {
        /// The question to answer.
        question: String,

        /// Number of retrieved chunks used as context.
        #[arg(long, default_value_t = 3)]
        top_k: usize,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    // A corrupt index aborts here, before anything is served.
    let store = Arc::new(
        DiskVectorStore::open(&cli.index)
            .await
            .with_context(|| format!("opening index at {}", cli.index.display()))?,
    );

    let mut embedder = OllamaEmbedding::new()?;
    if let Ok(base_url) = std::env::var("OLLAMA_BASE_URL") {
        embedder = embedder.with_base_url(base_url);
    }
    let embedder = Arc::new(embedder);

    match cli.command {
        Command::Ingest { data_dir, chunk_size, chunk_overlap } => {
            let config = PipelineConfig::builder()
                .chunk_size(chunk_size)
                .chunk_overlap(chunk_overlap)
                .build()?;
            let assistant = PatentAssistant::builder()
                .config(config)
                .embedding_provider(embedder)
                .vector_store(store)
                .build()?;

            let report = assistant.ingest(&data_dir).await?;
            println!(
                "Indexed {} document(s) as {} chunk(s); skipped {}.",
                report.documents_indexed,
                report.chunks_indexed,
                report.documents_skipped.len()
            );
            for skipped in &report.documents_skipped {
                println!("  skipped {}: {}", skipped.filename, skipped.reason);
            }
        }
        Command::Ask { question, top_k } => {
            let config = PipelineConfig::builder().top_k(top_k).build()?;
            let assistant = PatentAssistant::builder()
                .config(config)
                .embedding_provider(embedder)
                .vector_store(store)
                .generation_provider(Arc::new(GroqGeneration::from_env()?))
                .build()?;

            let answer = assistant.answer(&question).await?;
            println!("{answer}");
        }
    }

    Ok(())
}
