//! End-to-end pipeline tests: ingest a directory, answer questions.

mod common;

use std::collections::HashMap;
use std::sync::Arc;

use common::{MockEmbedding, MockGeneration};
use patent_rag::{
    DEFAULT_REFUSAL, DiskVectorStore, EmbeddingProvider, PatentAssistant, PipelineConfig, RagError,
    Retriever, VectorStore,
};

struct Fixture {
    assistant: PatentAssistant,
    embedder: Arc<MockEmbedding>,
    generator: Arc<MockGeneration>,
    store: Arc<DiskVectorStore>,
    _index_dir: tempfile::TempDir,
}

async fn fixture(config: PipelineConfig, embedder: MockEmbedding) -> Fixture {
    let index_dir = tempfile::tempdir().unwrap();
    let store = Arc::new(
        DiskVectorStore::open(index_dir.path().join("patents.jsonl")).await.unwrap(),
    );
    let embedder = Arc::new(embedder);
    let generator = Arc::new(MockGeneration::new());

    let assistant = PatentAssistant::builder()
        .config(config)
        .embedding_provider(embedder.clone())
        .vector_store(store.clone())
        .generation_provider(generator.clone())
        .build()
        .unwrap();

    Fixture { assistant, embedder, generator, store, _index_dir: index_dir }
}

fn write_docs(dir: &std::path::Path, docs: &[(&str, &str)]) {
    for (name, text) in docs {
        std::fs::write(dir.join(name), text).unwrap();
    }
}

#[tokio::test]
async fn ingests_documents_and_reports_counts() {
    let data_dir = tempfile::tempdir().unwrap();
    write_docs(
        data_dir.path(),
        &[
            ("US1111111.txt", "Title: Widget\n\nAbstract: a widget\n\nbody text about widgets"),
            ("US2222222.txt", "Title: Gadget\n\nAbstract: a gadget\n\nbody text about gadgets"),
        ],
    );

    let f = fixture(PipelineConfig::default(), MockEmbedding::new(16)).await;
    let report = f.assistant.ingest(data_dir.path()).await.unwrap();

    assert_eq!(report.documents_indexed, 2);
    assert!(report.documents_skipped.is_empty());
    assert!(report.chunks_indexed >= 2);
    assert_eq!(f.store.count().await.unwrap(), report.chunks_indexed);
}

#[tokio::test]
async fn chunks_inherit_only_their_own_documents_metadata() {
    let data_dir = tempfile::tempdir().unwrap();
    let body_a = format!("Title: Alpha Method\n\n{}", "alpha text. ".repeat(60));
    let body_b = format!("Title: Beta Method\n\n{}", "beta text. ".repeat(60));
    write_docs(data_dir.path(), &[("US1111111.txt", &body_a), ("US2222222.txt", &body_b)]);

    let config = PipelineConfig::builder().chunk_size(200).chunk_overlap(40).build().unwrap();
    let f = fixture(config, MockEmbedding::new(16)).await;
    let report = f.assistant.ingest(data_dir.path()).await.unwrap();

    // Entry count is the sum of the two documents' chunk counts.
    assert_eq!(f.store.count().await.unwrap(), report.chunks_indexed);

    // Pull everything back and verify no metadata crossed documents.
    let all = f.store.search(&f.embedder.embed("alpha").await.unwrap(), 1000).await.unwrap();
    assert_eq!(all.len(), report.chunks_indexed);
    let titles: HashMap<&str, &str> =
        HashMap::from([("US1111111", "Alpha Method"), ("US2222222", "Beta Method")]);
    for result in &all {
        let expected = titles[result.chunk.document_id.as_str()];
        assert_eq!(result.chunk.metadata.title, expected);
    }
}

#[tokio::test]
async fn failed_and_empty_documents_are_skipped_not_fatal() {
    let data_dir = tempfile::tempdir().unwrap();
    write_docs(data_dir.path(), &[("good.txt", "Title: Fine\n\nsome body"), ("empty.txt", "")]);
    std::fs::write(data_dir.path().join("bad.txt"), [0xff, 0xfe]).unwrap();

    let f = fixture(PipelineConfig::default(), MockEmbedding::new(16)).await;
    let report = f.assistant.ingest(data_dir.path()).await.unwrap();

    assert_eq!(report.documents_indexed, 1);
    assert_eq!(report.documents_skipped.len(), 2);
    let skipped: Vec<&str> =
        report.documents_skipped.iter().map(|s| s.filename.as_str()).collect();
    assert!(skipped.contains(&"bad.txt"));
    assert!(skipped.contains(&"empty.txt"));
}

#[tokio::test]
async fn embedding_failure_leaves_the_index_unchanged() {
    let data_dir = tempfile::tempdir().unwrap();
    // Small chunks force more than one embedding batch; the second
    // batch fails mid-ingestion.
    let long_text = format!("Title: Long\n\n{}", "sentence text here. ".repeat(200));
    write_docs(data_dir.path(), &[("US3333333.txt", &long_text)]);

    let config = PipelineConfig::builder().chunk_size(60).chunk_overlap(10).build().unwrap();
    let f = fixture(config, MockEmbedding::failing_after(16, 1)).await;

    let before = f.store.count().await.unwrap();
    let result = f.assistant.ingest(data_dir.path()).await;

    assert!(matches!(result, Err(RagError::EmbeddingUnavailable { .. })));
    assert_eq!(f.store.count().await.unwrap(), before);
}

#[tokio::test]
async fn out_of_domain_question_gets_refusal_without_any_provider_call() {
    let f = fixture(PipelineConfig::default(), MockEmbedding::new(16)).await;

    let answer = f.assistant.answer("What's the weather today?").await.unwrap();

    assert_eq!(answer, DEFAULT_REFUSAL);
    assert_eq!(f.generator.calls(), 0);
    assert_eq!(f.embedder.embed_calls(), 0);
}

#[tokio::test]
async fn in_domain_question_retrieves_and_generates() {
    let data_dir = tempfile::tempdir().unwrap();
    write_docs(
        data_dir.path(),
        &[("US1234567.txt", "Title: Pump\n\nClaims:\n1. A pump with a rotor.")],
    );

    let f = fixture(PipelineConfig::default(), MockEmbedding::new(16)).await;
    f.assistant.ingest(data_dir.path()).await.unwrap();

    let answer =
        f.assistant.answer("What are the patent claims for US1234567?").await.unwrap();

    assert_eq!(answer, "generated answer");
    assert_eq!(f.generator.calls(), 1);
    let (context, question) = f.generator.last_request.lock().unwrap().clone().unwrap();
    assert!(context.contains("pump"));
    assert_eq!(question, "What are the patent claims for US1234567?");
}

#[tokio::test]
async fn retriever_returns_exactly_top_k_ordered_results() {
    let data_dir = tempfile::tempdir().unwrap();
    write_docs(
        data_dir.path(),
        &[
            ("US1111111.txt", "Title: A\n\nfirst patent body"),
            ("US2222222.txt", "Title: B\n\nsecond patent body"),
            ("US3333333.txt", "Title: C\n\nthird patent body"),
            ("US4444444.txt", "Title: D\n\nfourth patent body"),
        ],
    );

    let f = fixture(PipelineConfig::default(), MockEmbedding::new(16)).await;
    f.assistant.ingest(data_dir.path()).await.unwrap();
    assert!(f.store.count().await.unwrap() >= 3);

    let retriever = Retriever::new(f.embedder.clone(), f.store.clone(), 3);
    let results = retriever.retrieve("first patent body").await.unwrap();

    assert_eq!(results.len(), 3);
    for pair in results.windows(2) {
        assert!(pair[0].score >= pair[1].score);
    }
}

#[tokio::test]
async fn empty_store_answers_with_empty_context() {
    let f = fixture(PipelineConfig::default(), MockEmbedding::new(16)).await;

    let answer = f.assistant.answer("How do I file a patent application?").await.unwrap();

    assert_eq!(answer, "generated answer");
    let (context, _) = f.generator.last_request.lock().unwrap().clone().unwrap();
    assert!(context.is_empty());
}

#[tokio::test]
async fn missing_generation_provider_is_a_config_error_only_when_needed() {
    let index_dir = tempfile::tempdir().unwrap();
    let store = Arc::new(
        DiskVectorStore::open(index_dir.path().join("patents.jsonl")).await.unwrap(),
    );
    let assistant = PatentAssistant::builder()
        .embedding_provider(Arc::new(MockEmbedding::new(16)))
        .vector_store(store)
        .build()
        .unwrap();

    // Out-of-domain still refuses without a provider.
    let refused = assistant.answer("What's the weather today?").await.unwrap();
    assert_eq!(refused, DEFAULT_REFUSAL);

    // In-domain needs one.
    let result = assistant.answer("How do patent claims work?").await;
    assert!(matches!(result, Err(RagError::Config(_))));
}
