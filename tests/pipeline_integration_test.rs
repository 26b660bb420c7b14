//! End-to-end pipeline tests against real CSV corpora and history files

mod common;

use std::sync::Arc;

use common::{
    builder, file_stores, test_config, write_corpus, EchoSynthesizer, FailingStore,
    FailingSynthesizer, MemoryStore, SwitchableEmbedder,
};
use mailrag::adapters::synthesizers::ExtractiveSynthesizer;
use mailrag::domain::models::PipelineState;
use mailrag::domain::ports::ConversationStore;
use mailrag::{PipelineBuilder, RagError, StoreKind};

const REFUND_CORPUS: [&str; 2] = ["Please refund order 123", "Order 123 was refunded on May 1"];

#[tokio::test]
async fn test_refund_query_retrieves_both_emails_and_logs_verbatim_query() {
    let dir = common::temp_dir();
    write_corpus(dir.path(), &REFUND_CORPUS);
    let config = test_config(dir.path());
    let (transcript, table) = file_stores(&config);

    let mut pipeline = builder(config, Arc::new(ExtractiveSynthesizer::default()))
        .with_stores(vec![transcript.clone() as Arc<dyn ConversationStore>, table.clone()])
        .build()
        .await
        .unwrap();

    assert_eq!(pipeline.stats().documents, 2);
    assert_eq!(pipeline.stats().chunks, 2);

    let turn = pipeline.answer("  Was order 123 refunded?\n").await.unwrap();

    let mut retrieved: Vec<&str> = turn.scores.iter().map(|s| s.chunk.content.as_str()).collect();
    retrieved.sort_unstable();
    assert_eq!(retrieved, vec!["Order 123 was refunded on May 1", "Please refund order 123"]);
    assert!(turn.persistence.is_complete());

    let rows = table.load().await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].query, "Was order 123 refunded?");
    assert_eq!(rows[0].response, turn.answer.text);

    let text = std::fs::read_to_string(transcript.path()).unwrap();
    assert_eq!(
        text,
        format!("Q: Was order 123 refunded?\nA: {}\n\n", turn.answer.text)
    );
}

#[tokio::test]
async fn test_each_answer_appends_one_entry_per_store() {
    let dir = common::temp_dir();
    write_corpus(dir.path(), &REFUND_CORPUS);
    let config = test_config(dir.path());
    let (transcript, table) = file_stores(&config);

    let mut pipeline = builder(config, Arc::new(EchoSynthesizer::default()))
        .with_stores(vec![transcript.clone() as Arc<dyn ConversationStore>, table.clone()])
        .build()
        .await
        .unwrap();

    for query in ["first question", "second question", "third question"] {
        pipeline.answer(query).await.unwrap();
    }

    let rows = table.load().await.unwrap();
    let queries: Vec<&str> = rows.iter().map(|r| r.query.as_str()).collect();
    assert_eq!(queries, vec!["first question", "second question", "third question"]);
    assert_eq!(rows[1].response, "echo: second question");

    let text = std::fs::read_to_string(transcript.path()).unwrap();
    assert_eq!(text.matches("Q: ").count(), 3);
    assert!(text.contains("Q: third question\nA: echo: third question\n\n"));

    let table_text = std::fs::read_to_string(table.path()).unwrap();
    assert_eq!(table_text.lines().filter(|l| l.starts_with("Timestamp")).count(), 1);
}

#[tokio::test]
async fn test_synthesis_failure_writes_nothing() {
    let dir = common::temp_dir();
    write_corpus(dir.path(), &REFUND_CORPUS);
    let config = test_config(dir.path());
    let (transcript, table) = file_stores(&config);

    let mut pipeline = builder(config, Arc::new(FailingSynthesizer))
        .with_stores(vec![transcript.clone() as Arc<dyn ConversationStore>, table.clone()])
        .build()
        .await
        .unwrap();

    let result = pipeline.answer("Was order 123 refunded?").await;

    assert!(matches!(result, Err(RagError::Synthesis(_))));
    assert_eq!(pipeline.state(), PipelineState::Ready);
    assert!(!transcript.path().exists());
    assert!(table.load().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_synthesizer_receives_trimmed_query_and_joined_context() {
    let dir = common::temp_dir();
    write_corpus(dir.path(), &REFUND_CORPUS);
    let mut config = test_config(dir.path());
    config.retrieval.top_k = 1;
    let synthesizer = Arc::new(EchoSynthesizer::default());

    let mut pipeline = builder(config, synthesizer.clone())
        .with_stores(Vec::new())
        .build()
        .await
        .unwrap();

    let turn = pipeline.answer("\trefund order 123  ").await.unwrap();
    assert_eq!(turn.scores.len(), 1);

    let requests = synthesizer.requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].0, "refund order 123");
    assert_eq!(requests[0].1, turn.scores[0].chunk.content);
}

#[tokio::test]
async fn test_blank_query_is_rejected_without_logging() {
    let dir = common::temp_dir();
    write_corpus(dir.path(), &REFUND_CORPUS);
    let config = test_config(dir.path());
    let (transcript, table) = file_stores(&config);

    let mut pipeline = builder(config, Arc::new(EchoSynthesizer::default()))
        .with_stores(vec![transcript.clone() as Arc<dyn ConversationStore>, table])
        .build()
        .await
        .unwrap();

    assert!(matches!(pipeline.answer("   ").await, Err(RagError::EmptyQuery)));
    assert!(!transcript.path().exists());
}

#[tokio::test]
async fn test_corpus_of_missing_text_fails_startup() {
    let dir = common::temp_dir();
    write_corpus(dir.path(), &["", "   "]);
    let config = test_config(dir.path());

    let result = builder(config, Arc::new(EchoSynthesizer::default()))
        .with_stores(Vec::new())
        .build()
        .await;

    assert!(matches!(result, Err(RagError::CorpusLoad(_))));
}

#[tokio::test]
async fn test_missing_text_column_is_a_configuration_error() {
    let dir = common::temp_dir();
    write_corpus(dir.path(), &REFUND_CORPUS);
    let mut config = test_config(dir.path());
    config.corpus.text_column = "body".to_string();

    let result = builder(config, Arc::new(EchoSynthesizer::default()))
        .with_stores(Vec::new())
        .build()
        .await;

    assert!(matches!(result, Err(RagError::Configuration(_))));
}

#[tokio::test]
async fn test_missing_corpus_file_fails_startup() {
    let dir = common::temp_dir();
    let config = test_config(dir.path());

    let result = builder(config, Arc::new(EchoSynthesizer::default()))
        .with_stores(Vec::new())
        .build()
        .await;

    assert!(matches!(result, Err(RagError::CorpusLoad(_))));
}

#[tokio::test]
async fn test_query_embedding_failure_is_retrieval_error_and_recoverable() {
    let dir = common::temp_dir();
    write_corpus(dir.path(), &REFUND_CORPUS);
    let config = test_config(dir.path());
    let embedder = SwitchableEmbedder::new();
    let store = MemoryStore::new(StoreKind::Transcript);

    let mut pipeline = PipelineBuilder::new(config)
        .with_embedder(embedder.clone())
        .with_synthesizer(Arc::new(EchoSynthesizer::default()))
        .with_stores(vec![store.clone() as Arc<dyn ConversationStore>])
        .build()
        .await
        .unwrap();

    embedder.set_failing(true);
    let result = pipeline.answer("Was order 123 refunded?").await;

    assert!(matches!(result, Err(RagError::Retrieval(_))));
    assert_eq!(pipeline.state(), PipelineState::Ready);
    assert_eq!(store.len(), 0);

    embedder.set_failing(false);
    let turn = pipeline.answer("Was order 123 refunded?").await.unwrap();

    assert_eq!(turn.scores.len(), 2);
    assert_eq!(pipeline.state(), PipelineState::Ready);
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn test_failing_table_store_still_delivers_answer_and_transcript() {
    let dir = common::temp_dir();
    write_corpus(dir.path(), &REFUND_CORPUS);
    let config = test_config(dir.path());
    let (transcript, _) = file_stores(&config);

    let mut pipeline = builder(config, Arc::new(EchoSynthesizer::default()))
        .with_stores(vec![
            transcript.clone() as Arc<dyn ConversationStore>,
            FailingStore::new(StoreKind::Table),
        ])
        .build()
        .await
        .unwrap();

    let turn = pipeline.answer("Was order 123 refunded?").await.unwrap();

    assert_eq!(turn.answer.text, "echo: Was order 123 refunded?");
    assert!(!turn.persistence.is_complete());
    assert_eq!(turn.persistence.failed_stores(), vec![StoreKind::Table]);
    assert!(matches!(
        turn.persistence.failures(),
        [RagError::Persistence { store: StoreKind::Table, .. }]
    ));

    let text = std::fs::read_to_string(transcript.path()).unwrap();
    assert_eq!(text, "Q: Was order 123 refunded?\nA: echo: Was order 123 refunded?\n\n");
}
