//! Common test utilities for integration tests
//!
//! Shared fixtures and doubles for the pipeline, session and store tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tempfile::TempDir;

use mailrag::adapters::embeddings::HashingEmbedder;
use mailrag::adapters::history::{TableStore, TranscriptStore};
use mailrag::domain::models::{ChunkingConfig, Config, ConversationRecord};
use mailrag::domain::ports::{
    AnswerSynthesizer, ConversationStore, EmbeddingProvider, ProviderError, Synthesis,
    SynthesisRequest,
};
use mailrag::{Document, PipelineBuilder, RagError, RagResult, StoreKind};

/// Create a temporary directory for test isolation
pub fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Write a CSV corpus with a `text` column
pub fn write_corpus(dir: &Path, rows: &[&str]) -> PathBuf {
    let path = dir.join("emails.csv");
    let mut writer = csv::Writer::from_path(&path).expect("Failed to create corpus");
    writer.write_record(["subject", "text"]).unwrap();
    for (i, row) in rows.iter().enumerate() {
        writer.write_record([format!("subject {i}").as_str(), row]).unwrap();
    }
    writer.flush().unwrap();
    path
}

/// Config pointing every file at `dir`, with small chunks
pub fn test_config(dir: &Path) -> Config {
    let mut config = Config::default();
    config.corpus.path = dir.join("emails.csv");
    config.chunking = ChunkingConfig::new(50, 10, "\n");
    config.history.transcript_path = dir.join("history").join("chat_history.txt");
    config.history.table_path = dir.join("history").join("chat_history.csv");
    config
}

/// The real file stores configured for `config`
pub fn file_stores(config: &Config) -> (Arc<TranscriptStore>, Arc<TableStore>) {
    (
        Arc::new(TranscriptStore::new(&config.history.transcript_path)),
        Arc::new(TableStore::new(&config.history.table_path)),
    )
}

/// Builder with the offline hashing embedder and the given synthesizer
pub fn builder(config: Config, synthesizer: Arc<dyn AnswerSynthesizer>) -> PipelineBuilder {
    PipelineBuilder::new(config)
        .with_embedder(Arc::new(HashingEmbedder::new(128)))
        .with_synthesizer(synthesizer)
}

/// Documents built the same way the corpus loader numbers them
pub fn documents(rows: &[&str]) -> Vec<Document> {
    rows.iter()
        .enumerate()
        .map(|(i, text)| Document::from_row(i + 1, *text))
        .collect()
}

/// Synthesizer that echoes the query and records every request
#[derive(Default)]
pub struct EchoSynthesizer {
    pub requests: Mutex<Vec<(String, String)>>,
}

#[async_trait]
impl AnswerSynthesizer for EchoSynthesizer {
    fn name(&self) -> &'static str {
        "echo"
    }

    async fn generate(&self, request: SynthesisRequest<'_>) -> Result<Synthesis, ProviderError> {
        self.requests
            .lock()
            .unwrap()
            .push((request.query.to_string(), request.context.to_string()));
        Ok(Synthesis::text(format!("echo: {}", request.query)))
    }
}

/// Synthesizer that always fails
pub struct FailingSynthesizer;

#[async_trait]
impl AnswerSynthesizer for FailingSynthesizer {
    fn name(&self) -> &'static str {
        "failing"
    }

    async fn generate(&self, _request: SynthesisRequest<'_>) -> Result<Synthesis, ProviderError> {
        Err(ProviderError::Api {
            status: 500,
            message: "model unavailable".to_string(),
        })
    }
}

/// In-memory conversation store
pub struct MemoryStore {
    kind: StoreKind,
    pub records: Mutex<Vec<ConversationRecord>>,
}

impl MemoryStore {
    pub fn new(kind: StoreKind) -> Arc<Self> {
        Arc::new(Self {
            kind,
            records: Mutex::new(Vec::new()),
        })
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }
}

#[async_trait]
impl ConversationStore for MemoryStore {
    fn kind(&self) -> StoreKind {
        self.kind
    }

    async fn append(&self, record: &ConversationRecord) -> RagResult<()> {
        self.records.lock().unwrap().push(record.clone());
        Ok(())
    }
}

/// Hashing embedder that can be switched to fail after the index is built
pub struct SwitchableEmbedder {
    inner: HashingEmbedder,
    failing: AtomicBool,
}

impl SwitchableEmbedder {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            inner: HashingEmbedder::new(128),
            failing: AtomicBool::new(false),
        })
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl EmbeddingProvider for SwitchableEmbedder {
    fn name(&self) -> &'static str {
        "switchable"
    }

    fn dimension(&self) -> usize {
        self.inner.dimension()
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, ProviderError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(ProviderError::Network("connection refused".to_string()));
        }
        self.inner.embed(text).await
    }
}

/// Store whose every append fails
pub struct FailingStore {
    kind: StoreKind,
}

impl FailingStore {
    pub fn new(kind: StoreKind) -> Arc<Self> {
        Arc::new(Self { kind })
    }
}

#[async_trait]
impl ConversationStore for FailingStore {
    fn kind(&self) -> StoreKind {
        self.kind
    }

    async fn append(&self, _record: &ConversationRecord) -> RagResult<()> {
        Err(RagError::Persistence {
            store: self.kind,
            message: "disk full".to_string(),
        })
    }
}
