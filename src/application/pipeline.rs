//! Question-answering pipeline
//!
//! [`PipelineBuilder`] owns startup: validate, load, chunk, index. It either
//! yields a ready [`Pipeline`] or an error; a half-built pipeline never
//! escapes. [`Pipeline::answer`] serves one query at a time.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, error, info, instrument};

use crate::adapters::factory;
use crate::domain::errors::{RagError, RagResult};
use crate::domain::models::{Answer, Chunk, Config, Document, PipelineState, ScoredChunk};
use crate::domain::ports::{AnswerSynthesizer, ConversationStore, EmbeddingProvider, SynthesisRequest};
use crate::infrastructure::corpus::CsvCorpusLoader;
use crate::infrastructure::retry::RetryPolicy;
use crate::services::{Chunker, ConversationLogger, PersistenceReport, Retriever, VectorIndex};

/// Separator placed between retrieved chunks in the synthesis context
pub const CONTEXT_SEPARATOR: &str = "\n\n";

fn log_transition(from: PipelineState, to: PipelineState) {
    debug_assert!(from.can_transition_to(to), "illegal transition {from} -> {to}");
    if to == PipelineState::Failed {
        error!(%from, %to, "pipeline state transition");
    } else {
        debug!(%from, %to, "pipeline state transition");
    }
}

/// Corpus and index sizes, fixed at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexStats {
    pub documents: usize,
    pub chunks: usize,
    pub dimension: usize,
}

/// Builds a [`Pipeline`] from configuration
///
/// Backends and stores default to what the config names; tests and embedders
/// of the library can inject their own.
pub struct PipelineBuilder {
    config: Config,
    embedder: Option<Arc<dyn EmbeddingProvider>>,
    synthesizer: Option<Arc<dyn AnswerSynthesizer>>,
    stores: Option<Vec<Arc<dyn ConversationStore>>>,
    documents: Option<Vec<Document>>,
}

impl PipelineBuilder {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            embedder: None,
            synthesizer: None,
            stores: None,
            documents: None,
        }
    }

    /// Use this embedder instead of the configured one
    pub fn with_embedder(mut self, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedder = Some(embedder);
        self
    }

    /// Use this synthesizer instead of the configured one
    pub fn with_synthesizer(mut self, synthesizer: Arc<dyn AnswerSynthesizer>) -> Self {
        self.synthesizer = Some(synthesizer);
        self
    }

    /// Use these conversation stores instead of the configured files
    pub fn with_stores(mut self, stores: Vec<Arc<dyn ConversationStore>>) -> Self {
        self.stores = Some(stores);
        self
    }

    /// Use an in-memory corpus instead of reading the configured CSV
    ///
    /// Blank documents are dropped as they would be from the file.
    pub fn with_documents(mut self, documents: Vec<Document>) -> Self {
        self.documents = Some(documents);
        self
    }

    /// Build the pipeline
    pub async fn build(self) -> RagResult<Pipeline> {
        self.build_with_progress(|_, _| {}).await
    }

    /// Build the pipeline, reporting `(embedded, total)` chunks during indexing
    pub async fn build_with_progress<F>(self, on_progress: F) -> RagResult<Pipeline>
    where
        F: FnMut(usize, usize) + Send,
    {
        log_transition(PipelineState::Uninitialized, PipelineState::Loading);
        let started = Instant::now();

        match self.load(on_progress).await {
            Ok(pipeline) => {
                log_transition(PipelineState::Loading, PipelineState::Ready);
                info!(
                    documents = pipeline.stats.documents,
                    chunks = pipeline.stats.chunks,
                    elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
                    "pipeline ready"
                );
                Ok(pipeline)
            }
            Err(err) => {
                log_transition(PipelineState::Loading, PipelineState::Failed);
                error!(error = %err, "pipeline initialization failed");
                Err(err)
            }
        }
    }

    async fn load<F>(self, on_progress: F) -> RagResult<Pipeline>
    where
        F: FnMut(usize, usize) + Send,
    {
        let chunker = Chunker::new(self.config.chunking.clone())?;

        let policy = RetryPolicy::from_config(&self.config.retry);
        let embedder = match self.embedder {
            Some(embedder) => embedder,
            None => factory::build_embedder(&self.config.embedding, &policy)?,
        };
        let synthesizer = match self.synthesizer {
            Some(synthesizer) => synthesizer,
            None => factory::build_synthesizer(&self.config.synthesis, &policy)?,
        };
        let stores = self
            .stores
            .unwrap_or_else(|| factory::build_stores(&self.config.history));

        let documents = match self.documents {
            Some(documents) => {
                let kept: Vec<Document> = documents.into_iter().filter(|d| !d.is_blank()).collect();
                if kept.is_empty() {
                    return Err(RagError::CorpusLoad("corpus contains no non-empty documents".into()));
                }
                kept
            }
            None => CsvCorpusLoader::from_config(&self.config.corpus).load().await?,
        };

        let chunks = chunker.split_all(&documents);
        if chunks.is_empty() {
            return Err(RagError::CorpusLoad("corpus produced no chunks".into()));
        }
        info!(documents = documents.len(), chunks = chunks.len(), "corpus chunked");

        let index = VectorIndex::build_with_progress(
            chunks,
            embedder.as_ref(),
            self.config.retrieval.metric,
            on_progress,
        )
        .await?;

        let stats = IndexStats {
            documents: documents.len(),
            chunks: index.len(),
            dimension: index.dimension(),
        };

        Ok(Pipeline {
            state: PipelineState::Ready,
            retriever: Retriever::new(embedder, index, self.config.retrieval.top_k),
            synthesizer,
            logger: ConversationLogger::new(stores),
            stats,
        })
    }
}

/// Result of one successfully answered query
#[derive(Debug)]
pub struct Turn {
    /// The answer and its sources
    pub answer: Answer,

    /// Every retrieved chunk with its similarity score, best first
    pub scores: Vec<ScoredChunk>,

    /// Outcome of writing the turn to the conversation stores
    pub persistence: PersistenceReport,
}

/// A ready question-answering pipeline
pub struct Pipeline {
    state: PipelineState,
    retriever: Retriever,
    synthesizer: Arc<dyn AnswerSynthesizer>,
    logger: ConversationLogger,
    stats: IndexStats,
}

impl Pipeline {
    /// Current lifecycle state; `Ready` between queries
    pub fn state(&self) -> PipelineState {
        self.state
    }

    pub fn stats(&self) -> IndexStats {
        self.stats
    }

    /// Answer `query` from the indexed corpus and log the turn
    ///
    /// Retrieval and synthesis failures leave the pipeline `Ready` and write
    /// nothing to the conversation stores.
    #[instrument(skip_all, fields(query_len = query.len()))]
    pub async fn answer(&mut self, query: &str) -> RagResult<Turn> {
        let query = query.trim();
        if query.is_empty() {
            return Err(RagError::EmptyQuery);
        }

        self.set_state(PipelineState::Answering);
        let started = Instant::now();
        let result = self.answer_inner(query).await;
        self.set_state(PipelineState::Ready);

        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        match &result {
            Ok(turn) => info!(
                k = self.retriever.top_k(),
                hits = turn.scores.len(),
                sources = turn.answer.sources.len(),
                persisted = turn.persistence.is_complete(),
                elapsed_ms,
                "query answered"
            ),
            Err(err) => error!(error = %err, elapsed_ms, "query failed"),
        }

        result
    }

    async fn answer_inner(&self, query: &str) -> RagResult<Turn> {
        debug!(query, "answering");

        let scores = self.retriever.retrieve(query).await?;
        let chunks: Vec<Chunk> = scores.iter().map(|s| s.chunk.clone()).collect();
        let context = chunks
            .iter()
            .map(|c| c.content.as_str())
            .collect::<Vec<_>>()
            .join(CONTEXT_SEPARATOR);

        let synthesis = self
            .synthesizer
            .generate(SynthesisRequest {
                query,
                context: &context,
                chunks: &chunks,
            })
            .await
            .map_err(|e| RagError::Synthesis(format!("{} backend: {e}", self.synthesizer.name())))?;

        debug!(answer = %synthesis.text, "synthesized");

        let sources = match synthesis.attribution {
            Some(indices) => indices
                .into_iter()
                .filter_map(|i| chunks.get(i).cloned())
                .collect(),
            None => chunks,
        };

        let persistence = self.logger.record(query, &synthesis.text).await;

        Ok(Turn {
            answer: Answer {
                query: query.to_string(),
                text: synthesis.text,
                sources,
            },
            scores,
            persistence,
        })
    }

    fn set_state(&mut self, next: PipelineState) {
        log_transition(self.state, next);
        self.state = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::embeddings::HashingEmbedder;
    use crate::adapters::synthesizers::ExtractiveSynthesizer;
    use crate::domain::models::ChunkingConfig;

    fn config() -> Config {
        let mut config = Config::default();
        config.chunking = ChunkingConfig::new(80, 10, "\n");
        config.retrieval.top_k = 2;
        config
    }

    async fn pipeline(docs: Vec<Document>) -> RagResult<Pipeline> {
        PipelineBuilder::new(config())
            .with_embedder(Arc::new(HashingEmbedder::new(64)))
            .with_synthesizer(Arc::new(ExtractiveSynthesizer::default()))
            .with_stores(Vec::new())
            .with_documents(docs)
            .build()
            .await
    }

    #[tokio::test]
    async fn test_build_reports_stats_and_is_ready() {
        let pipeline = pipeline(vec![
            Document::from_row(1, "The offsite is on Friday."),
            Document::from_row(2, "   "),
            Document::from_row(3, "Refunds are processed in five days."),
        ])
        .await
        .unwrap();

        assert_eq!(pipeline.state(), PipelineState::Ready);
        assert_eq!(pipeline.stats().documents, 2);
        assert_eq!(pipeline.stats().chunks, 2);
        assert_eq!(pipeline.stats().dimension, 64);
    }

    #[tokio::test]
    async fn test_blank_corpus_fails_with_corpus_load() {
        let result = pipeline(vec![Document::from_row(1, " \n ")]).await;
        assert!(matches!(result, Err(RagError::CorpusLoad(_))));
    }

    #[tokio::test]
    async fn test_invalid_chunking_fails_before_loading() {
        let mut config = config();
        config.chunking = ChunkingConfig::new(10, 10, "\n");
        // No corpus file exists at the default path; chunking must fail first.
        let result = PipelineBuilder::new(config).with_stores(Vec::new()).build().await;
        assert!(matches!(result, Err(RagError::Configuration(_))));
    }

    #[tokio::test]
    async fn test_empty_query_is_rejected_without_state_change() {
        let mut pipeline = pipeline(vec![Document::from_row(1, "hello world")]).await.unwrap();

        assert!(matches!(pipeline.answer("   ").await, Err(RagError::EmptyQuery)));
        assert_eq!(pipeline.state(), PipelineState::Ready);
    }

    #[tokio::test]
    async fn test_answer_trims_query_and_attributes_sources() {
        let mut pipeline = pipeline(vec![
            Document::from_row(1, "The offsite is on Friday."),
            Document::from_row(2, "Refunds are processed in five days."),
        ])
        .await
        .unwrap();

        let turn = pipeline.answer("  how are refunds processed?  ").await.unwrap();

        assert_eq!(turn.answer.query, "how are refunds processed?");
        assert_eq!(turn.answer.text, "Refunds are processed in five days.");
        assert_eq!(turn.answer.sources.len(), 1);
        assert_eq!(turn.answer.sources[0].parent_id, "row-2");
        assert_eq!(turn.scores.len(), 2);
        assert!(turn.persistence.is_complete());
        assert_eq!(pipeline.state(), PipelineState::Ready);
    }
}
