//! mailrag - retrieval-augmented question answering over an email corpus
//!
//! Emails are loaded from a CSV file, split into overlapping chunks, embedded
//! and indexed in memory. Each question retrieves the closest chunks, an
//! answer synthesizer writes the reply, and every answered turn is appended
//! to a plain-text transcript and a CSV table.
//!
//! # Architecture
//!
//! - **Domain Layer** (`domain`): models, errors and the backend ports
//! - **Service Layer** (`services`): chunking, indexing, retrieval, logging
//! - **Application Layer** (`application`): pipeline lifecycle and chat loop
//! - **Adapters** (`adapters`): embedding/synthesis backends, history files
//! - **Infrastructure Layer** (`infrastructure`): config, logging, retry, corpus
//! - **CLI Layer** (`cli`): command-line interface
//!
//! # Example
//!
//! ```no_run
//! use mailrag::{ConfigLoader, PipelineBuilder};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = ConfigLoader::load()?;
//! let mut pipeline = PipelineBuilder::new(config).build().await?;
//! let turn = pipeline.answer("What is the refund policy?").await?;
//! println!("{}", turn.answer.text);
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use application::{ChatSession, Pipeline, PipelineBuilder, SessionSummary, Turn};
pub use domain::models::{
    Answer, Chunk, ChunkingConfig, Config, ConversationRecord, Document, PipelineState,
    ScoredChunk, SimilarityMetric,
};
pub use domain::ports::{AnswerSynthesizer, ConversationStore, EmbeddingProvider, ProviderError};
pub use domain::{RagError, RagResult, StoreKind};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{Chunker, ConversationLogger, PersistenceReport, Retriever, VectorIndex};
