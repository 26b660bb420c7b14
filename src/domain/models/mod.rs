pub mod answer;
pub mod chunking;
pub mod config;
pub mod conversation;
pub mod document;
pub mod pipeline_state;
pub mod similarity;

pub use answer::{Answer, ScoredChunk};
pub use chunking::{Chunk, ChunkingConfig};
pub use config::{
    Config, CorpusConfig, EmbeddingConfig, EmbeddingProviderKind, HistoryConfig, LoggingConfig,
    RetrievalConfig, RetryConfig, SynthesisConfig, SynthesizerKind,
};
pub use conversation::{ConversationRecord, TIMESTAMP_FORMAT};
pub use document::Document;
pub use pipeline_state::PipelineState;
pub use similarity::SimilarityMetric;
