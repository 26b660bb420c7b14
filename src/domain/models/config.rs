use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::chunking::ChunkingConfig;
use super::similarity::SimilarityMetric;

/// Main configuration structure for mailrag
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Source corpus configuration
    #[serde(default)]
    pub corpus: CorpusConfig,

    /// Chunking parameters
    #[serde(default)]
    pub chunking: ChunkingConfig,

    /// Retrieval parameters
    #[serde(default)]
    pub retrieval: RetrievalConfig,

    /// Embedding backend
    #[serde(default)]
    pub embedding: EmbeddingConfig,

    /// Answer synthesis backend
    #[serde(default)]
    pub synthesis: SynthesisConfig,

    /// Conversation history stores
    #[serde(default)]
    pub history: HistoryConfig,

    /// Retry policy for external calls
    #[serde(default)]
    pub retry: RetryConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Corpus configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CorpusConfig {
    /// Path to the CSV corpus
    #[serde(default = "default_corpus_path")]
    pub path: PathBuf,

    /// Column holding the document text
    #[serde(default = "default_text_column")]
    pub text_column: String,
}

fn default_corpus_path() -> PathBuf {
    PathBuf::from("emails.csv")
}

fn default_text_column() -> String {
    "text".to_string()
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            path: default_corpus_path(),
            text_column: default_text_column(),
        }
    }
}

/// Retrieval configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RetrievalConfig {
    /// Number of chunks handed to the synthesizer per query
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Similarity metric used for ranking
    #[serde(default)]
    pub metric: SimilarityMetric,
}

const fn default_top_k() -> usize {
    4
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            metric: SimilarityMetric::default(),
        }
    }
}

/// Available embedding backends
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingProviderKind {
    /// Offline feature-hashing embedder
    #[default]
    Hashing,
    /// OpenAI-compatible `/embeddings` endpoint
    OpenAi,
    /// HuggingFace Inference feature-extraction endpoint
    HuggingFace,
}

/// Embedding backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct EmbeddingConfig {
    /// Which backend to use
    #[serde(default)]
    pub provider: EmbeddingProviderKind,

    /// Model identifier (backend default when unset)
    #[serde(default)]
    pub model: Option<String>,

    /// Vector dimension (used by the hashing backend, checked for remote ones)
    #[serde(default = "default_dimension")]
    pub dimension: usize,

    /// Base URL override for remote backends
    #[serde(default)]
    pub base_url: Option<String>,

    /// API key (falls back to the backend's environment variable)
    #[serde(default)]
    pub api_key: Option<String>,

    /// HTTP request timeout in seconds
    #[serde(default = "default_embedding_timeout")]
    pub timeout_secs: u64,
}

const fn default_dimension() -> usize {
    384
}

const fn default_embedding_timeout() -> u64 {
    30
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: EmbeddingProviderKind::default(),
            model: None,
            dimension: default_dimension(),
            base_url: None,
            api_key: None,
            timeout_secs: default_embedding_timeout(),
        }
    }
}

/// Available answer synthesis backends
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SynthesizerKind {
    /// Offline sentence extraction from the retrieved context
    #[default]
    Extractive,
    /// Anthropic Messages API
    Anthropic,
    /// HuggingFace Inference text generation
    HuggingFace,
}

/// Answer synthesis configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SynthesisConfig {
    /// Which backend to use
    #[serde(default)]
    pub provider: SynthesizerKind,

    /// Model identifier (backend default when unset)
    #[serde(default)]
    pub model: Option<String>,

    /// Upper bound on generated length
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Base URL override for remote backends
    #[serde(default)]
    pub base_url: Option<String>,

    /// API key (falls back to the backend's environment variable)
    #[serde(default)]
    pub api_key: Option<String>,

    /// HTTP request timeout in seconds
    #[serde(default = "default_synthesis_timeout")]
    pub timeout_secs: u64,
}

const fn default_max_tokens() -> u32 {
    512
}

const fn default_temperature() -> f32 {
    0.5
}

const fn default_synthesis_timeout() -> u64 {
    120
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            provider: SynthesizerKind::default(),
            model: None,
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            base_url: None,
            api_key: None,
            timeout_secs: default_synthesis_timeout(),
        }
    }
}

/// Conversation history configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct HistoryConfig {
    /// Plain-text transcript
    #[serde(default = "default_transcript_path")]
    pub transcript_path: PathBuf,

    /// Tabular `Timestamp,Query,Response` log
    #[serde(default = "default_table_path")]
    pub table_path: PathBuf,
}

fn default_transcript_path() -> PathBuf {
    PathBuf::from("chat_history.txt")
}

fn default_table_path() -> PathBuf {
    PathBuf::from("chat_history.csv")
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            transcript_path: default_transcript_path(),
            table_path: default_table_path(),
        }
    }
}

/// Retry policy configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RetryConfig {
    /// Maximum number of retry attempts
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Initial backoff delay in milliseconds
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,

    /// Maximum backoff delay in milliseconds
    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,

    /// Upper bound on a single external call, in seconds
    #[serde(default = "default_call_timeout_secs")]
    pub call_timeout_secs: u64,
}

const fn default_max_retries() -> u32 {
    3
}

const fn default_initial_backoff_ms() -> u64 {
    500
}

const fn default_max_backoff_ms() -> u64 {
    10_000
}

const fn default_call_timeout_secs() -> u64 {
    60
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            initial_backoff_ms: default_initial_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
            call_timeout_secs: default_call_timeout_secs(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Directory for JSON log files (stderr only when unset)
    #[serde(default)]
    pub log_dir: Option<PathBuf>,

    /// File rotation: daily, hourly or never
    #[serde(default = "default_rotation")]
    pub rotation: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_rotation() -> String {
    "daily".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            log_dir: None,
            rotation: default_rotation(),
        }
    }
}
