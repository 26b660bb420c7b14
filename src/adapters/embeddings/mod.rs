//! Embedding provider adapters

pub mod hashing;
pub mod huggingface;
pub mod openai;

pub use hashing::HashingEmbedder;
pub use huggingface::{HuggingFaceEmbeddingConfig, HuggingFaceEmbeddingProvider};
pub use openai::{OpenAiEmbeddingConfig, OpenAiEmbeddingProvider};
