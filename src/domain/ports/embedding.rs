//! Embedding provider port for semantic vector generation.
//!
//! Defines the trait for embedding providers that convert text into
//! dense vector representations for semantic similarity search.

use async_trait::async_trait;

use super::errors::ProviderError;

/// Maps text to a fixed-length vector.
///
/// Implementations must be deterministic for a given model and free of side
/// effects: the index embeds each chunk once and relies on queries landing in
/// the same vector space.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Provider name (e.g., "hashing", "openai", "huggingface").
    fn name(&self) -> &'static str;

    /// Embedding dimension for this provider/model.
    fn dimension(&self) -> usize;

    /// Generate an embedding for a single text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, ProviderError>;
}
