//! Retry/timeout decorators for model backends.
//!
//! Wrap any embedding provider or synthesizer so that every call runs under
//! the configured [`RetryPolicy`]. The pipeline only ever sees the wrapped
//! ports.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{
    AnswerSynthesizer, EmbeddingProvider, ProviderError, Synthesis, SynthesisRequest,
};
use crate::infrastructure::retry::RetryPolicy;

/// Embedding provider decorator applying a retry policy
pub struct ResilientEmbedder {
    inner: Arc<dyn EmbeddingProvider>,
    policy: RetryPolicy,
}

impl ResilientEmbedder {
    pub fn new(inner: Arc<dyn EmbeddingProvider>, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }
}

#[async_trait]
impl EmbeddingProvider for ResilientEmbedder {
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    fn dimension(&self) -> usize {
        self.inner.dimension()
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, ProviderError> {
        self.policy.execute(|| self.inner.embed(text)).await
    }
}

/// Synthesizer decorator applying a retry policy
pub struct ResilientSynthesizer {
    inner: Arc<dyn AnswerSynthesizer>,
    policy: RetryPolicy,
}

impl ResilientSynthesizer {
    pub fn new(inner: Arc<dyn AnswerSynthesizer>, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }
}

#[async_trait]
impl AnswerSynthesizer for ResilientSynthesizer {
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    async fn generate(&self, request: SynthesisRequest<'_>) -> Result<Synthesis, ProviderError> {
        self.policy.execute(|| self.inner.generate(request)).await
    }
}
