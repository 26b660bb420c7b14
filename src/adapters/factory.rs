//! Backend construction from configuration.
//!
//! Turns the `embedding`, `synthesis` and `history` config sections into
//! concrete port implementations. Remote backends come wrapped in the retry
//! decorators.

use std::sync::Arc;

use crate::adapters::embeddings::{
    HashingEmbedder, HuggingFaceEmbeddingConfig, HuggingFaceEmbeddingProvider,
    OpenAiEmbeddingConfig, OpenAiEmbeddingProvider,
};
use crate::adapters::history::{TableStore, TranscriptStore};
use crate::adapters::resilient::{ResilientEmbedder, ResilientSynthesizer};
use crate::adapters::synthesizers::{
    AnthropicConfig, AnthropicSynthesizer, ExtractiveSynthesizer, HuggingFaceSynthesisConfig,
    HuggingFaceSynthesizer,
};
use crate::domain::errors::{RagError, RagResult};
use crate::domain::models::{
    EmbeddingConfig, EmbeddingProviderKind, HistoryConfig, SynthesisConfig, SynthesizerKind,
};
use crate::domain::ports::{AnswerSynthesizer, ConversationStore, EmbeddingProvider, ProviderError};
use crate::infrastructure::retry::RetryPolicy;

fn configuration_error(backend: &str, err: &ProviderError) -> RagError {
    RagError::Configuration(format!("Cannot create {backend} backend: {err}"))
}

/// Build the configured embedding provider
pub fn build_embedder(
    config: &EmbeddingConfig,
    policy: &RetryPolicy,
) -> RagResult<Arc<dyn EmbeddingProvider>> {
    let remote: Arc<dyn EmbeddingProvider> = match config.provider {
        EmbeddingProviderKind::Hashing => {
            return Ok(Arc::new(HashingEmbedder::new(config.dimension)));
        }
        EmbeddingProviderKind::OpenAi => {
            let defaults = OpenAiEmbeddingConfig::default();
            let provider = OpenAiEmbeddingProvider::new(OpenAiEmbeddingConfig {
                api_key: config.api_key.clone(),
                base_url: config.base_url.clone().unwrap_or(defaults.base_url),
                model: config.model.clone().unwrap_or(defaults.model),
                dimension: config.dimension,
                timeout_secs: config.timeout_secs,
            })
            .map_err(|e| configuration_error("openai embedding", &e))?;
            Arc::new(provider)
        }
        EmbeddingProviderKind::HuggingFace => {
            let defaults = HuggingFaceEmbeddingConfig::default();
            let provider = HuggingFaceEmbeddingProvider::new(HuggingFaceEmbeddingConfig {
                api_key: config.api_key.clone(),
                base_url: config.base_url.clone().unwrap_or(defaults.base_url),
                model: config.model.clone().unwrap_or(defaults.model),
                dimension: config.dimension,
                timeout_secs: config.timeout_secs,
            })
            .map_err(|e| configuration_error("huggingface embedding", &e))?;
            Arc::new(provider)
        }
    };

    Ok(Arc::new(ResilientEmbedder::new(remote, policy.clone())))
}

/// Build the configured answer synthesizer
pub fn build_synthesizer(
    config: &SynthesisConfig,
    policy: &RetryPolicy,
) -> RagResult<Arc<dyn AnswerSynthesizer>> {
    let remote: Arc<dyn AnswerSynthesizer> = match config.provider {
        SynthesizerKind::Extractive => return Ok(Arc::new(ExtractiveSynthesizer::default())),
        SynthesizerKind::Anthropic => {
            let defaults = AnthropicConfig::default();
            let synthesizer = AnthropicSynthesizer::new(AnthropicConfig {
                api_key: config.api_key.clone(),
                base_url: config.base_url.clone().unwrap_or(defaults.base_url),
                model: config.model.clone().unwrap_or(defaults.model),
                api_version: defaults.api_version,
                timeout_secs: config.timeout_secs,
                max_tokens: config.max_tokens,
                temperature: config.temperature,
            })
            .map_err(|e| configuration_error("anthropic", &e))?;
            Arc::new(synthesizer)
        }
        SynthesizerKind::HuggingFace => {
            let defaults = HuggingFaceSynthesisConfig::default();
            let synthesizer = HuggingFaceSynthesizer::new(HuggingFaceSynthesisConfig {
                api_key: config.api_key.clone(),
                base_url: config.base_url.clone().unwrap_or(defaults.base_url),
                model: config.model.clone().unwrap_or(defaults.model),
                temperature: config.temperature,
                max_new_tokens: config.max_tokens,
                timeout_secs: config.timeout_secs,
            })
            .map_err(|e| configuration_error("huggingface synthesis", &e))?;
            Arc::new(synthesizer)
        }
    };

    Ok(Arc::new(ResilientSynthesizer::new(remote, policy.clone())))
}

/// Transcript and table stores at the configured paths
pub fn build_stores(config: &HistoryConfig) -> Vec<Arc<dyn ConversationStore>> {
    vec![
        Arc::new(TranscriptStore::new(&config.transcript_path)),
        Arc::new(TableStore::new(&config.table_path)),
    ]
}
