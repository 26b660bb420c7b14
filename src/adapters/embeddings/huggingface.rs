//! HuggingFace Inference API embedding adapter.
//!
//! Uses the feature-extraction pipeline. Sentence-transformer models return
//! one pooled vector; plain encoder models return one vector per token, which
//! is mean-pooled here.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::adapters::http::{build_client, check_status, resolve_api_key};
use crate::domain::ports::{EmbeddingProvider, ProviderError};

/// Configuration for the HuggingFace embedding provider.
#[derive(Debug, Clone)]
pub struct HuggingFaceEmbeddingConfig {
    /// API token. Falls back to `HUGGINGFACEHUB_API_TOKEN`.
    pub api_key: Option<String>,
    /// Default: `https://api-inference.huggingface.co`.
    pub base_url: String,
    /// Default: `sentence-transformers/all-MiniLM-L6-v2`.
    pub model: String,
    /// Default: 384.
    pub dimension: usize,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for HuggingFaceEmbeddingConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api-inference.huggingface.co".to_string(),
            model: "sentence-transformers/all-MiniLM-L6-v2".to_string(),
            dimension: 384,
            timeout_secs: 30,
        }
    }
}

/// HuggingFace feature-extraction embedder
pub struct HuggingFaceEmbeddingProvider {
    config: HuggingFaceEmbeddingConfig,
    client: Client,
}

impl HuggingFaceEmbeddingProvider {
    pub fn new(config: HuggingFaceEmbeddingConfig) -> Result<Self, ProviderError> {
        let client = build_client(config.timeout_secs)?;
        Ok(Self { config, client })
    }
}

#[async_trait]
impl EmbeddingProvider for HuggingFaceEmbeddingProvider {
    fn name(&self) -> &'static str {
        "huggingface"
    }

    fn dimension(&self) -> usize {
        self.config.dimension
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, ProviderError> {
        let token = resolve_api_key(
            self.config.api_key.as_deref(),
            "HUGGINGFACEHUB_API_TOKEN",
            "HuggingFace",
        )?;
        let url = format!(
            "{}/pipeline/feature-extraction/{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(token)
            .json(&FeatureExtractionRequest {
                inputs: text,
                options: RequestOptions {
                    wait_for_model: true,
                },
            })
            .send()
            .await?;

        let output: FeatureExtractionOutput = check_status(response).await?.json().await?;
        output.into_vector()
    }
}

#[derive(Debug, Serialize)]
struct FeatureExtractionRequest<'a> {
    inputs: &'a str,
    options: RequestOptions,
}

#[derive(Debug, Serialize)]
struct RequestOptions {
    wait_for_model: bool,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FeatureExtractionOutput {
    Pooled(Vec<f32>),
    PerToken(Vec<Vec<f32>>),
}

impl FeatureExtractionOutput {
    fn into_vector(self) -> Result<Vec<f32>, ProviderError> {
        match self {
            Self::Pooled(v) if !v.is_empty() => Ok(v),
            Self::PerToken(tokens) if !tokens.is_empty() => mean_pool(&tokens),
            _ => Err(ProviderError::InvalidResponse(
                "Empty feature-extraction response".to_string(),
            )),
        }
    }
}

fn mean_pool(tokens: &[Vec<f32>]) -> Result<Vec<f32>, ProviderError> {
    let width = tokens[0].len();
    if tokens.iter().any(|t| t.len() != width) {
        return Err(ProviderError::InvalidResponse(
            "Token vectors have inconsistent widths".to_string(),
        ));
    }

    let mut pooled = vec![0.0_f32; width];
    for token in tokens {
        for (acc, x) in pooled.iter_mut().zip(token) {
            *acc += x;
        }
    }
    let count = tokens.len() as f32;
    for x in &mut pooled {
        *x /= count;
    }
    Ok(pooled)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider_for(server: &mockito::Server) -> HuggingFaceEmbeddingProvider {
        HuggingFaceEmbeddingProvider::new(HuggingFaceEmbeddingConfig {
            api_key: Some("hf-test".to_string()),
            base_url: server.url(),
            ..HuggingFaceEmbeddingConfig::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_pooled_response() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock(
                "POST",
                "/pipeline/feature-extraction/sentence-transformers/all-MiniLM-L6-v2",
            )
            .match_header("authorization", "Bearer hf-test")
            .with_status(200)
            .with_body("[0.5, -0.5, 1.0]")
            .create_async()
            .await;

        let v = provider_for(&server).embed("hi").await.unwrap();

        assert_eq!(v, vec![0.5, -0.5, 1.0]);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_per_token_response_is_mean_pooled() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock(
                "POST",
                "/pipeline/feature-extraction/sentence-transformers/all-MiniLM-L6-v2",
            )
            .with_status(200)
            .with_body("[[1.0, 0.0], [3.0, 2.0]]")
            .create_async()
            .await;

        let v = provider_for(&server).embed("hi").await.unwrap();
        assert_eq!(v, vec![2.0, 1.0]);
    }

    #[tokio::test]
    async fn test_rate_limit_maps_to_transient_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock(
                "POST",
                "/pipeline/feature-extraction/sentence-transformers/all-MiniLM-L6-v2",
            )
            .with_status(429)
            .with_body("too many requests")
            .create_async()
            .await;

        let err = provider_for(&server).embed("hi").await.unwrap_err();
        assert!(matches!(err, ProviderError::RateLimited(_)));
        assert!(err.is_transient());
    }

    #[test]
    fn test_mean_pool_rejects_ragged_input() {
        let ragged = vec![vec![1.0, 2.0], vec![1.0]];
        assert!(mean_pool(&ragged).is_err());
    }
}
