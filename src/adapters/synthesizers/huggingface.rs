//! HuggingFace Inference API text-generation synthesizer.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::prompt;
use crate::adapters::http::{build_client, check_status, resolve_api_key};
use crate::domain::ports::{AnswerSynthesizer, ProviderError, Synthesis, SynthesisRequest};

/// Configuration for the HuggingFace synthesizer.
#[derive(Debug, Clone)]
pub struct HuggingFaceSynthesisConfig {
    /// API token. Falls back to `HUGGINGFACEHUB_API_TOKEN`.
    pub api_key: Option<String>,
    /// Default: `https://api-inference.huggingface.co`.
    pub base_url: String,
    /// Default: `google/flan-t5-xxl`.
    pub model: String,
    pub temperature: f32,
    pub max_new_tokens: u32,
    pub timeout_secs: u64,
}

impl Default for HuggingFaceSynthesisConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api-inference.huggingface.co".to_string(),
            model: "google/flan-t5-xxl".to_string(),
            temperature: 0.5,
            max_new_tokens: 512,
            timeout_secs: 120,
        }
    }
}

/// Synthesizer backed by a hosted text-generation model
pub struct HuggingFaceSynthesizer {
    config: HuggingFaceSynthesisConfig,
    client: Client,
}

impl HuggingFaceSynthesizer {
    pub fn new(config: HuggingFaceSynthesisConfig) -> Result<Self, ProviderError> {
        let client = build_client(config.timeout_secs)?;
        Ok(Self { config, client })
    }
}

#[async_trait]
impl AnswerSynthesizer for HuggingFaceSynthesizer {
    fn name(&self) -> &'static str {
        "huggingface"
    }

    async fn generate(&self, request: SynthesisRequest<'_>) -> Result<Synthesis, ProviderError> {
        let token = resolve_api_key(
            self.config.api_key.as_deref(),
            "HUGGINGFACEHUB_API_TOKEN",
            "HuggingFace",
        )?;
        let url = format!(
            "{}/models/{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        );

        let body = GenerationRequest {
            inputs: prompt::render(&request),
            parameters: GenerationParameters {
                temperature: self.config.temperature,
                max_new_tokens: self.config.max_new_tokens,
                return_full_text: false,
            },
            options: GenerationOptions {
                wait_for_model: true,
            },
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;

        let generations: Vec<Generation> = check_status(response).await?.json().await?;

        generations
            .into_iter()
            .next()
            .map(|g| g.generated_text.trim().to_string())
            .filter(|text| !text.is_empty())
            .map(Synthesis::text)
            .ok_or_else(|| ProviderError::InvalidResponse("No generated text".to_string()))
    }
}

#[derive(Debug, Serialize)]
struct GenerationRequest {
    inputs: String,
    parameters: GenerationParameters,
    options: GenerationOptions,
}

#[derive(Debug, Serialize)]
struct GenerationParameters {
    temperature: f32,
    max_new_tokens: u32,
    return_full_text: bool,
}

#[derive(Debug, Serialize)]
struct GenerationOptions {
    wait_for_model: bool,
}

#[derive(Debug, Deserialize)]
struct Generation {
    generated_text: String,
}
