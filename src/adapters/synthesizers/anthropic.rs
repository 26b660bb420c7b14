//! Anthropic Messages API synthesizer.
//!
//! Sends the stuffed prompt as a single user message and returns the joined
//! text blocks of the reply. Non-streaming.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::prompt;
use crate::adapters::http::{build_client, check_status, resolve_api_key};
use crate::domain::ports::{AnswerSynthesizer, ProviderError, Synthesis, SynthesisRequest};

/// Configuration for the Anthropic synthesizer.
#[derive(Debug, Clone)]
pub struct AnthropicConfig {
    /// API key (will be read from ANTHROPIC_API_KEY env if not set).
    pub api_key: Option<String>,
    /// API base URL.
    pub base_url: String,
    /// Model to use.
    pub model: String,
    /// API version header.
    pub api_version: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Max tokens to generate.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f32,
}

impl Default for AnthropicConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.anthropic.com".to_string(),
            model: "claude-3-5-haiku-latest".to_string(),
            api_version: "2023-06-01".to_string(),
            timeout_secs: 120,
            max_tokens: 512,
            temperature: 0.5,
        }
    }
}

/// Synthesizer backed by the Anthropic Messages API
pub struct AnthropicSynthesizer {
    config: AnthropicConfig,
    client: Client,
}

impl AnthropicSynthesizer {
    pub fn new(config: AnthropicConfig) -> Result<Self, ProviderError> {
        let client = build_client(config.timeout_secs)?;
        Ok(Self { config, client })
    }
}

#[async_trait]
impl AnswerSynthesizer for AnthropicSynthesizer {
    fn name(&self) -> &'static str {
        "anthropic"
    }

    async fn generate(&self, request: SynthesisRequest<'_>) -> Result<Synthesis, ProviderError> {
        let api_key = resolve_api_key(
            self.config.api_key.as_deref(),
            "ANTHROPIC_API_KEY",
            "Anthropic",
        )?;

        let body = MessagesRequest {
            model: &self.config.model,
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
            messages: vec![Message {
                role: "user",
                content: prompt::render(&request),
            }],
        };

        let response = self
            .client
            .post(format!(
                "{}/v1/messages",
                self.config.base_url.trim_end_matches('/')
            ))
            .header("x-api-key", api_key)
            .header("anthropic-version", &self.config.api_version)
            .json(&body)
            .send()
            .await?;

        let result: MessagesResponse = check_status(response).await?.json().await?;
        debug!(stop_reason = ?result.stop_reason, "anthropic response received");

        let text = result
            .content
            .iter()
            .filter_map(|block| match block {
                ContentBlock::Text { text } => Some(text.as_str()),
                ContentBlock::Other => None,
            })
            .collect::<Vec<_>>()
            .join("\n");

        if text.trim().is_empty() {
            return Err(ProviderError::InvalidResponse(
                "Response contained no text".to_string(),
            ));
        }

        Ok(Synthesis::text(text.trim()))
    }
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    messages: Vec<Message>,
}

#[derive(Debug, Serialize)]
struct Message {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
    stop_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum ContentBlock {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(other)]
    Other,
}
