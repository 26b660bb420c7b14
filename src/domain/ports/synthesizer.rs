//! Answer synthesizer port.
//!
//! The answer-generation model is an opaque function of the query and the
//! retrieved context. Backends may additionally report which context chunks
//! shaped the answer.

use async_trait::async_trait;

use super::errors::ProviderError;
use crate::domain::models::Chunk;

/// Input to an answer synthesizer.
#[derive(Debug, Clone, Copy)]
pub struct SynthesisRequest<'a> {
    /// The user's question (trimmed)
    pub query: &'a str,

    /// Retrieved chunk texts joined with blank lines, in retrieval order
    pub context: &'a str,

    /// The retrieved chunks, for backends that attribute sources
    pub chunks: &'a [Chunk],
}

/// Output of an answer synthesizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Synthesis {
    /// Generated answer text
    pub text: String,

    /// Indices into `SynthesisRequest::chunks` that supported the answer,
    /// when the backend can tell
    pub attribution: Option<Vec<usize>>,
}

impl Synthesis {
    /// Answer without source attribution
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            attribution: None,
        }
    }

    /// Answer attributed to specific retrieved chunks
    pub fn attributed(text: impl Into<String>, indices: Vec<usize>) -> Self {
        Self {
            text: text.into(),
            attribution: Some(indices),
        }
    }
}

/// Produces a natural-language answer conditioned on retrieved context.
#[async_trait]
pub trait AnswerSynthesizer: Send + Sync {
    /// Backend name for diagnostics
    fn name(&self) -> &'static str;

    /// Generate an answer for `request`
    async fn generate(&self, request: SynthesisRequest<'_>) -> Result<Synthesis, ProviderError>;
}
