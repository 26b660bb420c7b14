//! Answer synthesizer adapters

pub mod anthropic;
pub mod extractive;
pub mod huggingface;
pub mod prompt;

pub use anthropic::{AnthropicConfig, AnthropicSynthesizer};
pub use extractive::ExtractiveSynthesizer;
pub use huggingface::{HuggingFaceSynthesisConfig, HuggingFaceSynthesizer};
