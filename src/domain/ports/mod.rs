//! Port trait definitions (Hexagonal Architecture)
//!
//! This module defines async trait interfaces that adapters must implement:
//! - EmbeddingProvider: text → vector
//! - AnswerSynthesizer: (query, context) → answer
//! - ConversationStore: append-only conversation persistence
//!
//! These traits keep the pipeline independent of any concrete model backend
//! or storage format.

pub mod conversation_store;
pub mod embedding;
pub mod errors;
pub mod synthesizer;

pub use conversation_store::ConversationStore;
pub use embedding::EmbeddingProvider;
pub use errors::ProviderError;
pub use synthesizer::{AnswerSynthesizer, Synthesis, SynthesisRequest};
