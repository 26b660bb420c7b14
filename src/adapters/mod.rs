//! Adapters for model backends and conversation storage.

pub mod embeddings;
pub mod factory;
pub mod history;
pub(crate) mod http;
pub mod resilient;
pub mod synthesizers;
