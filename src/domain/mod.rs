//! Domain layer for the mailrag pipeline
//!
//! Core models, error types and the port traits that external
//! collaborators (embedding model, answer model, conversation stores) implement.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{RagError, RagResult, StoreKind};
