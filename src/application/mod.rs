//! Application layer: pipeline lifecycle and the interactive session

pub mod pipeline;
pub mod session;

pub use pipeline::{IndexStats, Pipeline, PipelineBuilder, Turn};
pub use session::{ChatSession, SessionSummary};
