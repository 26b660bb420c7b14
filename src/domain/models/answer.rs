use serde::{Deserialize, Serialize};

use super::chunking::Chunk;

/// A chunk returned by similarity search together with its score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredChunk {
    /// The matched chunk
    pub chunk: Chunk,

    /// Similarity to the query; higher is closer for every metric
    pub score: f32,
}

impl ScoredChunk {
    /// Pair a chunk with its similarity score
    pub fn new(chunk: Chunk, score: f32) -> Self {
        Self { chunk, score }
    }
}

/// A synthesized answer with the chunks that support it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    /// Query as answered (leading/trailing whitespace removed)
    pub query: String,

    /// Natural-language answer text
    pub text: String,

    /// Chunks attributed as sources for the answer
    pub sources: Vec<Chunk>,
}
