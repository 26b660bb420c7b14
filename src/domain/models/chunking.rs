//! Text chunking domain models
//!
//! Models for splitting corpus documents into overlapping windows for embedding.
//! Sizes and offsets are measured in characters (Unicode scalar values).

use serde::{Deserialize, Serialize};

/// Configuration for document chunking
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Maximum size of each chunk in characters
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Characters shared by consecutive chunks of the same document
    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,

    /// Preferred boundary; chunks end right after it when possible
    #[serde(default = "default_separator")]
    pub separator: String,
}

const fn default_chunk_size() -> usize {
    1000
}

const fn default_chunk_overlap() -> usize {
    200
}

fn default_separator() -> String {
    "\n".to_string()
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
            separator: default_separator(),
        }
    }
}

impl ChunkingConfig {
    /// Create a configuration with explicit sizes and separator
    pub fn new(chunk_size: usize, chunk_overlap: usize, separator: impl Into<String>) -> Self {
        Self {
            chunk_size,
            chunk_overlap,
            separator: separator.into(),
        }
    }

    /// Validate the chunking configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.chunk_size == 0 {
            return Err("chunk_size must be greater than 0".to_string());
        }

        if self.chunk_overlap >= self.chunk_size {
            return Err(format!(
                "chunk_overlap ({}) must be less than chunk_size ({})",
                self.chunk_overlap, self.chunk_size
            ));
        }

        if self.separator.is_empty() {
            return Err("separator cannot be empty".to_string());
        }

        Ok(())
    }
}

/// A chunk of text extracted from a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Unique identifier for this chunk
    pub id: String,

    /// ID of the parent document
    pub parent_id: String,

    /// The text content of this chunk
    pub content: String,

    /// Index of this chunk within the parent document (0-based)
    pub chunk_index: usize,

    /// Start position in the parent document (character offset)
    pub start_offset: usize,

    /// End position in the parent document (character offset, exclusive)
    pub end_offset: usize,
}

impl Chunk {
    /// Create a new chunk
    pub fn new(
        parent_id: impl Into<String>,
        content: impl Into<String>,
        chunk_index: usize,
        start_offset: usize,
        end_offset: usize,
    ) -> Self {
        let parent_id = parent_id.into();
        let id = format!("{parent_id}:chunk:{chunk_index}");

        Self {
            id,
            parent_id,
            content: content.into(),
            chunk_index,
            start_offset,
            end_offset,
        }
    }

    /// Returns true if this is the first chunk
    pub fn is_first(&self) -> bool {
        self.chunk_index == 0
    }

    /// Length of the chunk in characters
    pub fn char_len(&self) -> usize {
        self.end_offset - self.start_offset
    }
}
