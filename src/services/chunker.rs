//! Text chunking service
//!
//! Splits documents into overlapping, character-bounded windows that end on a
//! configured separator whenever one falls inside the window.

use tracing::debug;

use crate::domain::errors::{RagError, RagResult};
use crate::domain::models::{Chunk, ChunkingConfig, Document};

/// Separator-aware text chunker
///
/// Consecutive chunks of a document share exactly `chunk_overlap` characters,
/// so dropping that prefix from every chunk after the first reconstructs the
/// document.
#[derive(Debug, Clone)]
pub struct Chunker {
    config: ChunkingConfig,
}

impl Chunker {
    /// Create a chunker, rejecting unusable configurations up front
    pub fn new(config: ChunkingConfig) -> RagResult<Self> {
        config
            .validate()
            .map_err(|e| RagError::Configuration(format!("Invalid chunking config: {e}")))?;

        Ok(Self { config })
    }

    /// Active configuration
    pub fn config(&self) -> &ChunkingConfig {
        &self.config
    }

    /// Split every document, preserving document order
    pub fn split_all(&self, documents: &[Document]) -> Vec<Chunk> {
        documents.iter().flat_map(|doc| self.split(doc)).collect()
    }

    /// Split one document into chunks
    pub fn split(&self, document: &Document) -> Vec<Chunk> {
        if document.is_blank() {
            return Vec::new();
        }

        let text = document.text.as_str();
        let size = self.config.chunk_size;
        let overlap = self.config.chunk_overlap;

        // Byte offset of every character position, plus the end of the text.
        let bounds: Vec<usize> = text
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(text.len()))
            .collect();
        let total = bounds.len() - 1;
        let separator_ends = self.separator_ends(text, &bounds);

        let mut chunks = Vec::new();
        let mut start = 0;

        while total - start > size {
            let window_end = start + size;
            let upper = separator_ends.partition_point(|&end| end <= window_end);
            let end = separator_ends[..upper]
                .last()
                .copied()
                .filter(|&end| end > start + overlap)
                .unwrap_or(window_end);

            chunks.push(Self::make_chunk(document, &bounds, chunks.len(), start, end));
            start = end - overlap;
        }

        chunks.push(Self::make_chunk(document, &bounds, chunks.len(), start, total));

        debug!(
            document = %document.id,
            chars = total,
            chunks = chunks.len(),
            "split document"
        );

        chunks
    }

    /// Character positions immediately after each separator occurrence
    fn separator_ends(&self, text: &str, bounds: &[usize]) -> Vec<usize> {
        let separator = self.config.separator.as_str();
        text.match_indices(separator)
            .filter_map(|(byte_idx, _)| bounds.binary_search(&(byte_idx + separator.len())).ok())
            .collect()
    }

    fn make_chunk(
        document: &Document,
        bounds: &[usize],
        index: usize,
        start: usize,
        end: usize,
    ) -> Chunk {
        let content = &document.text[bounds[start]..bounds[end]];
        Chunk::new(document.id.as_str(), content, index, start, end)
    }
}
