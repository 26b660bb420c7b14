//! Query-time retrieval: embed the question, search the index

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::domain::errors::{RagError, RagResult};
use crate::domain::models::ScoredChunk;
use crate::domain::ports::EmbeddingProvider;
use crate::services::vector_index::VectorIndex;

/// Retrieves the chunks most similar to a query
///
/// The embedder must be the same one the index was built with; otherwise the
/// query lands in a different vector space and the dimension check in
/// [`VectorIndex::search`] rejects it.
pub struct Retriever {
    embedder: Arc<dyn EmbeddingProvider>,
    index: VectorIndex,
    top_k: usize,
}

impl Retriever {
    /// Wrap a built index with its embedder and default result count
    pub fn new(embedder: Arc<dyn EmbeddingProvider>, index: VectorIndex, top_k: usize) -> Self {
        Self {
            embedder,
            index,
            top_k,
        }
    }

    /// Underlying index
    pub fn index(&self) -> &VectorIndex {
        &self.index
    }

    /// Default number of chunks returned by [`Retriever::retrieve`]
    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// Retrieve the default `top_k` chunks for `query`
    pub async fn retrieve(&self, query: &str) -> RagResult<Vec<ScoredChunk>> {
        self.query(query, self.top_k).await
    }

    /// Retrieve up to `k` chunks for `query`, best first
    #[instrument(skip(self, query), fields(query_len = query.len()))]
    pub async fn query(&self, query: &str, k: usize) -> RagResult<Vec<ScoredChunk>> {
        let vector = self
            .embedder
            .embed(query)
            .await
            .map_err(|e| RagError::Retrieval(format!("failed to embed query: {e}")))?;

        let hits = self.index.search(&vector, k)?;

        debug!(
            hits = hits.len(),
            best = hits.first().map(|h| h.score),
            "retrieved context"
        );

        Ok(hits)
    }
}
