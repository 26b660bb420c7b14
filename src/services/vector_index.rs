//! Flat in-memory vector index
//!
//! Built once from the full chunk set and never mutated afterwards. Search is
//! exhaustive: every stored embedding is scored against the query vector and
//! the best `k` are kept in a bounded heap.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use tracing::{debug, info};

use crate::domain::errors::{RagError, RagResult};
use crate::domain::models::{Chunk, ScoredChunk, SimilarityMetric};
use crate::domain::ports::EmbeddingProvider;

/// A chunk and its embedding, owned by the index
#[derive(Debug, Clone)]
struct IndexEntry {
    chunk: Chunk,
    embedding: Vec<f32>,
}

/// Exhaustive nearest-neighbour index over chunk embeddings
#[derive(Debug)]
pub struct VectorIndex {
    entries: Vec<IndexEntry>,
    dimension: usize,
    metric: SimilarityMetric,
}

impl VectorIndex {
    /// Embed every chunk once, in order, and store the results
    ///
    /// Fails as a whole if any chunk cannot be embedded or comes back with a
    /// different dimension than the first one.
    pub async fn build(
        chunks: Vec<Chunk>,
        embedder: &dyn EmbeddingProvider,
        metric: SimilarityMetric,
    ) -> RagResult<Self> {
        Self::build_with_progress(chunks, embedder, metric, |_, _| {}).await
    }

    /// Same as [`VectorIndex::build`], reporting `(embedded, total)` after each chunk
    pub async fn build_with_progress<F>(
        chunks: Vec<Chunk>,
        embedder: &dyn EmbeddingProvider,
        metric: SimilarityMetric,
        mut on_progress: F,
    ) -> RagResult<Self>
    where
        F: FnMut(usize, usize) + Send,
    {
        let total = chunks.len();
        let mut entries = Vec::with_capacity(total);
        let mut dimension = 0;

        for chunk in chunks {
            let embedding = embedder.embed(&chunk.content).await.map_err(|e| {
                RagError::IndexBuild(format!("failed to embed chunk {}: {e}", chunk.id))
            })?;

            if embedding.is_empty() {
                return Err(RagError::IndexBuild(format!(
                    "embedding provider '{}' returned an empty vector for chunk {}",
                    embedder.name(),
                    chunk.id
                )));
            }

            if entries.is_empty() {
                dimension = embedding.len();
            } else if embedding.len() != dimension {
                return Err(RagError::IndexBuild(format!(
                    "dimension mismatch for chunk {}: expected {dimension}, got {}",
                    chunk.id,
                    embedding.len()
                )));
            }

            entries.push(IndexEntry { chunk, embedding });
            on_progress(entries.len(), total);
        }

        info!(
            entries = entries.len(),
            dimension,
            metric = %metric,
            provider = embedder.name(),
            "vector index built"
        );

        Ok(Self {
            entries,
            dimension,
            metric,
        })
    }

    /// Number of stored entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the index holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Embedding dimension (0 for an empty index)
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Metric used for ranking
    pub fn metric(&self) -> SimilarityMetric {
        self.metric
    }

    /// Top `k` entries by descending similarity to `query`
    ///
    /// `k` is clamped to the index size and `k == 0` yields nothing. Equal
    /// scores keep insertion order.
    pub fn search(&self, query: &[f32], k: usize) -> RagResult<Vec<ScoredChunk>> {
        if k == 0 || self.entries.is_empty() {
            return Ok(Vec::new());
        }

        if query.len() != self.dimension {
            return Err(RagError::Retrieval(format!(
                "query vector has dimension {}, index expects {}",
                query.len(),
                self.dimension
            )));
        }

        let k = k.min(self.entries.len());
        let mut heap: BinaryHeap<Candidate> = BinaryHeap::with_capacity(k + 1);

        for (position, entry) in self.entries.iter().enumerate() {
            let score = self.metric.score(query, &entry.embedding);
            let candidate = Candidate {
                score: if score.is_nan() { f32::NEG_INFINITY } else { score },
                position,
            };

            if heap.len() < k {
                heap.push(candidate);
            } else if heap.peek().is_some_and(|worst| candidate < *worst) {
                heap.pop();
                heap.push(candidate);
            }
        }

        let results: Vec<ScoredChunk> = heap
            .into_sorted_vec()
            .into_iter()
            .map(|c| ScoredChunk::new(self.entries[c.position].chunk.clone(), c.score))
            .collect();

        debug!(k, hits = results.len(), "index search complete");

        Ok(results)
    }
}

/// Heap entry ordered so that the worst-ranked candidate is the maximum.
///
/// Lower score ranks worse; on equal score, later insertion ranks worse.
#[derive(Debug, Clone, Copy)]
struct Candidate {
    score: f32,
    position: usize,
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate {}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .score
            .total_cmp(&self.score)
            .then_with(|| self.position.cmp(&other.position))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::ProviderError;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};

    /// Embeds texts from a fixed lookup table and counts calls
    struct TableEmbedder {
        vectors: HashMap<String, Vec<f32>>,
        calls: AtomicUsize,
    }

    impl TableEmbedder {
        fn new(pairs: &[(&str, Vec<f32>)]) -> Self {
            Self {
                vectors: pairs
                    .iter()
                    .map(|(text, v)| ((*text).to_string(), v.clone()))
                    .collect(),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl EmbeddingProvider for TableEmbedder {
        fn name(&self) -> &'static str {
            "table"
        }

        fn dimension(&self) -> usize {
            2
        }

        async fn embed(&self, text: &str) -> Result<Vec<f32>, ProviderError> {
            self.calls.fetch_add(1, AtomicOrdering::SeqCst);
            self.vectors
                .get(text)
                .cloned()
                .ok_or_else(|| ProviderError::InvalidResponse(format!("no vector for {text}")))
        }
    }

    fn chunk(id: usize, text: &str) -> Chunk {
        Chunk::new(format!("row-{id}"), text, 0, 0, text.chars().count())
    }

    async fn index_of(pairs: &[(&str, Vec<f32>)]) -> VectorIndex {
        let embedder = TableEmbedder::new(pairs);
        let chunks = pairs
            .iter()
            .enumerate()
            .map(|(i, (text, _))| chunk(i, text))
            .collect();
        VectorIndex::build(chunks, &embedder, SimilarityMetric::Cosine)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_build_embeds_each_chunk_once() {
        let embedder = TableEmbedder::new(&[("a", vec![1.0, 0.0]), ("b", vec![0.0, 1.0])]);
        let mut progress = Vec::new();
        let index = VectorIndex::build_with_progress(
            vec![chunk(0, "a"), chunk(1, "b")],
            &embedder,
            SimilarityMetric::Cosine,
            |done, total| progress.push((done, total)),
        )
        .await
        .unwrap();

        assert_eq!(index.len(), 2);
        assert_eq!(index.dimension(), 2);
        assert_eq!(embedder.calls.load(AtomicOrdering::SeqCst), 2);
        assert_eq!(progress, vec![(1, 2), (2, 2)]);
    }

    #[tokio::test]
    async fn test_build_fails_whole_on_embedding_error() {
        let embedder = TableEmbedder::new(&[("a", vec![1.0, 0.0])]);
        let result = VectorIndex::build(
            vec![chunk(0, "a"), chunk(1, "unknown")],
            &embedder,
            SimilarityMetric::Cosine,
        )
        .await;

        assert!(matches!(result, Err(RagError::IndexBuild(_))));
    }

    #[tokio::test]
    async fn test_build_rejects_dimension_mismatch() {
        let embedder = TableEmbedder::new(&[("a", vec![1.0, 0.0]), ("b", vec![1.0, 0.0, 0.0])]);
        let result = VectorIndex::build(
            vec![chunk(0, "a"), chunk(1, "b")],
            &embedder,
            SimilarityMetric::Cosine,
        )
        .await;

        match result {
            Err(RagError::IndexBuild(msg)) => assert!(msg.contains("dimension mismatch")),
            other => panic!("expected IndexBuild error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_search_orders_by_descending_similarity() {
        let index = index_of(&[
            ("far", vec![0.0, 1.0]),
            ("near", vec![1.0, 0.1]),
            ("mid", vec![1.0, 1.0]),
        ])
        .await;

        let results = index.search(&[1.0, 0.0], 3).unwrap();
        let texts: Vec<&str> = results.iter().map(|r| r.chunk.content.as_str()).collect();

        assert_eq!(texts, vec!["near", "mid", "far"]);
        assert!(results[0].score >= results[1].score);
        assert!(results[1].score >= results[2].score);
    }

    #[tokio::test]
    async fn test_search_k_zero_and_clamping() {
        let index = index_of(&[("a", vec![1.0, 0.0]), ("b", vec![0.0, 1.0])]).await;

        assert!(index.search(&[1.0, 0.0], 0).unwrap().is_empty());

        let all = index.search(&[1.0, 0.0], 10).unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].chunk.content, "a");
    }

    #[tokio::test]
    async fn test_search_ties_keep_insertion_order() {
        let index = index_of(&[
            ("other", vec![0.0, 1.0]),
            ("first twin", vec![1.0, 0.0]),
            ("second twin", vec![1.0, 0.0]),
        ])
        .await;

        let results = index.search(&[1.0, 0.0], 2).unwrap();
        assert_eq!(results[0].chunk.content, "first twin");
        assert_eq!(results[1].chunk.content, "second twin");
        assert_eq!(results[0].score, results[1].score);
    }

    #[tokio::test]
    async fn test_search_dimension_mismatch_is_retrieval_error() {
        let index = index_of(&[("a", vec![1.0, 0.0])]).await;
        let result = index.search(&[1.0, 0.0, 0.0], 1);
        assert!(matches!(result, Err(RagError::Retrieval(_))));
    }

    #[tokio::test]
    async fn test_l2_metric_prefers_closest_point() {
        let embedder = TableEmbedder::new(&[("origin", vec![0.0, 0.0]), ("far", vec![10.0, 10.0])]);
        let index = VectorIndex::build(
            vec![chunk(0, "far"), chunk(1, "origin")],
            &embedder,
            SimilarityMetric::L2,
        )
        .await
        .unwrap();

        let results = index.search(&[1.0, 1.0], 1).unwrap();
        assert_eq!(results[0].chunk.content, "origin");
        assert_eq!(index.metric(), SimilarityMetric::L2);
    }

    #[test]
    fn test_empty_index_search() {
        let index = VectorIndex {
            entries: Vec::new(),
            dimension: 0,
            metric: SimilarityMetric::Cosine,
        };
        assert!(index.is_empty());
        assert!(index.search(&[1.0], 3).unwrap().is_empty());
    }
}
