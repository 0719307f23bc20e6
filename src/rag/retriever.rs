//! Nearest-neighbor retrieval over the vector index.
//!
//! The index's native ranking is authoritative: the candidate set handed
//! downstream is exactly what the index returned, in its order. Cosine
//! similarity is recomputed locally only as a diagnostic (logged at debug
//! level), mirroring what the index should have done; the recomputation
//! never reorders the candidate set.

use crate::index::VectorIndex;
use crate::types::{CandidateChunk, Result};
use std::sync::Arc;

/// Default number of candidates requested from the index.
pub const DEFAULT_TOP_K: usize = 10;

/// Default index namespace.
pub const DEFAULT_NAMESPACE: &str = "__default__";

/// Cosine similarity: dot product divided by the product of the norms.
///
/// Returns 0.0 for mismatched lengths or zero-norm inputs.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

/// Retriever configuration knobs.
#[derive(Debug, Clone)]
pub struct RetrieverConfig {
    /// Maximum number of candidates to request (the index may return fewer).
    pub top_k: usize,
    /// Logical index partition to search.
    pub namespace: String,
    /// Ask the index for raw vectors (enables the cosine diagnostic).
    pub include_values: bool,
}

impl Default for RetrieverConfig {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
            namespace: DEFAULT_NAMESPACE.to_string(),
            include_values: true,
        }
    }
}

/// Issues similarity searches and returns ranked candidate sets.
pub struct Retriever {
    index: Arc<dyn VectorIndex>,
    config: RetrieverConfig,
}

impl Retriever {
    /// Create a retriever over the given index.
    pub fn new(index: Arc<dyn VectorIndex>, config: RetrieverConfig) -> Self {
        Self { index, config }
    }

    /// The configured top_k.
    pub fn top_k(&self) -> usize {
        self.config.top_k
    }

    /// Retrieve up to the configured `top_k` candidates for a query vector.
    ///
    /// The returned set preserves the index's own ranking and may be empty;
    /// emptiness is a valid outcome, not an error.
    pub async fn retrieve(&self, vector: &[f32]) -> Result<Vec<CandidateChunk>> {
        self.retrieve_top(vector, self.config.top_k).await
    }

    /// Retrieve with an explicit `top_k`, for diagnostic callers.
    pub async fn retrieve_top(&self, vector: &[f32], top_k: usize) -> Result<Vec<CandidateChunk>> {
        let candidates = self
            .index
            .query(
                vector,
                top_k,
                &self.config.namespace,
                self.config.include_values,
            )
            .await?;

        if candidates.is_empty() {
            tracing::debug!(namespace = %self.config.namespace, "no matches in index");
        } else if tracing::enabled!(tracing::Level::DEBUG) {
            for (id, sim, url) in rank_by_cosine(vector, &candidates).into_iter().take(5) {
                tracing::debug!(id, cosine = sim, url, "retrieved chunk");
            }
        }

        Ok(candidates)
    }
}

/// Diagnostic re-ranking of candidates by locally recomputed cosine
/// similarity.
///
/// A candidate without a stored raw vector gets similarity 0.0 instead of
/// aborting the batch. The result is a fresh list sorted descending by the
/// recomputed value; the input candidate set is left untouched and must
/// remain the set used downstream.
pub fn rank_by_cosine(query: &[f32], candidates: &[CandidateChunk]) -> Vec<(String, f32, String)> {
    let mut ranked: Vec<(String, f32, String)> = candidates
        .iter()
        .map(|c| {
            let sim = match &c.values {
                Some(values) => cosine_similarity(query, values),
                None => 0.0,
            };
            (c.id.clone(), sim, c.source())
        })
        .collect();

    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    ranked
}
