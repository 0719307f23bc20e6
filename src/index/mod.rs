//! Vector index clients.
//!
//! The index is an external, read-only service from this system's point of
//! view. The [`VectorIndex`] trait abstracts over backends:
//!
//! - [`pinecone::PineconeIndex`] - Pinecone data-plane REST API
//! - [`InMemoryIndex`] - local cosine ranking, for tests and small corpora
//!
//! All backends return candidates in their native ranking order (descending
//! relevance). An empty result is a valid outcome, not an error.

use crate::types::{CandidateChunk, Result};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;

pub mod pinecone;

/// Similarity search against a logical namespace of a vector index.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Query for the `top_k` nearest chunks in `namespace`.
    ///
    /// `include_values` asks the index to return each match's raw stored
    /// vector (used only for diagnostic similarity recomputation).
    ///
    /// Fails with [`crate::types::AppError::IndexUnavailable`] on
    /// connectivity or auth errors; an empty match list is returned as
    /// `Ok(vec![])`.
    async fn query(
        &self,
        vector: &[f32],
        top_k: usize,
        namespace: &str,
        include_values: bool,
    ) -> Result<Vec<CandidateChunk>>;

    /// Name of this index backend.
    fn provider_name(&self) -> &'static str;
}

/// Runtime selection of the vector index backend.
#[derive(Debug, Clone)]
pub enum IndexProvider {
    /// Pinecone managed index.
    Pinecone {
        /// Data-plane host of the index, e.g. `https://my-index-abc.svc.pinecone.io`.
        host: String,
        /// API key sent in the `Api-Key` header.
        api_key: String,
    },
    /// In-memory index, for tests and small local corpora.
    InMemory,
}

impl IndexProvider {
    /// Create an index client for this provider.
    pub fn create_index(&self, timeout: std::time::Duration) -> Result<Box<dyn VectorIndex>> {
        match self {
            IndexProvider::Pinecone { host, api_key } => Ok(Box::new(
                pinecone::PineconeIndex::new(host.clone(), api_key.clone(), timeout)?,
            )),
            IndexProvider::InMemory => Ok(Box::new(InMemoryIndex::new())),
        }
    }
}

// ============================================================================
// In-Memory Index
// ============================================================================

/// A chunk stored in the in-memory index.
#[derive(Debug, Clone)]
pub struct StoredChunk {
    /// Identifier, unique within the namespace.
    pub id: String,
    /// The chunk's embedding vector.
    pub values: Vec<f32>,
    /// Source URL metadata.
    pub url: Option<String>,
    /// Text metadata.
    pub text: Option<String>,
}

/// In-memory vector index using cosine similarity.
///
/// Data is not persisted and is lost when the process exits.
pub struct InMemoryIndex {
    namespaces: RwLock<HashMap<String, Vec<StoredChunk>>>,
}

impl InMemoryIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self {
            namespaces: RwLock::new(HashMap::new()),
        }
    }

    /// Insert or replace chunks in a namespace.
    pub fn upsert(&self, namespace: &str, chunks: Vec<StoredChunk>) {
        let mut namespaces = self.namespaces.write();
        let stored = namespaces.entry(namespace.to_string()).or_default();
        for chunk in chunks {
            if let Some(existing) = stored.iter_mut().find(|c| c.id == chunk.id) {
                *existing = chunk;
            } else {
                stored.push(chunk);
            }
        }
    }

    /// Number of chunks in a namespace.
    pub fn len(&self, namespace: &str) -> usize {
        self.namespaces
            .read()
            .get(namespace)
            .map(|c| c.len())
            .unwrap_or(0)
    }

    /// Whether a namespace holds no chunks.
    pub fn is_empty(&self, namespace: &str) -> bool {
        self.len(namespace) == 0
    }

    fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
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
}

impl Default for InMemoryIndex {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VectorIndex for InMemoryIndex {
    async fn query(
        &self,
        vector: &[f32],
        top_k: usize,
        namespace: &str,
        include_values: bool,
    ) -> Result<Vec<CandidateChunk>> {
        let namespaces = self.namespaces.read();
        let chunks = match namespaces.get(namespace) {
            Some(chunks) => chunks,
            // Unknown namespace is just an empty corpus.
            None => return Ok(Vec::new()),
        };

        let mut candidates: Vec<CandidateChunk> = chunks
            .iter()
            .map(|chunk| CandidateChunk {
                id: chunk.id.clone(),
                score: Self::cosine_similarity(vector, &chunk.values),
                url: chunk.url.clone(),
                text: chunk.text.clone(),
                values: include_values.then(|| chunk.values.clone()),
            })
            .collect();

        candidates.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        candidates.truncate(top_k);
        Ok(candidates)
    }

    fn provider_name(&self) -> &'static str {
        "in-memory"
    }
}
