//! Pinecone data-plane client.
//!
//! Talks to a Pinecone index over its REST data plane:
//! `POST {host}/query` with the `Api-Key` header. Only the query operation
//! is implemented; the index is read-only from this system's perspective.
//!
//! Wire format: the request carries `vector`, `topK`, `namespace`,
//! `includeMetadata` and `includeValues`; matches come back with an `id`,
//! a `score`, optional raw `values`, and a `metadata` mapping holding at
//! least `text` and optionally `url`.

use crate::index::VectorIndex;
use crate::types::{AppError, CandidateChunk, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Client for a single Pinecone index.
pub struct PineconeIndex {
    client: reqwest::Client,
    host: String,
    api_key: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest<'a> {
    vector: &'a [f32],
    top_k: usize,
    namespace: &'a str,
    include_metadata: bool,
    include_values: bool,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<Match>,
}

#[derive(Debug, Deserialize)]
struct Match {
    id: String,
    #[serde(default)]
    score: f32,
    /// Pinecone omits or empties `values` unless includeValues was set and
    /// the record actually has them.
    #[serde(default)]
    values: Option<Vec<f32>>,
    #[serde(default)]
    metadata: Option<MatchMetadata>,
}

#[derive(Debug, Default, Deserialize)]
struct MatchMetadata {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    url: Option<String>,
}

impl PineconeIndex {
    /// Create a client for the index at `host`, with a per-request timeout.
    pub fn new(host: String, api_key: String, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::IndexUnavailable(format!("failed to build client: {}", e)))?;

        Ok(Self {
            client,
            host: host.trim_end_matches('/').to_string(),
            api_key,
        })
    }
}

#[async_trait]
impl VectorIndex for PineconeIndex {
    async fn query(
        &self,
        vector: &[f32],
        top_k: usize,
        namespace: &str,
        include_values: bool,
    ) -> Result<Vec<CandidateChunk>> {
        let url = format!("{}/query", self.host);
        let body = QueryRequest {
            vector,
            top_k,
            namespace,
            include_metadata: true,
            include_values,
        };

        let response = self
            .client
            .post(&url)
            .header("Api-Key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::IndexUnavailable(format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::IndexUnavailable(format!(
                "index returned {}",
                response.status()
            )));
        }

        let parsed: QueryResponse = response
            .json()
            .await
            .map_err(|e| AppError::IndexUnavailable(format!("invalid response body: {}", e)))?;

        tracing::debug!(matches = parsed.matches.len(), namespace, "pinecone query");

        // A record with an empty values array is treated the same as one
        // with no values at all: similarity falls back to 0.0 downstream.
        Ok(parsed
            .matches
            .into_iter()
            .map(|m| {
                let metadata = m.metadata.unwrap_or_default();
                CandidateChunk {
                    id: m.id,
                    score: m.score,
                    url: metadata.url,
                    text: metadata.text,
                    values: m.values.filter(|v| !v.is_empty()),
                }
            })
            .collect())
    }

    fn provider_name(&self) -> &'static str {
        "pinecone"
    }
}
