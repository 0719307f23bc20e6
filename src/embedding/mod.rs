//! Query Encoder: wraps an embedding backend behind the [`QueryEncoder`]
//! trait.
//!
//! Two backends are provided:
//!
//! - [`RemoteEncoder`] - an OpenAI-compatible `/embeddings` HTTP endpoint
//! - `LocalEncoder` - fastembed ONNX inference (feature `local-embeddings`)
//!
//! Both honour the batch contract: one fixed-length vector per input string,
//! order preserved. Encoding is deterministic for a fixed model. The local
//! model is loaded once, on first use, behind a one-time guarded init, and
//! is reused read-only for the remainder of the process.

use crate::types::{AppError, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

#[cfg(feature = "local-embeddings")]
pub mod local;

/// Text-to-vector encoder abstraction.
///
/// Implementations must be safe for concurrent use once constructed; any
/// lazy resource allocation must be guarded so concurrent first calls do
/// not race to load the model twice.
#[async_trait]
pub trait QueryEncoder: Send + Sync {
    /// Embed a batch of strings, returning one vector per input in order.
    ///
    /// Fails with [`AppError::ModelUnavailable`] if the backend cannot be
    /// reached or loaded. Not retried internally.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Embed a single query string.
    ///
    /// Empty input is not special-cased; it still produces a vector.
    async fn encode(&self, query: &str) -> Result<Vec<f32>> {
        let mut vectors = self.embed_batch(&[query.to_string()]).await?;
        vectors
            .pop()
            .ok_or_else(|| AppError::ModelUnavailable("backend returned no embedding".into()))
    }

    /// Model identifier, for logs and cache keys.
    fn model_name(&self) -> &str;
}

// ============================================================================
// Encoder Provider
// ============================================================================

/// Runtime selection of the embedding backend.
#[derive(Debug, Clone)]
pub enum EncoderProvider {
    /// OpenAI-compatible `/embeddings` HTTP endpoint.
    Remote {
        /// Base URL of the API (e.g. `https://api.openai.com/v1`).
        base_url: String,
        /// Optional bearer token.
        api_key: Option<String>,
        /// Embedding model identifier.
        model: String,
    },
    /// Local fastembed ONNX inference (requires `local-embeddings`).
    Local {
        /// Model identifier, informational only; the bundled model is
        /// sentence-transformers/all-MiniLM-L6-v2.
        model: String,
    },
}

impl EncoderProvider {
    /// Create an encoder instance for this provider.
    pub fn create_encoder(&self, timeout: Duration) -> Result<Box<dyn QueryEncoder>> {
        match self {
            EncoderProvider::Remote {
                base_url,
                api_key,
                model,
            } => Ok(Box::new(RemoteEncoder::new(
                base_url.clone(),
                api_key.clone(),
                model.clone(),
                timeout,
            )?)),

            #[cfg(feature = "local-embeddings")]
            EncoderProvider::Local { model } => {
                Ok(Box::new(local::LocalEncoder::new(model.clone())))
            }

            #[cfg(not(feature = "local-embeddings"))]
            EncoderProvider::Local { .. } => Err(AppError::Configuration(
                "local embeddings requested but the 'local-embeddings' feature is disabled"
                    .into(),
            )),
        }
    }
}

// ============================================================================
// Remote Encoder (OpenAI-compatible /embeddings)
// ============================================================================

/// Encoder backed by an OpenAI-compatible `/embeddings` HTTP endpoint.
pub struct RemoteEncoder {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
}

#[derive(Debug, Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingDatum>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingDatum {
    index: usize,
    embedding: Vec<f32>,
}

impl RemoteEncoder {
    /// Create a new remote encoder with the given request timeout.
    pub fn new(
        base_url: String,
        api_key: Option<String>,
        model: String,
        timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::ModelUnavailable(format!("failed to build client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            model,
        })
    }
}

#[async_trait]
impl QueryEncoder for RemoteEncoder {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let url = format!("{}/embeddings", self.base_url);
        let body = serde_json::json!({
            "model": self.model,
            "input": texts,
        });

        let mut request = self.client.post(&url).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::ModelUnavailable(format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::ModelUnavailable(format!(
                "embedding backend returned {}",
                response.status()
            )));
        }

        let parsed: EmbeddingsResponse = response
            .json()
            .await
            .map_err(|e| AppError::ModelUnavailable(format!("invalid response body: {}", e)))?;

        if parsed.data.len() != texts.len() {
            return Err(AppError::ModelUnavailable(format!(
                "expected {} embeddings, got {}",
                texts.len(),
                parsed.data.len()
            )));
        }

        // The API is allowed to return data out of order; the `index`
        // field restores the input order.
        let mut data = parsed.data;
        data.sort_by_key(|d| d.index);
        Ok(data.into_iter().map(|d| d.embedding).collect())
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedEncoder;

    #[async_trait]
    impl QueryEncoder for FixedEncoder {
        async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            Ok(texts.iter().map(|t| vec![t.len() as f32, 1.0]).collect())
        }

        fn model_name(&self) -> &str {
            "fixed"
        }
    }

    #[tokio::test]
    async fn test_encode_uses_batch_contract() {
        let encoder = FixedEncoder;
        let vector = encoder.encode("hello").await.unwrap();
        assert_eq!(vector, vec![5.0, 1.0]);
    }

    #[tokio::test]
    async fn test_encode_is_deterministic() {
        let encoder = FixedEncoder;
        let a = encoder.encode("same query").await.unwrap();
        let b = encoder.encode("same query").await.unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn test_empty_input_still_produces_vector() {
        let encoder = FixedEncoder;
        let vector = encoder.encode("").await.unwrap();
        assert_eq!(vector.len(), 2);
    }

    #[cfg(not(feature = "local-embeddings"))]
    #[test]
    fn test_local_provider_requires_feature() {
        let provider = EncoderProvider::Local {
            model: "all-MiniLM-L6-v2".into(),
        };
        let result = provider.create_encoder(Duration::from_secs(5));
        assert!(matches!(result, Err(AppError::Configuration(_))));
    }
}
