//! Local embedding inference via fastembed (ONNX).
//!
//! The model is downloaded/loaded once, on first use, guarded by a
//! [`tokio::sync::OnceCell`] so concurrent first calls cannot race to load
//! it twice. After init the model lives for the rest of the process.

use crate::embedding::QueryEncoder;
use crate::types::{AppError, Result};
use async_trait::async_trait;
use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::OnceCell;

/// Encoder backed by a locally loaded all-MiniLM-L6-v2 ONNX model.
pub struct LocalEncoder {
    model: OnceCell<Arc<Mutex<TextEmbedding>>>,
    model_name: String,
}

impl LocalEncoder {
    /// Create an encoder. The model is not loaded until the first call.
    pub fn new(model_name: String) -> Self {
        Self {
            model: OnceCell::new(),
            model_name,
        }
    }

    async fn model(&self) -> Result<Arc<Mutex<TextEmbedding>>> {
        self.model
            .get_or_try_init(|| async {
                tracing::info!(model = %self.model_name, "loading local embedding model");
                // Model load is blocking (file IO + ONNX session creation).
                let model = tokio::task::spawn_blocking(|| {
                    TextEmbedding::try_new(InitOptions::new(EmbeddingModel::AllMiniLML6V2))
                })
                .await
                .map_err(|e| AppError::ModelUnavailable(format!("model load task failed: {}", e)))?
                .map_err(|e| AppError::ModelUnavailable(format!("failed to load model: {}", e)))?;
                Ok::<_, AppError>(Arc::new(Mutex::new(model)))
            })
            .await
            .cloned()
    }
}

#[async_trait]
impl QueryEncoder for LocalEncoder {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let model = self.model().await?;
        let texts = texts.to_vec();
        tokio::task::spawn_blocking(move || {
            let mut guard = model.lock();
            guard
                .embed(texts, None)
                .map_err(|e| AppError::ModelUnavailable(format!("embedding failed: {}", e)))
        })
        .await
        .map_err(|e| AppError::ModelUnavailable(format!("embedding task failed: {}", e)))?
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}
