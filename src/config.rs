//! Environment-driven configuration.
//!
//! All knobs come from environment variables (a `.env` file is honoured via
//! dotenvy in the binary). Only the Pinecone and Groq credentials are
//! required; everything else has a default.

use crate::embedding::EncoderProvider;
use crate::index::IndexProvider;
use crate::types::{AppError, Result};
use serde::Deserialize;
use std::env;
use std::time::Duration;

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// HTTP server binding.
    pub server: ServerConfig,
    /// Vector index connection.
    pub index: IndexConfig,
    /// Completion backend connection.
    pub llm: LlmConfig,
    /// Embedding backend selection.
    pub embedding: EmbeddingConfig,
    /// RAG pipeline knobs.
    pub rag: RagConfig,
    /// Triage layer knobs.
    pub triage: TriageConfig,
}

/// HTTP server binding.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Bind host.
    pub host: String,
    /// Bind port.
    pub port: u16,
}

/// Vector index connection settings.
#[derive(Debug, Clone, Deserialize)]
pub struct IndexConfig {
    /// Pinecone data-plane host for the docs index.
    pub pinecone_host: String,
    /// Pinecone API key.
    pub pinecone_api_key: String,
    /// Logical namespace to search.
    pub namespace: String,
}

/// Completion backend settings.
#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    /// Groq API key.
    pub groq_api_key: String,
    /// OpenAI-compatible base URL.
    pub groq_api_base: String,
    /// Model identifier.
    pub model: String,
}

/// Embedding backend settings.
#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddingConfig {
    /// `"remote"` (OpenAI-compatible endpoint) or `"local"` (fastembed,
    /// requires the `local-embeddings` feature).
    pub provider: String,
    /// Base URL for the remote provider.
    pub api_base: Option<String>,
    /// Bearer token for the remote provider.
    pub api_key: Option<String>,
    /// Embedding model identifier.
    pub model: String,
}

/// RAG pipeline knobs.
#[derive(Debug, Clone, Deserialize)]
pub struct RagConfig {
    /// Maximum candidates per retrieval.
    pub top_k: usize,
    /// Completion sampling temperature.
    pub temperature: f32,
    /// Completion response length bound, in tokens.
    pub max_tokens: u32,
    /// Timeout applied to every backend network call, in seconds.
    pub request_timeout_secs: u64,
}

/// Triage layer knobs.
#[derive(Debug, Clone, Deserialize)]
pub struct TriageConfig {
    /// Classification memoization capacity (entries).
    pub cache_capacity: usize,
}

impl Config {
    /// Load configuration from the environment.
    ///
    /// Required: `PINECONE_API_KEY`, `PINECONE_INDEX_HOST`, `GROQ_API_KEY`.
    pub fn from_env() -> Result<Self> {
        Ok(Config {
            server: ServerConfig {
                host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
                port: parse_var("PORT", 3000)?,
            },
            index: IndexConfig {
                pinecone_host: required("PINECONE_INDEX_HOST")?,
                pinecone_api_key: required("PINECONE_API_KEY")?,
                namespace: env::var("PINECONE_NAMESPACE")
                    .unwrap_or_else(|_| "__default__".to_string()),
            },
            llm: LlmConfig {
                groq_api_key: required("GROQ_API_KEY")?,
                groq_api_base: env::var("GROQ_API_BASE")
                    .unwrap_or_else(|_| crate::llm::groq::DEFAULT_API_BASE.to_string()),
                model: env::var("GROQ_MODEL")
                    .unwrap_or_else(|_| "llama-3.1-8b-instant".to_string()),
            },
            embedding: EmbeddingConfig {
                provider: env::var("EMBEDDING_PROVIDER").unwrap_or_else(|_| default_encoder()),
                api_base: env::var("EMBEDDING_API_BASE").ok(),
                api_key: env::var("EMBEDDING_API_KEY").ok(),
                model: env::var("EMBEDDING_MODEL")
                    .unwrap_or_else(|_| "all-MiniLM-L6-v2".to_string()),
            },
            rag: RagConfig {
                top_k: parse_var("RAG_TOP_K", 10)?,
                temperature: parse_var("RAG_TEMPERATURE", 0.2)?,
                max_tokens: parse_var("RAG_MAX_TOKENS", 800)?,
                request_timeout_secs: parse_var("REQUEST_TIMEOUT_SECS", 30)?,
            },
            triage: TriageConfig {
                cache_capacity: parse_var("TRIAGE_CACHE_CAPACITY", 1024)?,
            },
        })
    }

    /// Timeout applied to each backend network call.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.rag.request_timeout_secs)
    }

    /// The configured vector index provider.
    pub fn index_provider(&self) -> IndexProvider {
        IndexProvider::Pinecone {
            host: self.index.pinecone_host.clone(),
            api_key: self.index.pinecone_api_key.clone(),
        }
    }

    /// The configured embedding provider.
    pub fn encoder_provider(&self) -> Result<EncoderProvider> {
        match self.embedding.provider.as_str() {
            "remote" => {
                let base_url = self.embedding.api_base.clone().ok_or_else(|| {
                    AppError::Configuration(
                        "EMBEDDING_API_BASE is required for the remote embedding provider".into(),
                    )
                })?;
                Ok(EncoderProvider::Remote {
                    base_url,
                    api_key: self.embedding.api_key.clone(),
                    model: self.embedding.model.clone(),
                })
            }
            "local" => Ok(EncoderProvider::Local {
                model: self.embedding.model.clone(),
            }),
            other => Err(AppError::Configuration(format!(
                "unknown embedding provider '{}' (expected 'remote' or 'local')",
                other
            ))),
        }
    }
}

fn default_encoder() -> String {
    if cfg!(feature = "local-embeddings") {
        "local".to_string()
    } else {
        "remote".to_string()
    }
}

fn required(name: &str) -> Result<String> {
    env::var(name).map_err(|_| AppError::Configuration(format!("{} is not set", name)))
}

fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|e| AppError::Configuration(format!("invalid {}: {}", name, e))),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_embedding(provider: &str, api_base: Option<&str>) -> Config {
        Config {
            server: ServerConfig {
                host: "127.0.0.1".into(),
                port: 3000,
            },
            index: IndexConfig {
                pinecone_host: "https://docs-abc.svc.pinecone.io".into(),
                pinecone_api_key: "key".into(),
                namespace: "__default__".into(),
            },
            llm: LlmConfig {
                groq_api_key: "key".into(),
                groq_api_base: crate::llm::groq::DEFAULT_API_BASE.into(),
                model: "llama-3.1-8b-instant".into(),
            },
            embedding: EmbeddingConfig {
                provider: provider.into(),
                api_base: api_base.map(String::from),
                api_key: None,
                model: "all-MiniLM-L6-v2".into(),
            },
            rag: RagConfig {
                top_k: 10,
                temperature: 0.2,
                max_tokens: 800,
                request_timeout_secs: 30,
            },
            triage: TriageConfig {
                cache_capacity: 1024,
            },
        }
    }

    #[test]
    fn test_remote_encoder_requires_api_base() {
        let config = sample_embedding("remote", None);
        assert!(matches!(
            config.encoder_provider(),
            Err(AppError::Configuration(_))
        ));

        let config = sample_embedding("remote", Some("http://localhost:8080/v1"));
        assert!(config.encoder_provider().is_ok());
    }

    #[test]
    fn test_unknown_encoder_provider_rejected() {
        let config = sample_embedding("onnx", None);
        assert!(matches!(
            config.encoder_provider(),
            Err(AppError::Configuration(_))
        ));
    }

    #[test]
    fn test_request_timeout_conversion() {
        let config = sample_embedding("local", None);
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
    }
}
