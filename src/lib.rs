//! # Triage Server
//!
//! A support-ticket triage service with a retrieval-augmented answer path.
//!
//! ## Overview
//!
//! A ticket is first classified by keyword rules into a topic, sentiment,
//! and priority. Tickets on documented topics are answered from a vector
//! index of product documentation: the query is embedded, the nearest
//! chunks are retrieved, and a completion model synthesizes an answer
//! grounded in those chunks, cited by their deduplicated source URLs.
//! Anything else, and anything the corpus cannot answer, is routed to the
//! appropriate human team.
//!
//! ## Quick Start (Library Usage)
//!
//! ```rust,ignore
//! use std::num::NonZeroUsize;
//! use std::sync::Arc;
//! use triage::index::{InMemoryIndex, StoredChunk};
//! use triage::rag::{RagPipeline, Retriever, RetrieverConfig, Synthesizer, SynthesizerConfig};
//! use triage::triage::TriageEngine;
//!
//! let index = Arc::new(InMemoryIndex::new());
//! let retriever = Retriever::new(index, RetrieverConfig::default());
//! let synthesizer = Synthesizer::new(llm, SynthesizerConfig::default());
//! let pipeline = RagPipeline::new(encoder, retriever, synthesizer);
//! let engine = TriageEngine::new(pipeline, NonZeroUsize::new(1024).unwrap());
//! ```
//!
//! ## Modules
//!
//! - [`api`] - REST API handlers and routes
//! - [`config`] - Environment-driven configuration
//! - [`embedding`] - Query encoders (remote endpoint or local fastembed)
//! - [`index`] - Vector index clients (Pinecone, in-memory)
//! - [`llm`] - Completion clients (Groq)
//! - [`rag`] - Retriever, synthesizer, and the composed pipeline
//! - [`triage`] - Classifier, memoization cache, and the triage engine
//! - [`types`] - Common types and error handling

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

/// HTTP API handlers and routes.
pub mod api;
/// Environment-driven configuration.
pub mod config;
/// Query encoders.
pub mod embedding;
/// Vector index clients.
pub mod index;
/// Completion clients.
pub mod llm;
/// Retrieval-augmented generation pipeline.
pub mod rag;
/// Ticket classification and triage policy.
pub mod triage;
/// Core types (requests, responses, errors).
pub mod types;

// Re-export commonly used types
pub use config::Config;
pub use rag::{is_no_answer, RagPipeline, NO_ANSWER};
pub use triage::TriageEngine;
pub use types::{AppError, Result};

use crate::rag::{Retriever, RetrieverConfig, Synthesizer, SynthesizerConfig};
use std::num::NonZeroUsize;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// The triage engine (classifier + RAG pipeline).
    pub engine: Arc<TriageEngine>,
}

impl AppState {
    /// Wire up the engine from configuration: remote backends for the
    /// encoder, index, and completion model, all sharing one timeout.
    pub fn from_config(config: &Config) -> Result<Self> {
        let timeout = config.request_timeout();

        let encoder: Arc<dyn embedding::QueryEncoder> =
            Arc::from(config.encoder_provider()?.create_encoder(timeout)?);
        let index = config.index_provider().create_index(timeout)?;
        let llm: Arc<dyn llm::CompletionClient> = Arc::new(llm::groq::GroqClient::with_base_url(
            config.llm.groq_api_base.clone(),
            config.llm.groq_api_key.clone(),
            config.llm.model.clone(),
            timeout,
        )?);

        let retriever = Retriever::new(
            Arc::from(index),
            RetrieverConfig {
                top_k: config.rag.top_k,
                namespace: config.index.namespace.clone(),
                include_values: true,
            },
        );
        let synthesizer = Synthesizer::new(
            llm,
            SynthesizerConfig {
                temperature: config.rag.temperature,
                max_tokens: config.rag.max_tokens,
            },
        );
        let pipeline = RagPipeline::new(encoder, retriever, synthesizer);

        let capacity = NonZeroUsize::new(config.triage.cache_capacity).ok_or_else(|| {
            AppError::Configuration("TRIAGE_CACHE_CAPACITY must be at least 1".into())
        })?;

        Ok(Self {
            engine: Arc::new(TriageEngine::new(pipeline, capacity)),
        })
    }
}
