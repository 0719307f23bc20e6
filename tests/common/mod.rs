//! Shared test fixtures: deterministic fakes over the crate's trait seams.

#![allow(dead_code)]

use async_trait::async_trait;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use triage::embedding::QueryEncoder;
use triage::index::{InMemoryIndex, StoredChunk};
use triage::llm::CompletionClient;
use triage::rag::{RagPipeline, Retriever, RetrieverConfig, Synthesizer, SynthesizerConfig};
use triage::types::{AppError, Result};
use triage::{AppState, TriageEngine};

/// Deterministic two-dimensional "embedding": queries mentioning snowflake
/// point along one axis, everything else along the other.
pub struct KeywordEncoder;

#[async_trait]
impl QueryEncoder for KeywordEncoder {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts
            .iter()
            .map(|t| {
                if t.to_lowercase().contains("snowflake") {
                    vec![1.0, 0.0]
                } else {
                    vec![0.0, 1.0]
                }
            })
            .collect())
    }

    fn model_name(&self) -> &str {
        "keyword"
    }
}

/// Completion fake that returns a fixed answer (or a fixed failure) and
/// counts how many times it was called.
pub struct ScriptedLlm {
    answer: String,
    fail: bool,
    pub calls: Arc<AtomicUsize>,
}

impl ScriptedLlm {
    pub fn answering(answer: &str) -> Self {
        Self {
            answer: answer.to_string(),
            fail: false,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn failing() -> Self {
        Self {
            answer: String::new(),
            fail: true,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }
}

#[async_trait]
impl CompletionClient for ScriptedLlm {
    async fn complete(&self, _prompt: &str, _temperature: f32, _max_tokens: u32) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(AppError::GenerationUnavailable(
                "scripted failure".to_string(),
            ));
        }
        Ok(self.answer.clone())
    }

    fn model_name(&self) -> &str {
        "scripted"
    }
}

/// A small documentation corpus: two Snowflake chunks sharing a URL plus a
/// general connector chunk, all aligned with the snowflake axis.
pub fn docs_corpus() -> InMemoryIndex {
    let index = InMemoryIndex::new();
    index.upsert(
        "__default__",
        vec![
            StoredChunk {
                id: "sf-1".into(),
                values: vec![0.95, 0.05],
                url: Some("docs/snowflake".into()),
                text: Some("Connection steps: open Admin, add a Snowflake source.".into()),
            },
            StoredChunk {
                id: "sf-2".into(),
                values: vec![0.9, 0.1],
                url: Some("docs/snowflake".into()),
                text: Some("Snowflake credentials require the ACCOUNTADMIN role.".into()),
            },
            StoredChunk {
                id: "conn-1".into(),
                values: vec![0.8, 0.2],
                url: Some("docs/connectors".into()),
                text: Some("Connectors sync metadata on a schedule.".into()),
            },
        ],
    );
    index
}

/// Assemble a full pipeline over an in-memory index and a scripted LLM.
pub fn pipeline_over(index: InMemoryIndex, llm: ScriptedLlm) -> RagPipeline {
    RagPipeline::new(
        Arc::new(KeywordEncoder),
        Retriever::new(Arc::new(index), RetrieverConfig::default()),
        Synthesizer::new(Arc::new(llm), SynthesizerConfig::default()),
    )
}

/// Application state over an in-memory corpus, for API tests.
pub fn app_state(index: InMemoryIndex, llm: ScriptedLlm) -> AppState {
    let engine = TriageEngine::new(
        pipeline_over(index, llm),
        NonZeroUsize::new(64).expect("non-zero capacity"),
    );
    AppState {
        engine: Arc::new(engine),
    }
}
