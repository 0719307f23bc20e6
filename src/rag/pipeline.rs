//! End-to-end RAG pipeline: encode, retrieve, synthesize.

use crate::embedding::QueryEncoder;
use crate::rag::retriever::{rank_by_cosine, Retriever};
use crate::rag::synthesizer::Synthesizer;
use crate::types::{CandidateChunk, Result, SynthesisResult};
use std::sync::Arc;

/// Composes the encoder, retriever, and synthesizer.
///
/// All collaborators are injected at construction; the pipeline holds no
/// other state and a single call runs the three steps sequentially.
pub struct RagPipeline {
    encoder: Arc<dyn QueryEncoder>,
    retriever: Retriever,
    synthesizer: Synthesizer,
}

impl RagPipeline {
    /// Create a pipeline from its three collaborators.
    pub fn new(
        encoder: Arc<dyn QueryEncoder>,
        retriever: Retriever,
        synthesizer: Synthesizer,
    ) -> Self {
        Self {
            encoder,
            retriever,
            synthesizer,
        }
    }

    /// Answer a query from the documentation corpus.
    ///
    /// Returns the synthesis result; the caller decides, via the source set
    /// and [`crate::rag::is_no_answer`], whether to display the answer or a
    /// routing fallback.
    pub async fn answer(&self, query: &str) -> Result<SynthesisResult> {
        let vector = self.encoder.encode(query).await?;
        let candidates = self.retriever.retrieve(&vector).await?;
        self.synthesizer.synthesize(query, &candidates).await
    }

    /// Diagnostic retrieval: candidates in index order, each paired with
    /// its locally recomputed cosine similarity (0.0 when the index did not
    /// return the raw vector). Does not call the completion backend.
    pub async fn retrieve(
        &self,
        query: &str,
        top_k: Option<usize>,
    ) -> Result<Vec<(CandidateChunk, f32)>> {
        let vector = self.encoder.encode(query).await?;
        let top_k = top_k.unwrap_or_else(|| self.retriever.top_k());
        let candidates = self.retriever.retrieve_top(&vector, top_k).await?;

        let cosines: std::collections::HashMap<String, f32> = rank_by_cosine(&vector, &candidates)
            .into_iter()
            .map(|(id, sim, _)| (id, sim))
            .collect();

        Ok(candidates
            .into_iter()
            .map(|c| {
                let sim = cosines.get(&c.id).copied().unwrap_or(0.0);
                (c, sim)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::QueryEncoder;
    use crate::index::{InMemoryIndex, StoredChunk};
    use crate::llm::CompletionClient;
    use crate::rag::retriever::RetrieverConfig;
    use crate::rag::synthesizer::SynthesizerConfig;
    use crate::types::Result;
    use async_trait::async_trait;

    /// Deterministic two-dimensional "embedding": snowflake-ish queries
    /// point one way, everything else the other.
    struct KeywordEncoder;

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

    struct CannedLlm(&'static str);

    #[async_trait]
    impl CompletionClient for CannedLlm {
        async fn complete(&self, _p: &str, _t: f32, _m: u32) -> Result<String> {
            Ok(self.0.to_string())
        }

        fn model_name(&self) -> &str {
            "canned"
        }
    }

    fn snowflake_corpus() -> InMemoryIndex {
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

    fn pipeline_over(index: InMemoryIndex, answer: &'static str) -> RagPipeline {
        RagPipeline::new(
            Arc::new(KeywordEncoder),
            Retriever::new(Arc::new(index), RetrieverConfig::default()),
            Synthesizer::new(Arc::new(CannedLlm(answer)), SynthesizerConfig::default()),
        )
    }

    #[tokio::test]
    async fn test_answer_with_sources_dedups_urls() {
        let pipeline = pipeline_over(
            snowflake_corpus(),
            "Open Admin and add a Snowflake source using ACCOUNTADMIN.",
        );

        let result = pipeline
            .answer("How do I connect Snowflake to the platform?")
            .await
            .unwrap();

        assert!(!crate::rag::is_no_answer(&result.answer));
        assert_eq!(result.sources.len(), 2);
        assert!(result.sources.contains("docs/snowflake"));
        assert!(result.sources.contains("docs/connectors"));
    }

    #[tokio::test]
    async fn test_answer_empty_corpus_is_sentinel() {
        let pipeline = pipeline_over(InMemoryIndex::new(), "unused");

        let result = pipeline.answer("anything at all").await.unwrap();

        assert_eq!(result.answer, "I don't know.");
        assert!(result.sources.is_empty());
    }

    #[tokio::test]
    async fn test_retrieve_returns_index_order_with_cosines() {
        let pipeline = pipeline_over(snowflake_corpus(), "unused");

        let retrieved = pipeline
            .retrieve("snowflake connection", Some(2))
            .await
            .unwrap();

        assert_eq!(retrieved.len(), 2);
        assert_eq!(retrieved[0].0.id, "sf-1");
        assert!(retrieved[0].1 > 0.9);
    }
}
