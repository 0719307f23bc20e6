//! Ticket triage: classification plus the caller-side RAG contract.
//!
//! The [`TriageEngine`] is the "external caller" of the RAG core: it
//! classifies a ticket, consults the topic allow-list to decide whether the
//! RAG path applies at all, and applies the fallback policy on the result
//! (no sources, or a no-answer response, means the ticket is routed to a
//! human team instead of answered).

use crate::rag::{is_no_answer, RagPipeline};
use crate::types::{Classification, Result, Topic, TriageReply, TriageResponse};
use std::num::NonZeroUsize;

pub mod cache;
pub mod classifier;

pub use cache::ClassificationCache;

/// Classifies tickets and drives the RAG pipeline for documented topics.
pub struct TriageEngine {
    pipeline: RagPipeline,
    cache: ClassificationCache,
}

impl TriageEngine {
    /// Create an engine over a pipeline, memoizing up to `cache_capacity`
    /// classifications.
    pub fn new(pipeline: RagPipeline, cache_capacity: NonZeroUsize) -> Self {
        Self {
            pipeline,
            cache: ClassificationCache::new(cache_capacity),
        }
    }

    /// Classify a query, memoized by exact query string.
    pub fn classify(&self, query: &str) -> Classification {
        if let Some(hit) = self.cache.get(query) {
            return hit;
        }
        let classification = classifier::classify(query);
        self.cache.insert(query, classification);
        classification
    }

    /// Triage a ticket end to end.
    ///
    /// Backend failures ([`crate::types::AppError`]) propagate; the routing
    /// fallback is reserved for the non-error "no answer available"
    /// outcomes.
    pub async fn triage(&self, query: &str) -> Result<TriageResponse> {
        let classification = self.classify(query);
        tracing::info!(
            topic = classification.topic.label(),
            sentiment = ?classification.sentiment,
            priority = ?classification.priority,
            "classified ticket"
        );

        if !classification.topic.is_documented() {
            return Ok(TriageResponse {
                classification,
                response: routed(classification.topic),
            });
        }

        let result = self.pipeline.answer(query).await?;

        // Caller contract: an empty source set or the no-answer marker in
        // the response means we have nothing grounded to show.
        let response = if result.sources.is_empty() || is_no_answer(&result.answer) {
            routed(classification.topic)
        } else {
            let mut sources: Vec<String> = result.sources.into_iter().collect();
            sources.sort();
            TriageReply::Answer {
                answer: result.answer,
                sources,
            }
        };

        Ok(TriageResponse {
            classification,
            response,
        })
    }

    /// Access the underlying pipeline (for the direct answer/retrieve
    /// endpoints).
    pub fn pipeline(&self) -> &RagPipeline {
        &self.pipeline
    }
}

fn routed(topic: Topic) -> TriageReply {
    TriageReply::Routed {
        message: format!(
            "This ticket has been classified as a '{}' issue and routed to the appropriate team.",
            topic.label()
        ),
    }
}
