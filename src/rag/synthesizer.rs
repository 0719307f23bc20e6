//! Grounded answer synthesis.
//!
//! Builds a support-agent prompt from the retrieved chunks, calls the
//! completion backend with a bounded response length and low temperature,
//! and derives the deduplicated source list.
//!
//! Source policy: every candidate in the set contributes its source URL,
//! whether or not it carried text for the context block (a textless chunk
//! still points at a real document). Callers rely on this; change it
//! deliberately or not at all.

use crate::llm::CompletionClient;
use crate::types::{CandidateChunk, Result, SynthesisResult};
use std::collections::HashSet;
use std::sync::Arc;

/// Exact sentinel returned when there is nothing to ground an answer in.
pub const NO_ANSWER: &str = "I don't know.";

/// Substring the caller contract checks for to treat a model response as a
/// non-answer. Case-sensitive, substring match (no trailing period, so it
/// also covers `"I don't know"` mid-sentence).
const NO_ANSWER_MARKER: &str = "I don't know";

/// Whether an answer should be treated as a non-answer.
///
/// This is the caller-side contract: the synthesizer never suppresses such
/// answers itself. The check is an exact, case-sensitive substring match;
/// callers depending on it should not swap in fuzzy matching silently.
pub fn is_no_answer(answer: &str) -> bool {
    answer.contains(NO_ANSWER_MARKER)
}

/// Synthesizer configuration knobs.
#[derive(Debug, Clone)]
pub struct SynthesizerConfig {
    /// Sampling temperature; low values favor groundedness over creativity.
    pub temperature: f32,
    /// Response length bound, in tokens.
    pub max_tokens: u32,
}

impl Default for SynthesizerConfig {
    fn default() -> Self {
        Self {
            temperature: 0.2,
            max_tokens: 800,
        }
    }
}

/// Turns a ranked candidate set into a grounded answer plus sources.
pub struct Synthesizer {
    llm: Arc<dyn CompletionClient>,
    config: SynthesizerConfig,
}

impl Synthesizer {
    /// Create a synthesizer over the given completion backend.
    pub fn new(llm: Arc<dyn CompletionClient>, config: SynthesizerConfig) -> Self {
        Self { llm, config }
    }

    /// Produce an answer for `query` grounded in `candidates`.
    ///
    /// An empty candidate set short-circuits to the [`NO_ANSWER`] sentinel
    /// with an empty source set, without calling the completion backend.
    /// This is a terminal, non-error outcome: callers use it to decide
    /// whether to show a routing fallback instead of an answer.
    pub async fn synthesize(
        &self,
        query: &str,
        candidates: &[CandidateChunk],
    ) -> Result<SynthesisResult> {
        if candidates.is_empty() {
            return Ok(SynthesisResult {
                answer: NO_ANSWER.to_string(),
                sources: HashSet::new(),
            });
        }

        let context = build_context(candidates);
        let prompt = build_prompt(query, &context);

        tracing::debug!(
            model = self.llm.model_name(),
            candidates = candidates.len(),
            context_bytes = context.len(),
            "synthesizing answer"
        );

        let answer = self
            .llm
            .complete(&prompt, self.config.temperature, self.config.max_tokens)
            .await?;

        let sources: HashSet<String> = candidates.iter().map(|c| c.source()).collect();

        Ok(SynthesisResult { answer, sources })
    }
}

/// Concatenate candidate texts in ranked order, blank-line separated.
/// Candidates without text contribute nothing here (but still contribute
/// their source URL).
fn build_context(candidates: &[CandidateChunk]) -> String {
    candidates
        .iter()
        .filter_map(|c| c.text.as_deref())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// The grounded instruction prompt. The "say \"I don't know\"" instruction
/// is load-bearing: it is what makes the no-answer contract detectable.
fn build_prompt(query: &str, context: &str) -> String {
    format!(
        "You are a helpful support agent.\n\
         Use the context below to answer the question.\n\
         If the answer is not in the context, say \"I don't know\".\n\
         \n\
         Context:\n\
         {context}\n\
         \n\
         Question: {query}\n\
         Answer:"
    )
}
