//! Completion backend abstraction.
//!
//! The synthesizer only needs a single operation: turn one user-role prompt
//! into text, with a temperature and an output-length bound. Providers
//! implement [`CompletionClient`]; [`groq::GroqClient`] covers Groq's
//! OpenAI-compatible chat-completions API (the base URL is overridable, so
//! any OpenAI-compatible endpoint works).

use crate::types::Result;
use async_trait::async_trait;

pub mod groq;

/// Prompt-to-text completion backend.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Generate a completion for a single user-role prompt.
    ///
    /// Fails with [`crate::types::AppError::GenerationUnavailable`] if the
    /// backend cannot be reached or rejects the request. Not retried
    /// internally.
    async fn complete(&self, prompt: &str, temperature: f32, max_tokens: u32) -> Result<String>;

    /// Model identifier, for logs.
    fn model_name(&self) -> &str;
}
