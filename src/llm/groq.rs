//! Groq chat-completions client.
//!
//! Groq exposes an OpenAI-compatible API; the default base URL is
//! `https://api.groq.com/openai/v1` and can be overridden for compatible
//! endpoints or tests.

use crate::llm::CompletionClient;
use crate::types::{AppError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default Groq API base URL.
pub const DEFAULT_API_BASE: &str = "https://api.groq.com/openai/v1";

/// Client for Groq's OpenAI-compatible chat-completions endpoint.
pub struct GroqClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

// Typed request body: serializing `temperature` as `f32` keeps its shortest
// decimal form on the wire (`json!` would widen it to f64 and emit
// 0.20000000298023224 for 0.2).
#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: String,
}

impl GroqClient {
    /// Create a client for `model` against the default Groq endpoint.
    pub fn new(api_key: String, model: String, timeout: Duration) -> Result<Self> {
        Self::with_base_url(DEFAULT_API_BASE.to_string(), api_key, model, timeout)
    }

    /// Create a client against a custom OpenAI-compatible base URL.
    pub fn with_base_url(
        base_url: String,
        api_key: String,
        model: String,
        timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                AppError::GenerationUnavailable(format!("failed to build client: {}", e))
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            model,
        })
    }
}

#[async_trait]
impl CompletionClient for GroqClient {
    async fn complete(&self, prompt: &str, temperature: f32, max_tokens: u32) -> Result<String> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = ChatRequest {
            model: &self.model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature,
            max_tokens,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::GenerationUnavailable(format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::GenerationUnavailable(format!(
                "completion backend returned {}",
                response.status()
            )));
        }

        let parsed: ChatResponse = response.json().await.map_err(|e| {
            AppError::GenerationUnavailable(format!("invalid response body: {}", e))
        })?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| AppError::GenerationUnavailable("response carried no choices".into()))
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
