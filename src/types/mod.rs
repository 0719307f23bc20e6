//! Core types for the triage pipeline: candidate chunks, synthesis results,
//! classification labels, API request/response shapes, and error handling.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use utoipa::ToSchema;

// ============= Retrieval Types =============

/// Sentinel used when a candidate carries no source URL.
pub const UNKNOWN_SOURCE: &str = "N/A";

/// A single ranked match returned by the vector index.
///
/// The index's own relevance score is authoritative for ordering; `values`
/// is only present when the index was asked to return raw vectors and is
/// used for diagnostic similarity recomputation, never for reordering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateChunk {
    /// Identifier, unique within the index.
    pub id: String,
    /// Relevance score assigned by the index (higher = more similar,
    /// not guaranteed normalized).
    pub score: f32,
    /// Source URL from the chunk metadata, if any.
    pub url: Option<String>,
    /// Text content from the chunk metadata. Absent text means the chunk
    /// contributes nothing to the synthesis context.
    pub text: Option<String>,
    /// Raw stored vector, present only when the index returns it.
    pub values: Option<Vec<f32>>,
}

impl CandidateChunk {
    /// The source URL, falling back to the `"N/A"` sentinel.
    pub fn source(&self) -> String {
        self.url.clone().unwrap_or_else(|| UNKNOWN_SOURCE.to_string())
    }
}

/// Answer text plus the deduplicated set of contributing source URLs.
///
/// Constructed fresh per call and never persisted. Source order is not
/// guaranteed (set semantics).
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisResult {
    /// The completion text, or the no-answer sentinel.
    pub answer: String,
    /// Deduplicated source URLs.
    pub sources: HashSet<String>,
}

// ============= Classification Types =============

/// Ticket topic label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Topic {
    /// Step-by-step / how-to questions.
    #[serde(rename = "How-to")]
    HowTo,
    /// Product and feature questions.
    Product,
    /// Best-practice guidance.
    #[serde(rename = "Best practices")]
    BestPractices,
    /// API and SDK usage.
    #[serde(rename = "API/SDK")]
    ApiSdk,
    /// Single sign-on.
    #[serde(rename = "SSO")]
    Sso,
    /// Data-source connectors.
    Connector,
    /// Billing and invoicing.
    Billing,
    /// Security questions.
    Security,
    /// Anything else; routed to a human team.
    Other,
}

impl Topic {
    /// Whether this topic is answerable from documentation and may be
    /// routed through the RAG pipeline. `Other` never reaches the core.
    pub fn is_documented(&self) -> bool {
        !matches!(self, Topic::Other)
    }

    /// Human-readable label, matching the serialized form.
    pub fn label(&self) -> &'static str {
        match self {
            Topic::HowTo => "How-to",
            Topic::Product => "Product",
            Topic::BestPractices => "Best practices",
            Topic::ApiSdk => "API/SDK",
            Topic::Sso => "SSO",
            Topic::Connector => "Connector",
            Topic::Billing => "Billing",
            Topic::Security => "Security",
            Topic::Other => "Other",
        }
    }
}

/// Ticket sentiment label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Sentiment {
    /// The ticket mentions an error, issue, or failure.
    Negative,
    /// Everything else.
    Neutral,
}

/// Ticket priority label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Priority {
    /// The ticket is flagged as urgent.
    High,
    /// Everything else.
    Normal,
}

/// Topic, sentiment, and priority assigned to a ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub struct Classification {
    /// Assigned topic.
    pub topic: Topic,
    /// Assigned sentiment.
    pub sentiment: Sentiment,
    /// Assigned priority.
    pub priority: Priority,
}

// ============= API Request/Response Types =============

/// Request body for the triage and answer endpoints.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TriageRequest {
    /// The raw ticket/query text.
    pub query: String,
}

/// Response body for `POST /triage`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TriageResponse {
    /// Internal analysis of the ticket.
    pub classification: Classification,
    /// Final response shown to the requester.
    pub response: TriageReply,
}

/// Either a grounded answer with sources, or a routing fallback.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TriageReply {
    /// A grounded answer produced by the RAG pipeline.
    Answer {
        /// The answer text.
        answer: String,
        /// Deduplicated source URLs.
        sources: Vec<String>,
    },
    /// The ticket was routed to a human team.
    Routed {
        /// Fallback message describing the routing.
        message: String,
    },
}

/// Response body for `POST /answer`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AnswerResponse {
    /// The answer text (possibly the no-answer sentinel).
    pub answer: String,
    /// Deduplicated source URLs.
    pub sources: Vec<String>,
}

/// Request body for the diagnostic retrieval endpoint.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RetrieveRequest {
    /// The raw query text.
    pub query: String,
    /// Maximum number of candidates to return.
    #[serde(default)]
    pub top_k: Option<usize>,
}

/// A single candidate in the diagnostic retrieval response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RetrievedChunk {
    /// Chunk identifier.
    pub id: String,
    /// The index's native relevance score.
    pub score: f32,
    /// Locally recomputed cosine similarity (0.0 when the index did not
    /// return the raw vector).
    pub cosine: f32,
    /// Source URL or `"N/A"`.
    pub url: String,
    /// First 150 characters of the chunk text, if present.
    pub preview: Option<String>,
}

/// Response body for `POST /retrieve`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RetrieveResponse {
    /// Candidates in the index's native ranking order.
    pub matches: Vec<RetrievedChunk>,
}

// ============= Error Types =============

/// Errors surfaced by the triage core and its HTTP surface.
///
/// Backend connectivity/auth failures are fatal for the request and are
/// never retried or swallowed inside the core. An empty candidate set is
/// not an error.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// The embedding backend could not be reached or loaded.
    #[error("embedding backend unavailable: {0}")]
    ModelUnavailable(String),

    /// The vector index rejected the request or could not be reached.
    #[error("vector index unavailable: {0}")]
    IndexUnavailable(String),

    /// The completion backend rejected the request or could not be reached.
    #[error("completion backend unavailable: {0}")]
    GenerationUnavailable(String),

    /// Invalid or missing configuration.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The caller supplied invalid input.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::http::StatusCode;

        // Backend failures are reported generically; internal detail stays
        // in the logs, not in the response body.
        let (status, message) = match &self {
            AppError::ModelUnavailable(_)
            | AppError::IndexUnavailable(_)
            | AppError::GenerationUnavailable(_) => {
                tracing::error!(error = %self, "backend failure");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "service temporarily unavailable".to_string(),
                )
            }
            AppError::Configuration(_) => {
                tracing::error!(error = %self, "configuration failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
        };

        let body = serde_json::json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, AppError>;
