//! Request handlers for the triage API.

use crate::types::{
    AnswerResponse, AppError, Result, RetrieveRequest, RetrieveResponse, RetrievedChunk,
    TriageRequest, TriageResponse,
};
use crate::AppState;
use axum::{extract::State, Json};

const PREVIEW_CHARS: usize = 150;

/// Liveness check
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up")),
    tag = "triage"
)]
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Classify a ticket and either answer it or route it to a team
#[utoipa::path(
    post,
    path = "/triage",
    request_body = TriageRequest,
    responses(
        (status = 200, description = "Triage outcome", body = TriageResponse),
        (status = 400, description = "Empty query"),
        (status = 503, description = "A backend is unavailable")
    ),
    tag = "triage"
)]
pub async fn triage(
    State(state): State<AppState>,
    Json(payload): Json<TriageRequest>,
) -> Result<Json<TriageResponse>> {
    let query = non_empty(&payload.query)?;
    let response = state.engine.triage(query).await?;
    Ok(Json(response))
}

/// Run the RAG pipeline directly, bypassing classification and routing
#[utoipa::path(
    post,
    path = "/answer",
    request_body = TriageRequest,
    responses(
        (status = 200, description = "Synthesized answer", body = AnswerResponse),
        (status = 400, description = "Empty query"),
        (status = 503, description = "A backend is unavailable")
    ),
    tag = "rag"
)]
pub async fn answer(
    State(state): State<AppState>,
    Json(payload): Json<TriageRequest>,
) -> Result<Json<AnswerResponse>> {
    let query = non_empty(&payload.query)?;
    let result = state.engine.pipeline().answer(query).await?;

    let mut sources: Vec<String> = result.sources.into_iter().collect();
    sources.sort();
    Ok(Json(AnswerResponse {
        answer: result.answer,
        sources,
    }))
}

/// Inspect what the index returns for a query, with recomputed cosines
#[utoipa::path(
    post,
    path = "/retrieve",
    request_body = RetrieveRequest,
    responses(
        (status = 200, description = "Retrieved candidates", body = RetrieveResponse),
        (status = 400, description = "Empty query"),
        (status = 503, description = "A backend is unavailable")
    ),
    tag = "rag"
)]
pub async fn retrieve(
    State(state): State<AppState>,
    Json(payload): Json<RetrieveRequest>,
) -> Result<Json<RetrieveResponse>> {
    let query = non_empty(&payload.query)?;
    let retrieved = state
        .engine
        .pipeline()
        .retrieve(query, payload.top_k)
        .await?;

    let matches = retrieved
        .into_iter()
        .map(|(chunk, cosine)| RetrievedChunk {
            url: chunk.source(),
            preview: chunk.text.as_deref().map(preview),
            id: chunk.id,
            score: chunk.score,
            cosine,
        })
        .collect();

    Ok(Json(RetrieveResponse { matches }))
}

fn non_empty(query: &str) -> Result<&str> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return Err(AppError::InvalidInput("query must not be empty".into()));
    }
    Ok(trimmed)
}

fn preview(text: &str) -> String {
    text.chars().take(PREVIEW_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_empty_trims() {
        assert_eq!(non_empty("  hi  ").unwrap(), "hi");
        assert!(matches!(non_empty("   "), Err(AppError::InvalidInput(_))));
    }

    #[test]
    fn test_preview_respects_char_boundaries() {
        let long = "é".repeat(200);
        assert_eq!(preview(&long).chars().count(), PREVIEW_CHARS);
        assert_eq!(preview("short"), "short");
    }
}
