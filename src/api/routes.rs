use crate::AppState;
use axum::{
    routing::{get, post},
    Json, Router,
};
use utoipa::OpenApi;

/// Build the API router. State is applied by the caller.
pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(crate::api::handlers::health))
        .route("/triage", post(crate::api::handlers::triage))
        .route("/answer", post(crate::api::handlers::answer))
        .route("/retrieve", post(crate::api::handlers::retrieve))
        .route(
            "/openapi.json",
            get(|| async { Json(crate::api::ApiDoc::openapi()) }),
        )
}
