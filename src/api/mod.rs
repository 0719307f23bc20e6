//! HTTP API handlers and routes.
//!
//! The REST surface over the triage engine, built on Axum:
//!
//! - `GET /health` - liveness check
//! - `POST /triage` - classify a ticket and answer or route it
//! - `POST /answer` - run the RAG pipeline directly, no triage policy
//! - `POST /retrieve` - diagnostic retrieval with recomputed cosines
//!
//! Backend outages surface as `503`; the exact backend detail is logged
//! server-side, not leaked to clients.

/// Request handlers for each endpoint.
pub mod handlers;
/// Router configuration and route definitions.
pub mod routes;

pub use routes::create_router;

use utoipa::OpenApi;

/// OpenAPI document for the triage API.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health,
        handlers::triage,
        handlers::answer,
        handlers::retrieve
    ),
    components(schemas(
        crate::types::TriageRequest,
        crate::types::TriageResponse,
        crate::types::TriageReply,
        crate::types::Classification,
        crate::types::Topic,
        crate::types::Sentiment,
        crate::types::Priority,
        crate::types::AnswerResponse,
        crate::types::RetrieveRequest,
        crate::types::RetrieveResponse,
        crate::types::RetrievedChunk
    )),
    tags(
        (name = "triage", description = "Ticket triage endpoints"),
        (name = "rag", description = "Direct RAG pipeline endpoints")
    )
)]
pub struct ApiDoc;
