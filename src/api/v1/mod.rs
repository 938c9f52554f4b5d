//! v1 API endpoints

pub mod ask;
pub mod documents;

use axum::{routing::post, Router};

use super::state::AppState;

/// Create v1 API router
pub fn create_v1_router() -> Router<AppState> {
    Router::new()
        .route("/ask", post(ask::ask))
        .route("/documents", post(documents::ingest_documents))
}
