//! Document ingestion endpoint

use axum::extract::State;
use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json, ValidatedJson};
use crate::domain::ingestion::SourceDocument;
use crate::infrastructure::vector_store::IngestReport;

const INLINE_SOURCE: &str = "inline";

/// Exactly one of `url` or `text` must be given
#[derive(Debug, Deserialize, Validate)]
#[validate(schema(function = "validate_single_source"))]
pub struct IngestRequest {
    #[validate(url(message = "url must be an absolute http(s) URL"))]
    pub url: Option<String>,
    #[validate(length(min = 1, message = "text must not be empty"))]
    pub text: Option<String>,
    pub source: Option<String>,
    #[serde(default)]
    pub replace: bool,
}

fn validate_single_source(request: &IngestRequest) -> Result<(), ValidationError> {
    match (&request.url, &request.text) {
        (Some(_), None) | (None, Some(_)) => Ok(()),
        _ => Err(ValidationError::new("single_source")
            .with_message("exactly one of url or text is required".into())),
    }
}

/// POST /v1/documents
pub async fn ingest_documents(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<IngestRequest>,
) -> Result<Json<IngestReport>, ApiError> {
    let document = match (request.url, request.text) {
        (Some(url), _) => {
            let document = state.fetcher.fetch(&url).await?;
            match request.source {
                Some(source) => SourceDocument { source, ..document },
                None => document,
            }
        }
        (None, Some(text)) => {
            SourceDocument::new(text, request.source.as_deref().unwrap_or(INLINE_SOURCE))
        }
        (None, None) => return Err(ApiError::bad_request("url or text is required")),
    };

    let report = state.store.ingest(vec![document], request.replace).await?;
    Ok(Json(report))
}
