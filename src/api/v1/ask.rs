//! Question answering endpoint

use axum::extract::State;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json, ValidatedJson};
use crate::domain::{CragOutcome, CragStep, Passage, RelevanceVerdict};

#[derive(Debug, Deserialize, Validate)]
pub struct AskRequest {
    #[validate(length(min = 1, max = 4000, message = "question must be 1-4000 characters"))]
    pub question: String,
}

#[derive(Debug, Serialize)]
pub struct AskResponse {
    pub id: String,
    pub answer: String,
    pub verdict: RelevanceVerdict,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rewritten_query: Option<String>,
    pub steps: Vec<CragStep>,
    pub context: Vec<Passage>,
}

impl AskResponse {
    fn from_outcome(id: String, outcome: CragOutcome) -> Self {
        Self {
            id,
            answer: outcome.answer,
            verdict: outcome.verdict,
            rewritten_query: outcome.rewritten_query,
            steps: outcome.trace,
            context: outcome.context,
        }
    }
}

/// POST /v1/ask
pub async fn ask(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<AskRequest>,
) -> Result<Json<AskResponse>, ApiError> {
    let request_id = Uuid::new_v4().to_string();
    info!(request_id = %request_id, "Processing question");

    let outcome = state.pipeline.run(&request.question).await?;

    info!(
        request_id = %request_id,
        verdict = %outcome.verdict,
        web_search = outcome.used_web_search(),
        passages = outcome.context.len(),
        "Question answered"
    );

    Ok(Json(AskResponse::from_outcome(request_id, outcome)))
}
