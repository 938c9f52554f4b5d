//! LLM-backed CRAG collaborators
//!
//! Grader, rewriter and generator share one provider and sampling settings.

mod llm_generator;
mod llm_grader;
mod llm_rewriter;

pub use llm_generator::LlmAnswerGenerator;
pub use llm_grader::LlmRelevanceGrader;
pub use llm_rewriter::LlmQueryRewriter;

use std::sync::Arc;

use crate::domain::crag::CragConfig;
use crate::domain::{DomainError, LlmProvider, LlmRequest};

/// Model and sampling parameters for collaborator calls
#[derive(Debug, Clone, PartialEq)]
pub struct LlmSettings {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl LlmSettings {
    pub fn new(model: impl Into<String>, config: &CragConfig) -> Self {
        Self {
            model: model.into(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }
}

/// Send a system + user prompt pair and return the reply text
async fn complete(
    provider: &Arc<dyn LlmProvider>,
    settings: &LlmSettings,
    system: &str,
    user: String,
) -> Result<String, DomainError> {
    let request = LlmRequest::builder()
        .system(system)
        .user(user)
        .temperature(settings.temperature)
        .max_tokens(settings.max_tokens)
        .build();

    let response = provider.chat(&settings.model, request).await?;
    Ok(response.content().to_string())
}
