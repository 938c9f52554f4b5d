use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use super::{complete, LlmSettings};
use crate::domain::crag::AnswerGenerator;
use crate::domain::{DomainError, LlmProvider};

const GENERATOR_SYSTEM_PROMPT: &str = "You answer questions using only the provided context. \
If the context does not contain enough information, say so plainly instead of guessing. Keep \
the answer concise.";

#[derive(Debug)]
pub struct LlmAnswerGenerator {
    provider: Arc<dyn LlmProvider>,
    settings: LlmSettings,
}

impl LlmAnswerGenerator {
    pub fn new(provider: Arc<dyn LlmProvider>, settings: LlmSettings) -> Self {
        Self { provider, settings }
    }

    fn build_prompt(query: &str, context: &str) -> String {
        let context = if context.trim().is_empty() {
            "(no context available)"
        } else {
            context
        };

        format!("Context:\n{}\n\nQuestion: {}\n\nAnswer:", context, query)
    }
}

#[async_trait]
impl AnswerGenerator for LlmAnswerGenerator {
    async fn generate(&self, query: &str, context: &str) -> Result<String, DomainError> {
        debug!(model = %self.settings.model, context_chars = context.len(), "Generating answer");

        let answer = complete(
            &self.provider,
            &self.settings,
            GENERATOR_SYSTEM_PROMPT,
            Self::build_prompt(query, context),
        )
        .await?;

        Ok(answer.trim().to_string())
    }
}
