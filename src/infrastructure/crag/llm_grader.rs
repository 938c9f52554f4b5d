use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use super::{complete, LlmSettings};
use crate::domain::crag::RelevanceGrader;
use crate::domain::{DomainError, LlmProvider};

const GRADER_SYSTEM_PROMPT: &str = "You assess whether a retrieved document is relevant to a \
user question. Return only a JSON object with a single key \"score\" whose value is \"yes\" or \
\"no\". Do not add any other text or explanation.";

const GRADER_USER_TEMPLATE: &str = "Document:\n${document}\n\nQuestion: ${query}\n\n\
Rules:\n- Look for related keywords or semantic meaning.\n\
- Be lenient: only filter out clearly unrelated content.\n\
- Answer exactly {\"score\": \"yes\"} or {\"score\": \"no\"}.";

/// Relevance grader backed by a chat model
#[derive(Debug)]
pub struct LlmRelevanceGrader {
    provider: Arc<dyn LlmProvider>,
    settings: LlmSettings,
}

impl LlmRelevanceGrader {
    pub fn new(provider: Arc<dyn LlmProvider>, settings: LlmSettings) -> Self {
        Self { provider, settings }
    }

    fn build_prompt(query: &str, passage_text: &str) -> String {
        GRADER_USER_TEMPLATE
            .replace("${document}", passage_text)
            .replace("${query}", query)
    }
}

#[async_trait]
impl RelevanceGrader for LlmRelevanceGrader {
    async fn grade(&self, query: &str, passage_text: &str) -> Result<String, DomainError> {
        debug!(model = %self.settings.model, "Grading passage");

        complete(
            &self.provider,
            &self.settings,
            GRADER_SYSTEM_PROMPT,
            Self::build_prompt(query, passage_text),
        )
        .await
    }
}
