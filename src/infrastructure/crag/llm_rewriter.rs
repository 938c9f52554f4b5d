use std::sync::Arc;

use async_trait::async_trait;

use super::{complete, LlmSettings};
use crate::domain::crag::QueryRewriter;
use crate::domain::{DomainError, LlmProvider};

const REWRITER_SYSTEM_PROMPT: &str = "You rewrite questions into better web search queries. \
Keep the original intent, resolve ambiguity, and expand implicit context. Return only the \
improved question with no preamble or explanation.";

#[derive(Debug)]
pub struct LlmQueryRewriter {
    provider: Arc<dyn LlmProvider>,
    settings: LlmSettings,
}

impl LlmQueryRewriter {
    pub fn new(provider: Arc<dyn LlmProvider>, settings: LlmSettings) -> Self {
        Self { provider, settings }
    }
}

#[async_trait]
impl QueryRewriter for LlmQueryRewriter {
    async fn rewrite(&self, query: &str) -> Result<String, DomainError> {
        let user = format!("Original question:\n-------\n{}\n-------\nImproved question:", query);
        let reply = complete(&self.provider, &self.settings, REWRITER_SYSTEM_PROMPT, user).await?;

        Ok(strip_wrapping_quotes(reply.trim()).to_string())
    }
}

/// Models often quote the rewritten question
fn strip_wrapping_quotes(text: &str) -> &str {
    text.strip_prefix('"')
        .and_then(|t| t.strip_suffix('"'))
        .unwrap_or(text)
        .trim()
}
