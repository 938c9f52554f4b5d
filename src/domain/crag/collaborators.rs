//! Model-backed collaborators consumed by the corrective retrieval loop

use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use crate::domain::DomainError;

/// Asks a model whether a passage helps answer the query.
///
/// Returns the raw model reply; the loop parses it with `parse_grade_response`.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait RelevanceGrader: Send + Sync {
    async fn grade(&self, query: &str, passage_text: &str) -> Result<String, DomainError>;
}

/// Reformulates a query for web search
#[cfg_attr(test, automock)]
#[async_trait]
pub trait QueryRewriter: Send + Sync {
    async fn rewrite(&self, query: &str) -> Result<String, DomainError>;
}

/// Produces the final answer from the original query and rendered context
#[cfg_attr(test, automock)]
#[async_trait]
pub trait AnswerGenerator: Send + Sync {
    async fn generate(&self, query: &str, context: &str) -> Result<String, DomainError>;
}
