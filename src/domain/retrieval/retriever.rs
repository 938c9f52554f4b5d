use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use super::Passage;
use crate::domain::DomainError;

/// Returns the passages closest to a query, best first
#[cfg_attr(test, automock)]
#[async_trait]
pub trait Retriever: Send + Sync {
    async fn search(&self, query: &str, k: usize) -> Result<Vec<Passage>, DomainError>;
}
