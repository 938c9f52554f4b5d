use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::search::{WebSearch, WebSearchResult};
use crate::domain::{retry_with_backoff, DomainError, RetryConfig};

/// Retries a flaky search backend with exponential backoff.
///
/// Each attempt is cut off after `attempt_timeout`, so a hung request counts
/// as a failed attempt and leaves the remaining retries usable.
pub struct RetryingWebSearch {
    inner: Arc<dyn WebSearch>,
    retry: RetryConfig,
    attempt_timeout: Duration,
}

impl RetryingWebSearch {
    pub fn new(inner: Arc<dyn WebSearch>, retry: RetryConfig, attempt_timeout: Duration) -> Self {
        Self {
            inner,
            retry,
            attempt_timeout,
        }
    }

    async fn attempt(&self, operation: &str, query: &str) -> Result<Vec<WebSearchResult>, DomainError> {
        tokio::time::timeout(self.attempt_timeout, self.inner.search(query))
            .await
            .unwrap_or_else(|_| Err(DomainError::timeout(operation, self.attempt_timeout)))
    }
}

#[async_trait]
impl WebSearch for RetryingWebSearch {
    async fn search(&self, query: &str) -> Result<Vec<WebSearchResult>, DomainError> {
        let operation = format!("{} search", self.inner.name());
        retry_with_backoff(&self.retry, &operation, || self.attempt(&operation, query)).await
    }

    fn name(&self) -> &'static str {
        self.inner.name()
    }
}
