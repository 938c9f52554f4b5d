use async_trait::async_trait;
use tracing::warn;

use crate::domain::search::{WebSearch, WebSearchResult};
use crate::domain::DomainError;

/// Stand-in used when no search API key is configured; always finds nothing
#[derive(Debug, Default)]
pub struct DisabledWebSearch;

#[async_trait]
impl WebSearch for DisabledWebSearch {
    async fn search(&self, query: &str) -> Result<Vec<WebSearchResult>, DomainError> {
        warn!(query = %query, "Web search requested but no search backend is configured");
        Ok(Vec::new())
    }

    fn name(&self) -> &'static str {
        "disabled"
    }
}
