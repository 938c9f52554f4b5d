//! Tavily search API client

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::domain::search::{WebSearch, WebSearchResult};
use crate::domain::DomainError;
use crate::infrastructure::llm::HttpClientTrait;

pub const DEFAULT_TAVILY_BASE_URL: &str = "https://api.tavily.com";

#[derive(Debug)]
pub struct TavilySearch<C: HttpClientTrait> {
    client: C,
    api_key: String,
    base_url: String,
    max_results: usize,
    search_depth: String,
}

impl<C: HttpClientTrait> TavilySearch<C> {
    pub fn new(client: C, api_key: impl Into<String>, max_results: usize) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            base_url: DEFAULT_TAVILY_BASE_URL.to_string(),
            max_results,
            search_depth: "advanced".to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// "basic" or "advanced"
    pub fn with_search_depth(mut self, depth: impl Into<String>) -> Self {
        self.search_depth = depth.into();
        self
    }

    fn search_url(&self) -> String {
        format!("{}/search", self.base_url)
    }
}

#[async_trait]
impl<C: HttpClientTrait> WebSearch for TavilySearch<C> {
    async fn search(&self, query: &str) -> Result<Vec<WebSearchResult>, DomainError> {
        let body = serde_json::json!({
            "api_key": self.api_key,
            "query": query,
            "max_results": self.max_results,
            "search_depth": self.search_depth,
        });

        let json = self
            .client
            .post_json(&self.search_url(), vec![("Content-Type", "application/json")], &body)
            .await
            .map_err(|e| DomainError::provider("tavily", e.to_string()))?;

        let response: TavilyResponse = serde_json::from_value(json).map_err(|e| {
            DomainError::provider("tavily", format!("Failed to parse search response: {}", e))
        })?;

        debug!(results = response.results.len(), "Tavily search completed");

        Ok(response
            .results
            .into_iter()
            .take(self.max_results)
            .map(|r| WebSearchResult::new(r.title, r.content, r.url))
            .collect())
    }

    fn name(&self) -> &'static str {
        "tavily"
    }
}

#[derive(Debug, Deserialize)]
struct TavilyResponse {
    #[serde(default)]
    results: Vec<TavilyResult>,
}

#[derive(Debug, Deserialize)]
struct TavilyResult {
    #[serde(default)]
    title: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    url: String,
}
