//! Web search contract used as the corrective fallback

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[cfg(test)]
use mockall::automock;

use crate::domain::retrieval::{Passage, SourceMetadata, WEB_SEARCH_ORIGIN};
use crate::domain::DomainError;

/// One hit returned by a web search backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebSearchResult {
    pub title: String,
    pub content: String,
    pub url: String,
}

impl WebSearchResult {
    pub fn new(
        title: impl Into<String>,
        content: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            url: url.into(),
        }
    }

    /// Convert into a context passage rendered as "Title: ...\nContent: ..."
    pub fn into_passage(self, index: usize) -> Passage {
        let text = format!("Title: {}\nContent: {}", self.title, self.content);
        let source = SourceMetadata::new(WEB_SEARCH_ORIGIN)
            .with_title(self.title)
            .with_url(self.url);

        Passage::new(format!("web-{}", index), text, source)
    }
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait WebSearch: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<WebSearchResult>, DomainError>;

    fn name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_passage() {
        let passage = WebSearchResult::new(
            "Ablation",
            "Removing components one at a time.",
            "https://example.com/ablation",
        )
        .into_passage(2);

        assert_eq!(passage.id, "web-2");
        assert_eq!(
            passage.text,
            "Title: Ablation\nContent: Removing components one at a time."
        );
        assert!(passage.is_from_web());
        assert_eq!(passage.source.url.as_deref(), Some("https://example.com/ablation"));
    }
}
