use serde::{Deserialize, Serialize};

/// Origin tag given to passages produced by web search
pub const WEB_SEARCH_ORIGIN: &str = "web_search";

/// Where a passage came from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceMetadata {
    pub origin: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl SourceMetadata {
    pub fn new(origin: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            title: None,
            url: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

/// A unit of text placed in the generation context
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Passage {
    pub id: String,
    pub text: String,
    pub source: SourceMetadata,
    pub score: f32,
}

impl Passage {
    pub fn new(id: impl Into<String>, text: impl Into<String>, source: SourceMetadata) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            source,
            score: 0.0,
        }
    }

    pub fn with_score(mut self, score: f32) -> Self {
        self.score = score;
        self
    }

    pub fn is_from_web(&self) -> bool {
        self.source.origin == WEB_SEARCH_ORIGIN
    }
}

/// Joins passage texts with a blank line, in context order
pub fn render_context(passages: &[Passage]) -> String {
    passages
        .iter()
        .map(|p| p.text.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_context_keeps_order() {
        let passages = vec![
            Passage::new("1", "first", SourceMetadata::new("doc")),
            Passage::new("2", "second", SourceMetadata::new("doc")),
        ];

        assert_eq!(render_context(&passages), "first\n\nsecond");
        assert_eq!(render_context(&[]), "");
    }

    #[test]
    fn test_web_origin() {
        let passage = Passage::new("w", "snippet", SourceMetadata::new(WEB_SEARCH_ORIGIN));
        assert!(passage.is_from_web());
    }

    #[test]
    fn test_source_metadata_skips_missing_fields() {
        let json = serde_json::to_value(SourceMetadata::new("notes.md")).unwrap();
        assert_eq!(json, serde_json::json!({"origin": "notes.md"}));
    }
}
