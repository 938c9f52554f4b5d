use serde::{Deserialize, Serialize};

/// Format a document was loaded from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Text,
    Markdown,
    Html,
}

impl DocumentKind {
    /// Detect the kind from a MIME type string
    pub fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next().unwrap_or_default().trim();
        match essence {
            "text/plain" => Some(Self::Text),
            "text/markdown" | "text/x-markdown" => Some(Self::Markdown),
            "text/html" | "application/xhtml+xml" => Some(Self::Html),
            _ => None,
        }
    }
}

/// Plain text of a loaded document plus where it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDocument {
    pub text: String,
    pub source: String,
    pub title: Option<String>,
    pub url: Option<String>,
}

impl SourceDocument {
    pub fn new(text: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source: source.into(),
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_mime() {
        assert_eq!(DocumentKind::from_mime("text/plain"), Some(DocumentKind::Text));
        assert_eq!(
            DocumentKind::from_mime("text/html; charset=utf-8"),
            Some(DocumentKind::Html)
        );
        assert_eq!(
            DocumentKind::from_mime("text/markdown"),
            Some(DocumentKind::Markdown)
        );
        assert_eq!(DocumentKind::from_mime("application/pdf"), None);
    }

    #[test]
    fn test_document_builder() {
        let doc = SourceDocument::new("body", "https://example.com/post")
            .with_title("Post")
            .with_url("https://example.com/post");

        assert_eq!(doc.title.as_deref(), Some("Post"));
        assert_eq!(doc.url.as_deref(), Some("https://example.com/post"));
    }
}
