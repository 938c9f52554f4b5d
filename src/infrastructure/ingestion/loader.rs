//! Loads documents from local files or URLs into plain text

use std::path::Path;

use pulldown_cmark::{Event, Parser, Tag};
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::domain::ingestion::{DocumentKind, SourceDocument};
use crate::domain::DomainError;
use crate::infrastructure::llm::HttpClientTrait;

/// Elements whose text never reaches the document body
const SKIPPED_TAGS: &[&str] = &["script", "style", "noscript", "head", "template", "svg"];

const BLOCK_TAGS: &[&str] = &[
    "p", "div", "section", "article", "main", "header", "footer", "h1", "h2", "h3", "h4", "h5",
    "h6", "li", "ul", "ol", "tr", "table", "blockquote", "pre", "br",
];

#[derive(Debug)]
pub struct DocumentLoader<C: HttpClientTrait> {
    client: C,
}

impl<C: HttpClientTrait> DocumentLoader<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    /// Load a URL (`http://` / `https://`) or a local `.txt`, `.md` or `.html` file
    pub async fn load(&self, source: &str) -> Result<SourceDocument, DomainError> {
        let source = source.trim();
        if source.starts_with("http://") || source.starts_with("https://") {
            self.load_url(source).await
        } else {
            self.load_path(Path::new(source)).await
        }
    }

    pub async fn load_url(&self, url: &str) -> Result<SourceDocument, DomainError> {
        let page = self.client.get_text(url).await?;

        let kind = page
            .content_type
            .as_deref()
            .and_then(DocumentKind::from_mime)
            .or_else(|| guess_kind(Path::new(url)))
            .unwrap_or(DocumentKind::Html);

        debug!(url, ?kind, bytes = page.body.len(), "Fetched document");

        let (text, title) = extract(kind, &page.body);
        let mut document = SourceDocument::new(text, url).with_url(url);
        if let Some(title) = title {
            document = document.with_title(title);
        }

        Ok(document)
    }

    pub async fn load_path(&self, path: &Path) -> Result<SourceDocument, DomainError> {
        let kind = guess_kind(path).ok_or_else(|| {
            DomainError::validation(format!(
                "Unsupported document type: {} (expected .txt, .md or .html)",
                path.display()
            ))
        })?;

        let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
            DomainError::ingestion(format!("Failed to read {}: {}", path.display(), e))
        })?;

        debug!(path = %path.display(), ?kind, bytes = raw.len(), "Read document");

        let (text, title) = extract(kind, &raw);
        let mut document = SourceDocument::new(text, path.display().to_string());
        if let Some(title) = title {
            document = document.with_title(title);
        }

        Ok(document)
    }
}

fn guess_kind(path: &Path) -> Option<DocumentKind> {
    mime_guess::from_path(path)
        .iter()
        .find_map(|mime| DocumentKind::from_mime(mime.essence_str()))
}

/// Plain text and optional title for raw content of the given kind
pub fn extract(kind: DocumentKind, raw: &str) -> (String, Option<String>) {
    match kind {
        DocumentKind::Text => (raw.trim().to_string(), None),
        DocumentKind::Markdown => markdown_to_text(raw),
        DocumentKind::Html => html_to_text(raw),
    }
}

/// Flatten markdown, keeping `#` headings so the chunker can split on them
fn markdown_to_text(markdown: &str) -> (String, Option<String>) {
    let mut text = String::new();
    let mut title = None;
    let mut heading: Option<(usize, String)> = None;

    for event in Parser::new(markdown) {
        match event {
            Event::Start(Tag::Heading(level, ..)) => {
                heading = Some((level as usize, String::new()));
            }
            Event::End(Tag::Heading(..)) => {
                if let Some((level, content)) = heading.take() {
                    let content = content.trim().to_string();
                    if level == 1 && title.is_none() {
                        title = Some(content.clone());
                    }
                    text.push_str("\n\n");
                    text.push_str(&"#".repeat(level));
                    text.push(' ');
                    text.push_str(&content);
                    text.push_str("\n\n");
                }
            }
            Event::Text(t) | Event::Code(t) => match heading.as_mut() {
                Some((_, content)) => content.push_str(&t),
                None => text.push_str(&t),
            },
            Event::SoftBreak | Event::HardBreak => match heading.as_mut() {
                Some((_, content)) => content.push(' '),
                None => text.push('\n'),
            },
            Event::Start(Tag::Item) => text.push_str("\n- "),
            Event::End(Tag::Paragraph) | Event::End(Tag::CodeBlock(_)) | Event::End(Tag::List(_)) => {
                text.push_str("\n\n");
            }
            _ => {}
        }
    }

    (normalize_blocks(&text), title)
}

fn html_to_text(html: &str) -> (String, Option<String>) {
    let document = Html::parse_document(html);

    let title = Selector::parse("title")
        .ok()
        .and_then(|sel| document.select(&sel).next())
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|t| !t.is_empty());

    let body = Selector::parse("body")
        .ok()
        .and_then(|sel| document.select(&sel).next())
        .unwrap_or_else(|| document.root_element());

    let mut text = String::new();
    collect_element_text(&body, &mut text);

    (normalize_blocks(&text), title)
}

fn collect_element_text(element: &ElementRef, out: &mut String) {
    for node in element.children() {
        if let Some(child) = ElementRef::wrap(node) {
            let tag = child.value().name();
            if SKIPPED_TAGS.contains(&tag) {
                continue;
            }

            let block = BLOCK_TAGS.contains(&tag);
            if block {
                out.push_str("\n\n");
            }
            collect_element_text(&child, out);
            if block {
                out.push_str("\n\n");
            }
        } else if let Some(text) = node.value().as_text() {
            out.push_str(text);
        }
    }
}

/// Collapse whitespace inside paragraphs and separate paragraphs by one blank line
fn normalize_blocks(text: &str) -> String {
    let mut paragraphs = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            if !current.is_empty() {
                paragraphs.push(current.join(" "));
                current.clear();
            }
        } else if line.starts_with("- ") || line.starts_with('#') {
            if !current.is_empty() {
                paragraphs.push(current.join(" "));
                current.clear();
            }
            current.push(line);
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        paragraphs.push(current.join(" "));
    }

    paragraphs
        .into_iter()
        .map(|p| p.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}
