//! Recursive chunking strategy

use unicode_segmentation::UnicodeSegmentation;

use crate::domain::ingestion::{Chunk, ChunkingConfig, ChunkingStrategy};
use crate::domain::DomainError;

/// Splitting levels, coarsest first
const LEVELS: usize = 4;

/// Chunking strategy that recursively splits text hierarchically
///
/// Splitting order: headers -> paragraphs -> sentences -> words -> characters.
/// The resulting pieces are packed greedily into chunks of at most
/// `chunk_size` characters, and each new chunk starts with up to
/// `chunk_overlap` characters of trailing pieces from the previous one.
#[derive(Debug, Clone, Default)]
pub struct RecursiveChunker;

/// A fragment that fits in one chunk and the separator that precedes it
#[derive(Debug, Clone)]
struct Piece {
    text: String,
    separator: &'static str,
}

impl Piece {
    fn len(&self) -> usize {
        char_len(&self.text)
    }
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

impl RecursiveChunker {
    pub fn new() -> Self {
        Self
    }

    fn split_by_headers(text: &str) -> Vec<&str> {
        let mut parts = Vec::new();
        let mut start = 0;
        let mut offset = 0;

        for line in text.split_inclusive('\n') {
            if line.starts_with('#') && offset > start {
                parts.push(&text[start..offset]);
                start = offset;
            }
            offset += line.len();
        }
        parts.push(&text[start..]);

        parts
            .into_iter()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect()
    }

    fn split_by_paragraphs(text: &str) -> Vec<&str> {
        text.split("\n\n")
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect()
    }

    fn split_by_sentences(text: &str) -> Vec<&str> {
        text.unicode_sentences()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect()
    }

    fn split_level(text: &str, level: usize) -> Vec<&str> {
        match level {
            0 => Self::split_by_headers(text),
            1 => Self::split_by_paragraphs(text),
            2 => Self::split_by_sentences(text),
            _ => text.split_whitespace().collect(),
        }
    }

    fn joiner(level: usize) -> &'static str {
        match level {
            0 | 1 => "\n\n",
            _ => " ",
        }
    }

    fn collect_pieces(
        text: &str,
        size: usize,
        level: usize,
        separator: &'static str,
        out: &mut Vec<Piece>,
    ) {
        if char_len(text) <= size {
            out.push(Piece {
                text: text.to_string(),
                separator,
            });
            return;
        }

        if level >= LEVELS {
            Self::split_by_chars(text, size, separator, out);
            return;
        }

        let parts = Self::split_level(text, level);
        if parts.len() <= 1 {
            Self::collect_pieces(text, size, level + 1, separator, out);
            return;
        }

        for (i, part) in parts.into_iter().enumerate() {
            let sep = if i == 0 { separator } else { Self::joiner(level) };
            Self::collect_pieces(part, size, level + 1, sep, out);
        }
    }

    /// Last resort for a single word longer than a chunk
    fn split_by_chars(text: &str, size: usize, separator: &'static str, out: &mut Vec<Piece>) {
        let chars: Vec<char> = text.chars().collect();
        for (i, window) in chars.chunks(size).enumerate() {
            out.push(Piece {
                text: window.iter().collect(),
                separator: if i == 0 { separator } else { "" },
            });
        }
    }

    fn joined_len(window: &[Piece]) -> usize {
        window
            .iter()
            .enumerate()
            .map(|(i, p)| if i == 0 { p.len() } else { p.separator.len() + p.len() })
            .sum()
    }

    fn join(window: &[Piece]) -> String {
        let mut out = String::new();
        for (i, piece) in window.iter().enumerate() {
            if i > 0 {
                out.push_str(piece.separator);
            }
            out.push_str(&piece.text);
        }
        out
    }

    fn merge(pieces: Vec<Piece>, config: &ChunkingConfig) -> Vec<String> {
        let mut chunks = Vec::new();
        let mut window: Vec<Piece> = Vec::new();

        for piece in pieces {
            let len = Self::joined_len(&window);
            let needed = piece.separator.len() + piece.len();

            if !window.is_empty() && len + needed > config.chunk_size {
                chunks.push(Self::join(&window));

                // Keep a tail of the previous chunk as overlap, if it still leaves room
                while !window.is_empty() {
                    let len = Self::joined_len(&window);
                    if len <= config.chunk_overlap && len + needed <= config.chunk_size {
                        break;
                    }
                    window.remove(0);
                }
            }

            window.push(piece);
        }

        if !window.is_empty() {
            chunks.push(Self::join(&window));
        }

        chunks
    }
}

impl ChunkingStrategy for RecursiveChunker {
    fn chunk(&self, content: &str, config: &ChunkingConfig) -> Result<Vec<Chunk>, DomainError> {
        config.validate()?;

        let content = content.trim();
        if content.is_empty() {
            return Ok(vec![]);
        }

        let mut pieces = Vec::new();
        Self::collect_pieces(content, config.chunk_size, 0, "", &mut pieces);

        let chunks = Self::merge(pieces, config)
            .into_iter()
            .filter(|c| !c.trim().is_empty())
            .enumerate()
            .map(|(i, text)| Chunk::new(text, i))
            .collect();

        Ok(chunks)
    }

    fn name(&self) -> &'static str {
        "recursive"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(chunks: &[Chunk]) -> Vec<&str> {
        chunks.iter().map(|c| c.content.as_str()).collect()
    }

    #[test]
    fn test_empty_content() {
        let chunks = RecursiveChunker::new()
            .chunk("  \n ", &ChunkingConfig::default())
            .unwrap();
        assert!(chunks.is_empty());
    }

    #[test]
    fn test_small_content() {
        let chunks = RecursiveChunker::new()
            .chunk("Small content", &ChunkingConfig::new(1000, 0))
            .unwrap();

        assert_eq!(texts(&chunks), vec!["Small content"]);
        assert_eq!(chunks[0].index, 0);
    }

    #[test]
    fn test_split_by_headers() {
        let content = "# Header 1\n\nContent under header 1.\n\n# Header 2\n\nContent under header 2.";
        let chunks = RecursiveChunker::new()
            .chunk(content, &ChunkingConfig::new(40, 0))
            .unwrap();

        assert_eq!(
            texts(&chunks),
            vec![
                "# Header 1\n\nContent under header 1.",
                "# Header 2\n\nContent under header 2."
            ]
        );
    }

    #[test]
    fn test_split_by_sentences() {
        let content = "First sentence here. Second sentence here. Third sentence here.";
        let chunks = RecursiveChunker::new()
            .chunk(content, &ChunkingConfig::new(25, 0))
            .unwrap();

        assert_eq!(
            texts(&chunks),
            vec![
                "First sentence here.",
                "Second sentence here.",
                "Third sentence here."
            ]
        );
    }

    #[test]
    fn test_overlap_carries_trailing_words() {
        let content = "aaaa bbbb cccc dddd eeee ffff";
        let chunks = RecursiveChunker::new()
            .chunk(content, &ChunkingConfig::new(20, 10))
            .unwrap();

        assert_eq!(
            texts(&chunks),
            vec!["aaaa bbbb cccc dddd", "cccc dddd eeee ffff"]
        );
    }

    #[test]
    fn test_chunks_never_exceed_size() {
        let content = "This is a very long paragraph that should be split into multiple chunks \
                       because it exceeds the maximum chunk size limit.\n\nA second paragraph \
                       follows with supercalifragilisticexpialidocious words.";
        let config = ChunkingConfig::new(20, 5);
        let chunks = RecursiveChunker::new().chunk(content, &config).unwrap();

        assert!(chunks.len() > 3);
        for chunk in &chunks {
            assert!(chunk.len() <= config.chunk_size, "{:?}", chunk.content);
        }
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.index, i);
        }
    }

    #[test]
    fn test_multibyte_text_is_split_on_char_boundaries() {
        let content = "日本語のテキストはスペースを含まないので文字単位で分割されます";
        let chunks = RecursiveChunker::new()
            .chunk(content, &ChunkingConfig::new(10, 0))
            .unwrap();

        let total: usize = chunks.iter().map(|c| c.len()).sum();
        assert_eq!(total, char_len(content));
        assert!(chunks.iter().all(|c| c.len() <= 10));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let result = RecursiveChunker::new().chunk("text", &ChunkingConfig::new(10, 10));
        assert!(result.is_err());
    }

    #[test]
    fn test_name() {
        assert_eq!(RecursiveChunker::new().name(), "recursive");
    }
}
