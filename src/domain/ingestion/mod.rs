//! Document ingestion domain types and traits
//!
//! Loaded documents are split by a `ChunkingStrategy` and handed to the
//! vector store for embedding.

pub mod chunker;
pub mod document;

pub use chunker::{Chunk, ChunkingConfig, ChunkingStrategy};
pub use document::{DocumentKind, SourceDocument};
