//! Document ingestion infrastructure

pub mod chunkers;
pub mod loader;

pub use chunkers::RecursiveChunker;
pub use loader::DocumentLoader;
