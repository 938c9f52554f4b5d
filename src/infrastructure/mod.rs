//! Infrastructure layer - External service implementations

pub mod crag;
pub mod embedding;
pub mod ingestion;
pub mod llm;
pub mod logging;
pub mod search;
pub mod vector_store;
