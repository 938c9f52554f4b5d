//! Passages and the retriever contract

mod passage;
mod retriever;

pub use passage::{render_context, Passage, SourceMetadata, WEB_SEARCH_ORIGIN};
pub use retriever::Retriever;

#[cfg(test)]
pub use retriever::MockRetriever;
