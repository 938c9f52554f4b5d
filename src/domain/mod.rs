//! Domain layer - Core business logic and entities

pub mod crag;
pub mod embedding;
pub mod error;
pub mod ingestion;
pub mod llm;
pub mod retrieval;
pub mod retry;
pub mod search;

pub use crag::{
    AnswerGenerator, CorrectiveRagPipeline, CragConfig, CragOutcome, CragStep, GradingScope,
    QueryRewriter, RelevanceGrader, RelevanceVerdict,
};
pub use embedding::EmbeddingProvider;
pub use error::DomainError;
pub use llm::{LlmProvider, LlmRequest, LlmResponse, Message, MessageRole};
pub use retrieval::{Passage, Retriever, SourceMetadata};
pub use retry::{retry_with_backoff, RetryConfig};
pub use search::{WebSearch, WebSearchResult};
