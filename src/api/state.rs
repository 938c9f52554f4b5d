//! Application state for shared services

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ingestion::SourceDocument;
use crate::domain::{CorrectiveRagPipeline, DomainError};
use crate::infrastructure::ingestion::DocumentLoader;
use crate::infrastructure::llm::HttpClientTrait;
use crate::infrastructure::vector_store::InMemoryVectorStore;

/// Application state shared by all handlers
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<CorrectiveRagPipeline>,
    pub store: Arc<InMemoryVectorStore>,
    pub fetcher: Arc<dyn DocumentFetcher>,
}

impl AppState {
    pub fn new(
        pipeline: Arc<CorrectiveRagPipeline>,
        store: Arc<InMemoryVectorStore>,
        fetcher: Arc<dyn DocumentFetcher>,
    ) -> Self {
        Self {
            pipeline,
            store,
            fetcher,
        }
    }
}

/// Remote document loading exposed over HTTP; local paths are CLI-only
#[async_trait]
pub trait DocumentFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<SourceDocument, DomainError>;
}

#[async_trait]
impl<C: HttpClientTrait> DocumentFetcher for DocumentLoader<C> {
    async fn fetch(&self, url: &str) -> Result<SourceDocument, DomainError> {
        self.load_url(url).await
    }
}

#[cfg(test)]
pub mod test_support {
    use super::*;
    use crate::domain::crag::{
        CragConfig, MockAnswerGenerator, MockQueryRewriter, MockRelevanceGrader,
    };
    use crate::domain::embedding::MockEmbeddingProvider;
    use crate::domain::ingestion::ChunkingConfig;
    use crate::infrastructure::ingestion::RecursiveChunker;
    use crate::infrastructure::llm::MockHttpClient;
    use crate::infrastructure::search::DisabledWebSearch;

    /// State whose grader always accepts and whose generator answers "generated answer"
    pub fn test_state() -> AppState {
        let store = Arc::new(InMemoryVectorStore::new(
            Arc::new(MockEmbeddingProvider::new(64)),
            "mock-embedding",
            Arc::new(RecursiveChunker::new()),
            ChunkingConfig::default(),
        ));

        let mut grader = MockRelevanceGrader::new();
        grader
            .expect_grade()
            .returning(|_, _| Ok(r#"{"score": "yes"}"#.to_string()));

        let mut generator = MockAnswerGenerator::new();
        generator
            .expect_generate()
            .returning(|_, _| Ok("generated answer".to_string()));

        let pipeline = Arc::new(CorrectiveRagPipeline::new(
            store.clone(),
            Arc::new(grader),
            Arc::new(MockQueryRewriter::new()),
            Arc::new(DisabledWebSearch),
            Arc::new(generator),
            CragConfig::default(),
        ));

        AppState::new(
            pipeline,
            store,
            Arc::new(DocumentLoader::new(MockHttpClient::default())),
        )
    }
}
