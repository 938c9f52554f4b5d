//! In-memory vector store backing the retriever

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use crate::domain::embedding::{cosine_similarity, EmbeddingProvider, EmbeddingRequest};
use crate::domain::ingestion::{ChunkingConfig, ChunkingStrategy, SourceDocument};
use crate::domain::retrieval::{Passage, Retriever, SourceMetadata};
use crate::domain::DomainError;

/// Counts reported after an ingestion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    pub chunks_added: usize,
    pub total_chunks: usize,
}

#[derive(Debug, Clone)]
struct StoredChunk {
    id: String,
    text: String,
    source: SourceMetadata,
    vector: Vec<f32>,
}

/// Embeds document chunks and ranks them by cosine similarity.
///
/// Reads take a shared lock; ingestion takes the write lock only after all
/// chunks are embedded.
#[derive(Debug)]
pub struct InMemoryVectorStore {
    embedder: Arc<dyn EmbeddingProvider>,
    model: String,
    chunker: Arc<dyn ChunkingStrategy>,
    chunking: ChunkingConfig,
    chunks: RwLock<Vec<StoredChunk>>,
}

impl InMemoryVectorStore {
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        model: impl Into<String>,
        chunker: Arc<dyn ChunkingStrategy>,
        chunking: ChunkingConfig,
    ) -> Self {
        Self {
            embedder,
            model: model.into(),
            chunker,
            chunking,
            chunks: RwLock::new(Vec::new()),
        }
    }

    pub async fn chunk_count(&self) -> usize {
        self.chunks.read().await.len()
    }

    /// Chunk, embed and store `documents`; `replace` clears the collection first
    pub async fn ingest(
        &self,
        documents: Vec<SourceDocument>,
        replace: bool,
    ) -> Result<IngestReport, DomainError> {
        let mut pending = Vec::new();

        for document in &documents {
            let mut source = SourceMetadata::new(&document.source);
            if let Some(title) = &document.title {
                source = source.with_title(title);
            }
            if let Some(url) = &document.url {
                source = source.with_url(url);
            }

            for chunk in self.chunker.chunk(&document.text, &self.chunking)? {
                pending.push((chunk.content, source.clone()));
            }
        }

        let vectors = if pending.is_empty() {
            Vec::new()
        } else {
            let texts = pending.iter().map(|(text, _)| text.clone()).collect();
            self.embedder
                .embed(EmbeddingRequest::batch(&self.model, texts))
                .await?
                .into_vectors()
        };

        if vectors.len() != pending.len() {
            return Err(DomainError::ingestion(format!(
                "Embedding provider returned {} vectors for {} chunks",
                vectors.len(),
                pending.len()
            )));
        }

        let new_chunks: Vec<StoredChunk> = pending
            .into_iter()
            .zip(vectors)
            .map(|((text, source), vector)| StoredChunk {
                id: Uuid::new_v4().to_string(),
                text,
                source,
                vector,
            })
            .collect();

        let chunks_added = new_chunks.len();
        let mut chunks = self.chunks.write().await;
        if replace {
            chunks.clear();
        }
        chunks.extend(new_chunks);

        let report = IngestReport {
            chunks_added,
            total_chunks: chunks.len(),
        };

        info!(
            documents = documents.len(),
            chunks_added = report.chunks_added,
            total_chunks = report.total_chunks,
            replace,
            "Ingested documents"
        );

        Ok(report)
    }
}

#[async_trait]
impl Retriever for InMemoryVectorStore {
    async fn search(&self, query: &str, k: usize) -> Result<Vec<Passage>, DomainError> {
        if k == 0 || self.chunk_count().await == 0 {
            return Ok(Vec::new());
        }

        let query_vector = self
            .embedder
            .embed(EmbeddingRequest::single(&self.model, query))
            .await?
            .into_vectors()
            .into_iter()
            .next()
            .ok_or_else(|| DomainError::provider(self.embedder.provider_name(), "No query embedding returned"))?;

        let chunks = self.chunks.read().await;
        let mut scored: Vec<(f32, &StoredChunk)> = chunks
            .iter()
            .map(|c| (cosine_similarity(&query_vector, &c.vector), c))
            .collect();

        scored.sort_by(|a, b| b.0.total_cmp(&a.0));

        let passages: Vec<Passage> = scored
            .into_iter()
            .take(k)
            .map(|(score, c)| Passage::new(&c.id, &c.text, c.source.clone()).with_score(score))
            .collect();

        debug!(k, returned = passages.len(), "Vector search");

        Ok(passages)
    }
}
