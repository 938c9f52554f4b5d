//! Embedding provider trait definition

use async_trait::async_trait;
use std::fmt::Debug;

use super::{EmbeddingRequest, EmbeddingResponse};
use crate::domain::DomainError;

/// Turns text into dense vectors for similarity search
#[async_trait]
pub trait EmbeddingProvider: Send + Sync + Debug {
    async fn embed(&self, request: EmbeddingRequest) -> Result<EmbeddingResponse, DomainError>;

    fn provider_name(&self) -> &'static str;
}

#[cfg(test)]
pub mod mock {
    use super::*;

    /// Bag-of-words embedder: each lowercase word is hashed into a bucket,
    /// so texts sharing vocabulary land close together.
    #[derive(Debug)]
    pub struct MockEmbeddingProvider {
        dimensions: usize,
        error: Option<String>,
    }

    impl MockEmbeddingProvider {
        pub fn new(dimensions: usize) -> Self {
            Self {
                dimensions,
                error: None,
            }
        }

        pub fn with_error(mut self, error: impl Into<String>) -> Self {
            self.error = Some(error.into());
            self
        }

        fn vectorize(&self, text: &str) -> Vec<f32> {
            let mut vector = vec![0.0; self.dimensions];
            for word in text
                .split(|c: char| !c.is_alphanumeric())
                .filter(|w| !w.is_empty())
            {
                let hash = word
                    .to_lowercase()
                    .bytes()
                    .fold(17u64, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u64));
                vector[(hash % self.dimensions as u64) as usize] += 1.0;
            }
            vector
        }
    }

    #[async_trait]
    impl EmbeddingProvider for MockEmbeddingProvider {
        async fn embed(&self, request: EmbeddingRequest) -> Result<EmbeddingResponse, DomainError> {
            if let Some(ref error) = self.error {
                return Err(DomainError::provider("mock", error));
            }

            let vectors = request.inputs().iter().map(|t| self.vectorize(t)).collect();
            Ok(EmbeddingResponse::new(request.model(), vectors))
        }

        fn provider_name(&self) -> &'static str {
            "mock"
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use crate::domain::embedding::cosine_similarity;

        #[tokio::test]
        async fn test_shared_words_score_higher() {
            let provider = MockEmbeddingProvider::new(64);
            let response = provider
                .embed(EmbeddingRequest::batch(
                    "mock",
                    vec![
                        "ablation studies".into(),
                        "the ablation studies removed layers".into(),
                        "weather in paris".into(),
                    ],
                ))
                .await
                .unwrap();
            let v = response.vectors();

            assert!(cosine_similarity(&v[0], &v[1]) > cosine_similarity(&v[0], &v[2]));
        }

        #[tokio::test]
        async fn test_error() {
            let provider = MockEmbeddingProvider::new(8).with_error("down");
            let result = provider.embed(EmbeddingRequest::single("mock", "x")).await;
            assert!(result.is_err());
        }
    }
}
