//! Corrective RAG
//!
//! Answers questions from an in-memory vector store, grading every retrieved
//! passage for relevance first. When retrieval is judged not relevant the
//! question is rewritten once and answered from web search results instead.

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use tracing::{info, warn};

use api::state::AppState;
use domain::{CorrectiveRagPipeline, DomainError, WebSearch};
use infrastructure::crag::{LlmAnswerGenerator, LlmQueryRewriter, LlmRelevanceGrader, LlmSettings};
use infrastructure::embedding::OpenAiEmbeddingProvider;
use infrastructure::ingestion::{DocumentLoader, RecursiveChunker};
use infrastructure::llm::{HttpClient, LlmProviderFactory};
use infrastructure::search::{DisabledWebSearch, RetryingWebSearch, TavilySearch};
use infrastructure::vector_store::InMemoryVectorStore;

/// The loop and the store it retrieves from
#[derive(Debug, Clone)]
pub struct CragComponents {
    pub pipeline: Arc<CorrectiveRagPipeline>,
    pub store: Arc<InMemoryVectorStore>,
}

/// Wire every collaborator from `config`
pub fn build_components(config: &AppConfig) -> Result<CragComponents, DomainError> {
    config.validate()?;

    let llm = LlmProviderFactory::create(
        config.llm.provider,
        &config.llm.api_key,
        config.llm.base_url.as_deref(),
    )?;

    let store = Arc::new(InMemoryVectorStore::new(
        create_embedder(config)?,
        config.embedding.model.clone(),
        Arc::new(RecursiveChunker::new()),
        config.ingestion.clone(),
    ));

    let crag_config = config
        .crag
        .clone()
        .with_max_search_results(config.web_search.max_results);
    let settings = LlmSettings::new(config.llm.model.clone(), &crag_config);

    let pipeline = CorrectiveRagPipeline::new(
        store.clone(),
        Arc::new(LlmRelevanceGrader::new(llm.clone(), settings.clone())),
        Arc::new(LlmQueryRewriter::new(llm.clone(), settings.clone())),
        create_web_search(config)?,
        Arc::new(LlmAnswerGenerator::new(llm, settings)),
        crag_config,
    );

    info!(
        provider = ?config.llm.provider,
        model = %config.llm.model,
        grading_scope = ?config.crag.grading_scope,
        "Corrective RAG pipeline ready"
    );

    Ok(CragComponents {
        pipeline: Arc::new(pipeline),
        store,
    })
}

/// Application state for `serve`
pub fn create_app_state(config: &AppConfig) -> Result<AppState, DomainError> {
    let components = build_components(config)?;
    let loader = DocumentLoader::new(HttpClient::with_timeout(config.crag.step_timeout())?);

    Ok(AppState::new(components.pipeline, components.store, Arc::new(loader)))
}

fn create_embedder(
    config: &AppConfig,
) -> Result<Arc<OpenAiEmbeddingProvider<HttpClient>>, DomainError> {
    let api_key = config.embedding.effective_api_key(&config.llm);
    if api_key.trim().is_empty() {
        return Err(DomainError::configuration(
            "embedding.api_key (or llm.api_key) is required",
        ));
    }

    let embedder = match &config.embedding.base_url {
        Some(url) => OpenAiEmbeddingProvider::with_base_url(HttpClient::new(), api_key, url),
        None => OpenAiEmbeddingProvider::new(HttpClient::new(), api_key),
    };

    Ok(Arc::new(embedder))
}

fn create_web_search(config: &AppConfig) -> Result<Arc<dyn WebSearch>, DomainError> {
    let Some(api_key) = config.web_search.api_key() else {
        warn!("web_search.api_key not set; rejected retrievals will be answered without web results");
        return Ok(Arc::new(DisabledWebSearch));
    };

    let attempt_timeout = config.crag.step_timeout();
    let client = HttpClient::with_timeout(attempt_timeout)?;
    let tavily = TavilySearch::new(client, api_key, config.web_search.max_results)
        .with_base_url(&config.web_search.base_url)
        .with_search_depth(&config.web_search.search_depth);

    Ok(Arc::new(RetryingWebSearch::new(
        Arc::new(tavily),
        config.crag.search_retry.clone(),
        attempt_timeout,
    )))
}
