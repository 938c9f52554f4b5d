//! CRAG configuration types

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::retry::RetryConfig;
use crate::domain::DomainError;

/// How retrieved passages are handed to the relevance grader
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GradingScope {
    /// One grader call per passage; only passages graded relevant are kept
    #[default]
    PerPassage,
    /// One grader call over the whole rendered context
    Combined,
}

/// Configuration for one corrective retrieval cycle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CragConfig {
    /// Passages requested from the retriever
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    #[serde(default)]
    pub grading_scope: GradingScope,
    /// Upper bound on every collaborator call
    #[serde(default = "default_step_timeout_ms")]
    pub step_timeout_ms: u64,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Web results appended to the context after a rejected retrieval
    #[serde(default = "default_max_search_results")]
    pub max_search_results: usize,
    #[serde(default)]
    pub search_retry: RetryConfig,
}

fn default_top_k() -> usize {
    5
}

fn default_step_timeout_ms() -> u64 {
    30_000
}

fn default_temperature() -> f32 {
    0.0
}

fn default_max_tokens() -> u32 {
    1000
}

fn default_max_search_results() -> usize {
    3
}

impl Default for CragConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            grading_scope: GradingScope::default(),
            step_timeout_ms: default_step_timeout_ms(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            max_search_results: default_max_search_results(),
            search_retry: RetryConfig::default(),
        }
    }
}

impl CragConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn with_grading_scope(mut self, scope: GradingScope) -> Self {
        self.grading_scope = scope;
        self
    }

    pub fn with_step_timeout_ms(mut self, ms: u64) -> Self {
        self.step_timeout_ms = ms;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature.clamp(0.0, 2.0);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_max_search_results(mut self, max: usize) -> Self {
        self.max_search_results = max;
        self
    }

    pub fn with_search_retry(mut self, retry: RetryConfig) -> Self {
        self.search_retry = retry;
        self
    }

    pub fn step_timeout(&self) -> Duration {
        Duration::from_millis(self.step_timeout_ms)
    }

    /// Upper bound for the web search step: every retry attempt may use a full
    /// step timeout, plus the backoff sleeps between attempts
    pub fn web_search_budget(&self) -> Duration {
        let attempts = self.search_retry.max_attempts();
        let backoff: Duration = (0..self.search_retry.max_retries)
            .map(|retry| self.search_retry.delay_for_attempt(retry))
            .sum();

        self.step_timeout() * attempts + backoff
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.top_k == 0 {
            return Err(DomainError::configuration("crag.top_k must be greater than 0"));
        }

        if self.step_timeout_ms == 0 {
            return Err(DomainError::configuration(
                "crag.step_timeout_ms must be greater than 0",
            ));
        }

        if self.search_retry.backoff_multiplier < 1.0 {
            return Err(DomainError::configuration(
                "crag.search_retry.backoff_multiplier must be at least 1.0",
            ));
        }

        Ok(())
    }
}
