//! Corrective retrieval loop
//!
//! Runs retrieve → grade → generate, escalating once to rewrite → web search
//! when the retrieved context is judged not relevant. Every collaborator call is
//! bounded by the configured step timeout (web search by its whole retry
//! budget); all failures except generation are recovered locally.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info, warn};

use super::{
    parse_grade_response, AnswerGenerator, CragConfig, CragStep, GradeParse, GradingScope,
    QueryRewriter, RelevanceGrader, RelevanceVerdict,
};
use crate::domain::retrieval::{render_context, Passage, Retriever};
use crate::domain::search::WebSearch;
use crate::domain::DomainError;

/// Verdict of the grading step plus the passages that survived it
#[derive(Debug, Clone, PartialEq)]
pub struct GradeReport {
    pub verdict: RelevanceVerdict,
    pub relevant: Vec<Passage>,
}

/// Everything produced by one cycle
#[derive(Debug, Clone, Serialize)]
pub struct CragOutcome {
    pub question: String,
    pub answer: String,
    pub verdict: RelevanceVerdict,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rewritten_query: Option<String>,
    pub context: Vec<Passage>,
    pub trace: Vec<CragStep>,
}

impl CragOutcome {
    pub fn used_web_search(&self) -> bool {
        self.trace.contains(&CragStep::WebSearch)
    }
}

pub struct CorrectiveRagPipeline {
    retriever: Arc<dyn Retriever>,
    grader: Arc<dyn RelevanceGrader>,
    rewriter: Arc<dyn QueryRewriter>,
    web_search: Arc<dyn WebSearch>,
    generator: Arc<dyn AnswerGenerator>,
    config: CragConfig,
}

impl std::fmt::Debug for CorrectiveRagPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CorrectiveRagPipeline")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl CorrectiveRagPipeline {
    pub fn new(
        retriever: Arc<dyn Retriever>,
        grader: Arc<dyn RelevanceGrader>,
        rewriter: Arc<dyn QueryRewriter>,
        web_search: Arc<dyn WebSearch>,
        generator: Arc<dyn AnswerGenerator>,
        config: CragConfig,
    ) -> Self {
        Self {
            retriever,
            grader,
            rewriter,
            web_search,
            generator,
            config,
        }
    }

    pub fn config(&self) -> &CragConfig {
        &self.config
    }

    /// Run one full cycle for `question`
    pub async fn run(&self, question: &str) -> Result<CragOutcome, DomainError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(DomainError::validation("Question cannot be empty"));
        }

        info!(question, "Starting corrective retrieval cycle");

        let mut step = CragStep::Retrieve;
        let mut trace = Vec::new();
        let mut context = Vec::new();
        let mut verdict = None;
        let mut search_query = question.to_string();
        let mut rewritten_query = None;
        let mut answer = None;

        while !step.is_terminal() {
            trace.push(step);

            match step {
                CragStep::Retrieve => {
                    context = self.retrieve(question).await;
                }
                CragStep::Grade => {
                    let report = self.grade(question, std::mem::take(&mut context)).await;
                    context = report.relevant;
                    verdict = Some(report.verdict);
                }
                CragStep::Rewrite => {
                    search_query = self.rewrite(question).await;
                    if search_query != question {
                        rewritten_query = Some(search_query.clone());
                    }
                }
                CragStep::WebSearch => {
                    let web = self.web_search(&search_query).await;
                    context.extend(web);
                }
                CragStep::Generate => {
                    answer = Some(self.generate(question, &context).await?);
                }
                CragStep::Done => {}
            }

            let next = step.next(verdict);
            info!(from = %step, to = %next, "CRAG transition");
            step = next;
        }
        trace.push(CragStep::Done);

        let answer = answer.ok_or_else(|| DomainError::internal("Cycle ended without an answer"))?;
        let verdict = verdict.unwrap_or(RelevanceVerdict::Relevant);

        info!(
            verdict = %verdict,
            context_passages = context.len(),
            rewritten = rewritten_query.is_some(),
            "Corrective retrieval cycle complete"
        );

        Ok(CragOutcome {
            question: question.to_string(),
            answer,
            verdict,
            rewritten_query,
            context,
            trace,
        })
    }

    /// Fetch the top passages for `query`; failures yield an empty context
    pub async fn retrieve(&self, query: &str) -> Vec<Passage> {
        let result = self
            .bounded("retrieve", self.retriever.search(query, self.config.top_k))
            .await;

        match result {
            Ok(passages) => {
                debug!(count = passages.len(), top_k = self.config.top_k, "Retrieved passages");
                passages
            }
            Err(e) => {
                warn!(error = %e, "Retrieval failed, continuing with empty context");
                Vec::new()
            }
        }
    }

    /// Grade `context` against `query`, keeping only the passages judged relevant
    pub async fn grade(&self, query: &str, context: Vec<Passage>) -> GradeReport {
        if context.is_empty() {
            debug!("Nothing retrieved, grading as not relevant");
            return GradeReport {
                verdict: RelevanceVerdict::NotRelevant,
                relevant: context,
            };
        }

        match self.config.grading_scope {
            GradingScope::PerPassage => self.grade_each(query, context).await,
            GradingScope::Combined => self.grade_combined(query, context).await,
        }
    }

    async fn grade_each(&self, query: &str, context: Vec<Passage>) -> GradeReport {
        let mut verdict = RelevanceVerdict::Relevant;
        let mut relevant = Vec::with_capacity(context.len());

        for passage in context {
            match self.grade_text(query, &passage.text, &passage.id).await {
                RelevanceVerdict::Relevant => relevant.push(passage),
                RelevanceVerdict::NotRelevant => verdict = RelevanceVerdict::NotRelevant,
            }
        }

        GradeReport { verdict, relevant }
    }

    async fn grade_combined(&self, query: &str, context: Vec<Passage>) -> GradeReport {
        let rendered = render_context(&context);

        match self.grade_text(query, &rendered, "combined").await {
            RelevanceVerdict::Relevant => GradeReport {
                verdict: RelevanceVerdict::Relevant,
                relevant: context,
            },
            RelevanceVerdict::NotRelevant => GradeReport {
                verdict: RelevanceVerdict::NotRelevant,
                relevant: Vec::new(),
            },
        }
    }

    /// One grader call; unparsed output, errors and timeouts count as relevant
    async fn grade_text(&self, query: &str, text: &str, passage_id: &str) -> RelevanceVerdict {
        match self.bounded("grade", self.grader.grade(query, text)).await {
            Ok(response) => match parse_grade_response(&response) {
                GradeParse::Parsed(verdict) => {
                    debug!(passage_id, verdict = %verdict, "Graded passage");
                    verdict
                }
                GradeParse::Unparsed => {
                    warn!(passage_id, response = %response, "Unparseable grader output, keeping passage");
                    GradeParse::Unparsed.or_relevant()
                }
            },
            Err(e) => {
                warn!(passage_id, error = %e, "Grading failed, keeping passage");
                RelevanceVerdict::Relevant
            }
        }
    }

    /// Reformulate `query`; empty output or failure returns the original
    pub async fn rewrite(&self, query: &str) -> String {
        match self.bounded("rewrite", self.rewriter.rewrite(query)).await {
            Ok(rewritten) => {
                let rewritten = rewritten.trim();
                if rewritten.is_empty() {
                    warn!("Rewriter returned empty output, using original query");
                    query.to_string()
                } else {
                    debug!(original = query, rewritten, "Rewrote query");
                    rewritten.to_string()
                }
            }
            Err(e) => {
                warn!(error = %e, "Rewrite failed, using original query");
                query.to_string()
            }
        }
    }

    /// Search the web for `query`; exhausted retries or timeout yield no passages.
    /// Bounded by the whole retry budget so a retrying backend gets to retry.
    pub async fn web_search(&self, query: &str) -> Vec<Passage> {
        let budget = self.config.web_search_budget();
        match self
            .bounded_by(budget, "web_search", self.web_search.search(query))
            .await
        {
            Ok(results) => {
                let passages: Vec<Passage> = results
                    .into_iter()
                    .take(self.config.max_search_results)
                    .enumerate()
                    .map(|(i, r)| r.into_passage(i))
                    .collect();
                debug!(count = passages.len(), "Web search results");
                passages
            }
            Err(e) => {
                warn!(error = %e, "Web search failed, continuing without web results");
                Vec::new()
            }
        }
    }

    /// Produce the answer; the only step whose failure ends the cycle
    pub async fn generate(&self, query: &str, context: &[Passage]) -> Result<String, DomainError> {
        if context.is_empty() {
            warn!("Generating with empty context");
        }

        let rendered = render_context(context);
        self.bounded("generate", self.generator.generate(query, &rendered))
            .await
    }

    async fn bounded<T>(
        &self,
        operation: &str,
        call: impl Future<Output = Result<T, DomainError>>,
    ) -> Result<T, DomainError> {
        self.bounded_by(self.config.step_timeout(), operation, call)
            .await
    }

    async fn bounded_by<T>(
        &self,
        limit: Duration,
        operation: &str,
        call: impl Future<Output = Result<T, DomainError>>,
    ) -> Result<T, DomainError> {
        tokio::time::timeout(limit, call)
            .await
            .unwrap_or_else(|_| Err(DomainError::timeout(operation, limit)))
    }
}
