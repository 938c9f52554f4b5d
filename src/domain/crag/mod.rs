//! CRAG (Corrective RAG) domain
//!
//! Retrieved passages are graded for relevance before generation; a rejected
//! retrieval is corrected once by rewriting the query and searching the web.

mod collaborators;
mod config;
mod pipeline;
mod state;
mod verdict;

pub use collaborators::{AnswerGenerator, QueryRewriter, RelevanceGrader};
pub use config::{CragConfig, GradingScope};
pub use pipeline::{CorrectiveRagPipeline, CragOutcome, GradeReport};
pub use state::CragStep;
pub use verdict::{parse_grade_response, GradeParse, RelevanceVerdict};

#[cfg(test)]
pub use collaborators::{MockAnswerGenerator, MockQueryRewriter, MockRelevanceGrader};
