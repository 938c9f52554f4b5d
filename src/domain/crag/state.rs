//! States and transitions of the corrective retrieval loop

use serde::{Deserialize, Serialize};

use super::RelevanceVerdict;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CragStep {
    Retrieve,
    Grade,
    Rewrite,
    WebSearch,
    Generate,
    Done,
}

impl CragStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Retrieve => "retrieve",
            Self::Grade => "grade",
            Self::Rewrite => "rewrite",
            Self::WebSearch => "web_search",
            Self::Generate => "generate",
            Self::Done => "done",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Next state given the verdict of the grading step, if it has run.
    ///
    /// Grade without a verdict goes to Generate, matching the fail-open grading policy.
    pub fn next(self, verdict: Option<RelevanceVerdict>) -> Self {
        match self {
            Self::Retrieve => Self::Grade,
            Self::Grade => match verdict {
                Some(RelevanceVerdict::NotRelevant) => Self::Rewrite,
                _ => Self::Generate,
            },
            Self::Rewrite => Self::WebSearch,
            Self::WebSearch => Self::Generate,
            Self::Generate | Self::Done => Self::Done,
        }
    }
}

impl std::fmt::Display for CragStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
