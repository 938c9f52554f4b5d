//! Relevance verdicts and grader output parsing

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Brace-delimited fragments in free-form model output
static JSON_FRAGMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)\{.*?\}").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelevanceVerdict {
    Relevant,
    NotRelevant,
}

impl RelevanceVerdict {
    pub fn is_relevant(&self) -> bool {
        matches!(self, Self::Relevant)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Relevant => "relevant",
            Self::NotRelevant => "not_relevant",
        }
    }
}

impl std::fmt::Display for RelevanceVerdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of parsing one grader reply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradeParse {
    Parsed(RelevanceVerdict),
    Unparsed,
}

impl GradeParse {
    /// Resolve to a verdict, treating unparsed output as relevant
    pub fn or_relevant(self) -> RelevanceVerdict {
        match self {
            Self::Parsed(verdict) => verdict,
            Self::Unparsed => RelevanceVerdict::Relevant,
        }
    }
}

/// Extract `{"score": "yes"|"no"}` (or `binary_score`) from grader output.
///
/// Models sometimes echo template text such as `{context}` before the answer,
/// so the first fragment that is a JSON object carrying a score key decides.
pub fn parse_grade_response(response: &str) -> GradeParse {
    let score = JSON_FRAGMENT
        .find_iter(response)
        .filter_map(|fragment| serde_json::from_str::<serde_json::Value>(fragment.as_str()).ok())
        .find_map(|value| {
            value
                .get("score")
                .or_else(|| value.get("binary_score"))
                .cloned()
        });

    let verdict = score
        .as_ref()
        .and_then(|s| s.as_str())
        .map(|s| s.trim().to_ascii_lowercase());

    match verdict.as_deref() {
        Some("yes") => GradeParse::Parsed(RelevanceVerdict::Relevant),
        Some("no") => GradeParse::Parsed(RelevanceVerdict::NotRelevant),
        _ => GradeParse::Unparsed,
    }
}
