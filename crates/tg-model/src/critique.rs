//! Review critique result

use serde::{Deserialize, Serialize};

/// Structured output of the review engine
///
/// Six string lists describing what the reviewed structure is missing.
/// Suggestions and production-readiness concerns are advisory; they do not
/// make [`CritiqueResult::has_issues`] true on their own.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CritiqueResult {
    /// Missing information (criteria, requirements, specs)
    #[serde(default)]
    pub gaps: Vec<String>,
    /// Vague or underspecified wording
    #[serde(default)]
    pub ambiguities: Vec<String>,
    /// Work the structure should contain but does not
    #[serde(default)]
    pub missing_tasks: Vec<String>,
    /// Clarification questions for the human
    #[serde(default)]
    pub questions: Vec<String>,
    /// Improvement suggestions
    #[serde(default)]
    pub suggestions: Vec<String>,
    /// Operational concerns before shipping
    #[serde(default)]
    pub production_readiness_concerns: Vec<String>,
}

impl CritiqueResult {
    /// True iff any of gaps/questions/missing_tasks/ambiguities is non-empty
    #[must_use]
    pub fn has_issues(&self) -> bool {
        !self.gaps.is_empty()
            || !self.questions.is_empty()
            || !self.missing_tasks.is_empty()
            || !self.ambiguities.is_empty()
    }
}
