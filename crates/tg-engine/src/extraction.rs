//! Extraction engine
//!
//! Turns raw text plus a project key and issue type into a populated
//! [`TicketStructure`]. Two strategies:
//! - model-backed when a provider is configured: render the issue-type
//!   prompt, complete, map the response through the contract;
//! - deterministic paragraph splitting otherwise.
//!
//! A provider transport failure propagates. A response-shape failure does
//! not: the engine logs it and falls back to the deterministic path, which
//! never calls out and never fails on non-empty text.

use crate::contract;
use crate::error::EngineError;
use crate::prompts;
use std::sync::Arc;
use tg_model::{Bug, Epic, IssueType, Task, TicketStructure, UserStory};
use tg_provider::CompletionProvider;

/// Extraction engine with an optional provider capability
pub struct ExtractionEngine {
    provider: Option<Arc<dyn CompletionProvider>>,
}

impl ExtractionEngine {
    /// Create an engine; `None` means deterministic extraction only
    #[must_use]
    pub fn new(provider: Option<Arc<dyn CompletionProvider>>) -> Self {
        Self { provider }
    }

    /// Whether a provider is configured
    #[must_use]
    pub fn has_provider(&self) -> bool {
        self.provider.is_some()
    }

    /// Extract a populated structure from text
    ///
    /// Fails with [`EngineError::EmptyInput`] on empty or whitespace-only
    /// text and with [`EngineError::Validation`] on a malformed project key.
    /// With a provider configured, transport failures propagate as
    /// [`EngineError::Provider`]; contract failures degrade to the fallback.
    pub async fn extract(
        &self,
        text: &str,
        project_key: &str,
        issue_type: IssueType,
    ) -> Result<TicketStructure, EngineError> {
        if text.trim().is_empty() {
            return Err(EngineError::EmptyInput);
        }

        let Some(provider) = &self.provider else {
            return fallback::extract(text, project_key, issue_type).map_err(Into::into);
        };

        let prompt = prompts::extraction_prompt(issue_type, text, project_key);
        tracing::debug!(
            provider = provider.name(),
            %issue_type,
            prompt_chars = prompt.len(),
            "requesting extraction"
        );
        let response = provider
            .complete(prompts::EXTRACTION_SYSTEM, &prompt, true)
            .await?;

        match contract::parse_extraction(&response, project_key, issue_type) {
            Ok(structure) => {
                tracing::info!(
                    %issue_type,
                    items = structure.total_items(),
                    "extraction complete"
                );
                Ok(structure)
            }
            Err(err) => {
                tracing::warn!(
                    %err,
                    "model response failed the contract; using deterministic fallback"
                );
                fallback::extract(text, project_key, issue_type).map_err(Into::into)
            }
        }
    }
}

/// Deterministic extraction from paragraph structure
pub(crate) mod fallback {
    use super::*;
    use tg_model::ValidationError;

    const PLACEHOLDER_STEP: &str = "Reproduction step to be clarified with the reporter";
    const PLACEHOLDER_CRITERION: &str = "Acceptance criterion to be clarified";

    /// Split on blank-line boundaries into trimmed, non-empty paragraphs
    fn paragraphs(text: &str) -> Vec<String> {
        let mut paragraphs = Vec::new();
        let mut current = Vec::new();
        for line in text.lines() {
            if line.trim().is_empty() {
                if !current.is_empty() {
                    paragraphs.push(current.join("\n"));
                    current.clear();
                }
            } else {
                current.push(line.trim());
            }
        }
        if !current.is_empty() {
            paragraphs.push(current.join("\n"));
        }
        paragraphs
    }

    /// Leading clause of a paragraph: up to the first period
    fn leading_clause(paragraph: &str) -> &str {
        let clause = paragraph.split('.').next().unwrap_or(paragraph).trim();
        if clause.is_empty() {
            paragraph.trim()
        } else {
            clause
        }
    }

    fn truncate_chars(s: &str, max: usize) -> String {
        s.chars().take(max).collect()
    }

    /// Pad a derived string up to a minimum length with a labelling prefix
    fn at_least(s: String, min: usize, prefix: &str) -> String {
        if s.chars().count() < min {
            format!("{prefix}{s}")
        } else {
            s
        }
    }

    pub(crate) fn extract(
        text: &str,
        project_key: &str,
        issue_type: IssueType,
    ) -> Result<TicketStructure, ValidationError> {
        let structure = TicketStructure::new(project_key, issue_type)?;
        let paragraphs = paragraphs(text);
        // non-empty input was checked by the caller
        let clause = paragraphs
            .first()
            .map(|p| leading_clause(p).to_string())
            .unwrap_or_default();

        match issue_type {
            IssueType::Task | IssueType::EpicOnly => {
                let title = at_least(truncate_chars(&clause, 100), 5, "Epic: ");
                let mut epic = Epic::new(title, text.trim())?;
                for paragraph in &paragraphs {
                    let title =
                        at_least(truncate_chars(leading_clause(paragraph), 150), 5, "Task: ");
                    epic = epic.with_task(Task::new(title, paragraph.clone())?);
                }
                Ok(structure.with_epics(vec![epic]))
            }
            IssueType::Bug => {
                let summary =
                    at_least(truncate_chars(&clause, 180), 10, "Reported issue: ");
                let description =
                    at_least(text.trim().to_string(), 20, "Problem as described: ");
                let mut steps = paragraphs;
                while steps.len() < 3 {
                    steps.push(PLACEHOLDER_STEP.to_string());
                }
                let bug = Bug::new(summary, description, steps)?;
                Ok(structure.with_bugs(vec![bug]))
            }
            IssueType::Story => {
                let title = at_least(truncate_chars(&clause, 180), 5, "Story: ");
                let mut criteria = paragraphs;
                while criteria.len() < 3 {
                    criteria.push(PLACEHOLDER_CRITERION.to_string());
                }
                let story = UserStory::new(
                    title,
                    "user of the system",
                    clause,
                    "the need described in the notes is met",
                    criteria,
                )?;
                Ok(structure.with_stories(vec![story]))
            }
        }
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tg_provider::MockProvider;

    #[tokio::test]
    async fn empty_input_is_rejected_before_any_call() {
        let mock = Arc::new(MockProvider::new());
        let engine = ExtractionEngine::new(Some(mock.clone()));
        let err = engine.extract("   \n\t", "PROJ", IssueType::Task).await.unwrap_err();
        assert!(matches!(err, EngineError::EmptyInput));
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn invalid_project_key_is_a_validation_error() {
        let engine = ExtractionEngine::new(None);
        let err = engine.extract("some text", "proj", IssueType::Task).await.unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
    }

    #[tokio::test]
    async fn provider_failure_propagates_not_degrades() {
        let mock = Arc::new(MockProvider::new().with_api_error(401, "bad key"));
        let engine = ExtractionEngine::new(Some(mock));
        let err = engine.extract("text here", "PROJ", IssueType::Task).await.unwrap_err();
        assert!(matches!(err, EngineError::Provider(_)));
    }

    #[tokio::test]
    async fn malformed_response_falls_back() {
        let mock = Arc::new(MockProvider::new().with_response("not json at all"));
        let engine = ExtractionEngine::new(Some(mock));
        let s = engine
            .extract("Build login.\n\nAdd password reset.", "PROJ", IssueType::Task)
            .await
            .unwrap();
        // fallback shape, not an error
        assert_eq!(s.epics.len(), 1);
        assert_eq!(s.epics[0].tasks.len(), 2);
    }
}
