//! Pipeline state machine
//!
//! One run of the extract -> review -> ask -> refine flow, strictly
//! sequential, scoped to a single invocation and never persisted.
//!
//! ```text
//! Initial -> Extracted -> Reviewed -> (QuestionsPending -> Refined)? -> Final
//! ```
//!
//! A single refinement pass by design: refining does not loop back into an
//! automatic second review. Repeating review after refinement is a
//! caller-level choice.

use crate::error::EngineError;
use crate::extraction::ExtractionEngine;
use crate::review::ReviewEngine;
use indexmap::IndexMap;
use std::sync::Arc;
use tg_model::{CritiqueResult, IssueType, TicketStructure};
use tg_provider::CompletionProvider;

/// Where a pipeline run currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    /// Raw text, no structure yet
    Initial,
    /// Structure built by the extraction engine
    Extracted,
    /// Critique produced, nothing to ask
    Reviewed,
    /// Critique has questions; awaiting human answers
    QuestionsPending,
    /// A refined structure replaced the extracted one
    Refined,
    /// Structure handed off to the collaborators
    Final,
}

/// States a pipeline may move to from `from`
///
/// `Final` is a terminal marker, not a resting state: [`Pipeline::finalize`]
/// consumes the pipeline, so no live pipeline ever reports `Final` from
/// [`Pipeline::state`]. A `Final` entry here means "finalize is allowed from
/// this state", and `finalize` checks exactly that.
#[must_use]
pub fn allowed_transitions(from: PipelineState) -> Vec<PipelineState> {
    use PipelineState::*;
    match from {
        Initial => vec![Extracted],
        Extracted => vec![Reviewed, QuestionsPending, Final],
        Reviewed => vec![Final],
        QuestionsPending => vec![Refined, Final],
        Refined => vec![Final],
        Final => vec![],
    }
}

/// One synchronous extract/review/refine run
///
/// Owns both engines and the in-flight structure. The structure is a plain
/// owned value moving through each stage; [`Pipeline::finalize`] consumes
/// the pipeline and releases it for serialization and upload.
pub struct Pipeline {
    extraction: ExtractionEngine,
    review: ReviewEngine,
    state: PipelineState,
    structure: Option<TicketStructure>,
    critique: Option<CritiqueResult>,
}

impl Pipeline {
    /// Create a pipeline; both engines share the same optional provider
    #[must_use]
    pub fn new(provider: Option<Arc<dyn CompletionProvider>>) -> Self {
        Self {
            extraction: ExtractionEngine::new(provider.clone()),
            review: ReviewEngine::new(provider),
            state: PipelineState::Initial,
            structure: None,
            critique: None,
        }
    }

    /// Current state
    #[must_use]
    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// The in-flight structure, if one has been built
    #[must_use]
    pub fn structure(&self) -> Option<&TicketStructure> {
        self.structure.as_ref()
    }

    /// The critique, once review has run
    #[must_use]
    pub fn critique(&self) -> Option<&CritiqueResult> {
        self.critique.as_ref()
    }

    /// Questions awaiting answers, empty outside `QuestionsPending`
    #[must_use]
    pub fn open_questions(&self) -> &[String] {
        if self.state != PipelineState::QuestionsPending {
            return &[];
        }
        self.critique
            .as_ref()
            .map(|c| c.questions.as_slice())
            .unwrap_or(&[])
    }

    /// Run extraction; valid only from `Initial`
    pub async fn run_extraction(
        &mut self,
        text: &str,
        project_key: &str,
        issue_type: IssueType,
    ) -> Result<&TicketStructure, EngineError> {
        if self.state != PipelineState::Initial {
            return Err(EngineError::InvalidState {
                operation: "run_extraction",
                state: self.state,
            });
        }
        let structure = self.extraction.extract(text, project_key, issue_type).await?;
        self.state = PipelineState::Extracted;
        Ok(self.structure.insert(structure))
    }

    /// Run review; valid only from `Extracted`
    ///
    /// Moves to `QuestionsPending` when the critique carries questions,
    /// otherwise to `Reviewed` (a critique without issues has nothing left
    /// to do before [`Pipeline::finalize`]).
    pub async fn run_review(&mut self) -> Result<&CritiqueResult, EngineError> {
        let structure = match (&self.state, &self.structure) {
            (PipelineState::Extracted, Some(structure)) => structure,
            _ => {
                return Err(EngineError::InvalidState {
                    operation: "run_review",
                    state: self.state,
                })
            }
        };
        let critique = self.review.review(structure).await?;
        self.state = if critique.questions.is_empty() {
            PipelineState::Reviewed
        } else {
            PipelineState::QuestionsPending
        };
        Ok(self.critique.insert(critique))
    }

    /// Apply human answers; valid only from `QuestionsPending`
    ///
    /// Replaces the structure wholesale with the refined one. No automatic
    /// re-review follows.
    pub async fn submit_answers(
        &mut self,
        answers: &IndexMap<String, String>,
    ) -> Result<&TicketStructure, EngineError> {
        let structure = match (&self.state, &self.structure) {
            (PipelineState::QuestionsPending, Some(structure)) => structure,
            _ => {
                return Err(EngineError::InvalidState {
                    operation: "submit_answers",
                    state: self.state,
                })
            }
        };
        let refined = self.review.apply_feedback(structure, answers).await?;
        self.state = PipelineState::Refined;
        Ok(self.structure.insert(refined))
    }

    /// Finish the run, releasing the structure for the collaborators
    ///
    /// Valid from every state with a structure: `Extracted` (review was
    /// skipped), `Reviewed`, `QuestionsPending` (answers were skipped), and
    /// `Refined`.
    pub fn finalize(self) -> Result<TicketStructure, EngineError> {
        let state = self.state;
        if !allowed_transitions(state).contains(&PipelineState::Final) {
            return Err(EngineError::InvalidState {
                operation: "finalize",
                state,
            });
        }
        self.structure.ok_or(EngineError::InvalidState {
            operation: "finalize",
            state,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transition_table_is_single_pass() {
        use PipelineState::*;
        assert_eq!(allowed_transitions(Initial), vec![Extracted]);
        // refinement never loops back to review
        assert_eq!(allowed_transitions(Refined), vec![Final]);
        assert!(allowed_transitions(Final).is_empty());
        // every state with a structure may finalize, Initial may not
        for state in [Extracted, Reviewed, QuestionsPending, Refined] {
            assert!(allowed_transitions(state).contains(&Final));
        }
        assert!(!allowed_transitions(Initial).contains(&Final));
    }

    #[tokio::test]
    async fn operations_out_of_order_are_rejected() {
        let mut pipeline = Pipeline::new(None);
        let err = pipeline.run_review().await.unwrap_err();
        assert!(matches!(
            err,
            EngineError::InvalidState {
                operation: "run_review",
                state: PipelineState::Initial
            }
        ));

        let err = pipeline
            .submit_answers(&IndexMap::new())
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidState { .. }));

        let err = Pipeline::new(None).finalize().unwrap_err();
        assert!(matches!(
            err,
            EngineError::InvalidState {
                operation: "finalize",
                state: PipelineState::Initial
            }
        ));
    }
}
