//! Engine error types
//!
//! Two layers:
//! - [`EngineError`] is what callers see. Empty input, provider transport
//!   failures, and validation failures always surface; they are never
//!   downgraded.
//! - [`ContractError`] is internal: a model response that is not parseable
//!   JSON or does not survive validation. Engines catch it and degrade to
//!   the deterministic path (extraction) or to an empty-critique /
//!   unchanged-structure result (review/refine). Lower quality, still
//!   running.

use crate::pipeline::PipelineState;
use tg_model::{IssueType, ValidationError};
use tg_provider::ProviderError;

/// Errors surfaced to engine callers
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Extraction was called with no usable text; no fallback is attempted
    #[error("input text is empty or whitespace-only")]
    EmptyInput,

    /// The provider call itself failed (network, auth, quota); never degraded
    #[error("provider call failed: {0}")]
    Provider(#[from] ProviderError),

    /// A caller-supplied value violates a model invariant (e.g. project key)
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Pipeline operation called out of order
    #[error("'{operation}' is not valid in pipeline state {state:?}")]
    InvalidState {
        /// Operation that was attempted
        operation: &'static str,
        /// State the pipeline was in
        state: PipelineState,
    },
}

/// A model response violated the response contract (internal)
#[derive(Debug, thiserror::Error)]
pub enum ContractError {
    /// Response text is not valid JSON
    #[error("response is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Response parsed but a mapped entity failed validation
    #[error("response failed validation: {0}")]
    Validation(#[from] ValidationError),

    /// Response parsed but held no items for the requested issue type
    #[error("response holds no items for issue type '{0}'")]
    Empty(IssueType),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_display() {
        assert_eq!(
            EngineError::EmptyInput.to_string(),
            "input text is empty or whitespace-only"
        );
    }

    #[test]
    fn contract_error_wraps_validation() {
        let err: ContractError = ValidationError::MissingField { field: "as_a" }.into();
        assert!(err.to_string().contains("as_a"));
    }
}
