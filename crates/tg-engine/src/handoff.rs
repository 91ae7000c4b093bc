//! Collaborator seams
//!
//! The generation flow ends by handing a finished [`TicketStructure`] to two
//! collaborators: a serializer that renders it to an interchange document and
//! a client that uploads it to an external tracker. Both are traits here;
//! concrete backends live with the callers that own those systems.

use async_trait::async_trait;
use tg_model::TicketStructure;
use thiserror::Error;

/// Failure rendering or re-reading an interchange document
#[derive(Debug, Error)]
pub enum HandoffError {
    /// The structure could not be rendered
    #[error("failed to render structure: {0}")]
    Render(String),
    /// The document could not be read back into a structure
    #[error("failed to parse document: {0}")]
    Parse(String),
}

/// Renders a structure to a document and reads one back
///
/// Implementors promise losslessness for their own format: a structure
/// rendered and re-parsed must describe the same work items. Nothing here
/// enforces that promise.
pub trait StructureSerializer {
    fn render(&self, structure: &TicketStructure) -> Result<String, HandoffError>;
    fn parse(&self, document: &str) -> Result<TicketStructure, HandoffError>;
}

/// A work item created in an external tracker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedItem {
    /// Kind of item created ("epic", "task", "bug", "story")
    pub kind: String,
    /// Key assigned by the tracker, e.g. "PROJ-42"
    pub external_key: String,
    /// Title the item was created with
    pub title: String,
    /// Browse URL, when the tracker provides one
    pub url: Option<String>,
}

/// One item the tracker refused
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFailure {
    /// Title of the item that failed
    pub title: String,
    /// Tracker-reported reason
    pub message: String,
}

/// Failure uploading a structure
///
/// `Partial` reports what did land alongside what did not; this layer does
/// not retry, so callers decide whether to resubmit the failures.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("upload rejected: {0}")]
    Rejected(String),
    #[error("{} of {} items failed to upload", failures.len(), created.len() + failures.len())]
    Partial {
        created: Vec<CreatedItem>,
        failures: Vec<UploadFailure>,
    },
}

/// Pushes a finished structure to an external tracker
#[async_trait]
pub trait UploadClient: Send + Sync {
    async fn upload(&self, structure: &TicketStructure) -> Result<Vec<CreatedItem>, UploadError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_upload_reports_both_sides() {
        let err = UploadError::Partial {
            created: vec![CreatedItem {
                kind: "task".into(),
                external_key: "PROJ-1".into(),
                title: "Set up login form".into(),
                url: None,
            }],
            failures: vec![
                UploadFailure {
                    title: "Add password reset".into(),
                    message: "field 'priority' is required".into(),
                },
                UploadFailure {
                    title: "Wire session storage".into(),
                    message: "permission denied".into(),
                },
            ],
        };
        assert_eq!(err.to_string(), "2 of 3 items failed to upload");
    }
}
