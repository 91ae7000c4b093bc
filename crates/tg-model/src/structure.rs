//! The ticket structure container
//!
//! One [`TicketStructure`] holds everything extracted in a single run. The
//! issue type selects which list is populated; the other lists stay empty
//! for a given instance.

use crate::error::ValidationError;
use crate::types::{Bug, Epic, IssueType, UserStory};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// One uppercase letter followed by 1-9 uppercase alphanumerics
static PROJECT_KEY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z][A-Z0-9]{1,9}$").expect("valid project key pattern"));

/// Container for all work items extracted in one run
///
/// Created once per extraction call, replaced wholesale by refinement, and
/// handed off immutably to the serialization collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketStructure {
    /// Issue-tracker project key, e.g. `PROJ`
    pub project_key: String,
    /// Which of the following lists is populated
    pub issue_type: IssueType,
    /// Epics (issue types `task` and `epic-only`)
    #[serde(default)]
    pub epics: Vec<Epic>,
    /// Bug reports (issue type `bug`)
    #[serde(default)]
    pub bugs: Vec<Bug>,
    /// User stories (issue type `story`)
    #[serde(default)]
    pub stories: Vec<UserStory>,
}

impl TicketStructure {
    /// Create an empty structure for a project and issue type
    pub fn new(
        project_key: impl Into<String>,
        issue_type: IssueType,
    ) -> Result<Self, ValidationError> {
        let project_key = project_key.into();
        if !PROJECT_KEY.is_match(&project_key) {
            return Err(ValidationError::InvalidProjectKey { key: project_key });
        }
        Ok(Self {
            project_key,
            issue_type,
            epics: Vec::new(),
            bugs: Vec::new(),
            stories: Vec::new(),
        })
    }

    /// Replace the epic list
    #[must_use]
    pub fn with_epics(mut self, epics: Vec<Epic>) -> Self {
        self.epics = epics;
        self
    }

    /// Replace the bug list
    #[must_use]
    pub fn with_bugs(mut self, bugs: Vec<Bug>) -> Self {
        self.bugs = bugs;
        self
    }

    /// Replace the story list
    #[must_use]
    pub fn with_stories(mut self, stories: Vec<UserStory>) -> Self {
        self.stories = stories;
        self
    }

    /// True when any list holds at least one item
    #[must_use]
    pub fn has_content(&self) -> bool {
        !self.epics.is_empty() || !self.bugs.is_empty() || !self.stories.is_empty()
    }

    /// Total tasks across all epics
    #[must_use]
    pub fn task_count(&self) -> usize {
        self.epics.iter().map(|e| e.tasks.len()).sum()
    }

    /// Total bug reports
    #[must_use]
    pub fn bug_count(&self) -> usize {
        self.bugs.len()
    }

    /// Total user stories
    #[must_use]
    pub fn story_count(&self) -> usize {
        self.stories.len()
    }

    /// Total issues, dispatched on the structure's issue type
    #[must_use]
    pub fn total_items(&self) -> usize {
        match self.issue_type {
            IssueType::Task => self.epics.len() + self.task_count(),
            IssueType::EpicOnly => self.epics.len(),
            IssueType::Bug => self.bug_count(),
            IssueType::Story => self.story_count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Task;
    use pretty_assertions::assert_eq;

    #[test]
    fn project_key_pattern() {
        assert!(TicketStructure::new("PROJ", IssueType::Task).is_ok());
        assert!(TicketStructure::new("A1", IssueType::Task).is_ok());
        assert!(TicketStructure::new("AB12345678", IssueType::Task).is_ok());

        // lowercase
        assert!(matches!(
            TicketStructure::new("proj", IssueType::Task),
            Err(ValidationError::InvalidProjectKey { .. })
        ));
        // too short
        assert!(TicketStructure::new("P", IssueType::Task).is_err());
        // too long (11 chars)
        assert!(TicketStructure::new("ABCDEFGHIJK", IssueType::Task).is_err());
        // must start with a letter
        assert!(TicketStructure::new("1AB", IssueType::Task).is_err());
    }

    #[test]
    fn counts_dispatch_on_issue_type() {
        let epic = Epic::new("Auth epic", "d")
            .unwrap()
            .with_task(Task::new("Build login", "d").unwrap())
            .with_task(Task::new("Reset password", "d").unwrap());

        let s = TicketStructure::new("PROJ", IssueType::Task)
            .unwrap()
            .with_epics(vec![epic]);
        assert_eq!(s.task_count(), 2);
        assert_eq!(s.total_items(), 3);
        assert!(s.has_content());

        let epic_only = TicketStructure {
            issue_type: IssueType::EpicOnly,
            ..s.clone()
        };
        assert_eq!(epic_only.total_items(), 1);

        let empty_bugs = TicketStructure::new("PROJ", IssueType::Bug).unwrap();
        assert_eq!(empty_bugs.total_items(), 0);
        assert!(!empty_bugs.has_content());
    }

    #[test]
    fn serde_round_trip_is_lossless() {
        let epic = Epic::new("Auth epic", "d")
            .unwrap()
            .with_business_value("faster onboarding")
            .with_task(
                Task::new("Build login", "d")
                    .unwrap()
                    .with_criteria(vec!["a".into(), "b".into()]),
            );
        let s = TicketStructure::new("PROJ", IssueType::Task)
            .unwrap()
            .with_epics(vec![epic]);

        let json = serde_json::to_string(&s).unwrap();
        let back: TicketStructure = serde_json::from_str(&json).unwrap();
        assert_eq!(back, s);
    }
}
