//! Work-item entities
//!
//! Defines the typed entities extracted from free text:
//! - [`Task`] / [`Epic`] for feature development
//! - [`Bug`] with environment and technical context
//! - [`UserStory`] in the agile template form
//!
//! All entities are built through validating constructors. An out-of-range
//! field is rejected at construction with a [`ValidationError`] naming the
//! field; invalid instances never propagate. Enum-like fields are closed
//! Rust enums, so a stray literal from a model response fails at the
//! deserialization boundary instead of being coerced.

use crate::error::{check_length, check_min_entries, check_required, ValidationError};
use serde::{Deserialize, Serialize};

/// Priority across all entity kinds
///
/// `Critical` is only legal on [`Bug`]; Task/Epic/Story constructors reject
/// it (their priority set is High/Medium/Low).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    /// System down, data loss, security breach
    Critical,
    /// Major feature impact
    High,
    /// Default
    Medium,
    /// Cosmetic or deferred
    Low,
}

impl Priority {
    /// Reject `Critical` for entities whose priority set is High/Medium/Low
    pub(crate) fn check_basic(self, field: &'static str) -> Result<Self, ValidationError> {
        if self == Self::Critical {
            return Err(ValidationError::InvalidValue {
                field,
                value: "Critical".to_string(),
            });
        }
        Ok(self)
    }
}

impl Default for Priority {
    fn default() -> Self {
        Self::Medium
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Critical => "Critical",
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        };
        f.write_str(s)
    }
}

/// Bug severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    /// System down, data loss, security breach
    Critical,
    /// Major feature broken, workaround exists
    High,
    /// Minor feature broken, low impact
    Medium,
    /// Cosmetic, typo, enhancement
    Low,
}

impl Default for Severity {
    fn default() -> Self {
        Self::Medium
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Critical => "Critical",
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        };
        f.write_str(s)
    }
}

/// Estimated effort as a size label
///
/// Deliberately a closed label set, not a numeric story-point count. A value
/// such as `"High"` supplied where an effort is expected fails
/// deserialization rather than being coerced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffortSize {
    /// Under a day
    Small,
    /// A few days
    Medium,
    /// A week or more
    Large,
}

impl std::fmt::Display for EffortSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Small => "Small",
            Self::Medium => "Medium",
            Self::Large => "Large",
        };
        f.write_str(s)
    }
}

/// Discriminator selecting which schema a structure carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueType {
    /// Epics with sub-tasks
    Task,
    /// Bug reports
    Bug,
    /// User stories
    Story,
    /// High-level epics without sub-tasks
    #[serde(rename = "epic-only")]
    EpicOnly,
}

impl std::fmt::Display for IssueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Task => "task",
            Self::Bug => "bug",
            Self::Story => "story",
            Self::EpicOnly => "epic-only",
        };
        f.write_str(s)
    }
}

/// Individual task owned by an [`Epic`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Title, 5-200 chars
    pub title: String,
    /// What to build and why
    pub description: String,
    /// Ordered acceptance criteria (may be empty; review flags that)
    #[serde(default)]
    pub acceptance_criteria: Vec<String>,
    /// Implementation hints (APIs, schemas, dependencies)
    #[serde(default)]
    pub technical_notes: Option<String>,
    /// High/Medium/Low
    #[serde(default)]
    pub priority: Priority,
    /// Effort size label
    #[serde(default)]
    pub estimated_effort: Option<EffortSize>,
}

impl Task {
    /// Create a task with defaults (Medium priority, no criteria)
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let title = title.into();
        check_length("title", &title, 5, 200)?;
        Ok(Self {
            title,
            description: description.into(),
            acceptance_criteria: Vec::new(),
            technical_notes: None,
            priority: Priority::Medium,
            estimated_effort: None,
        })
    }

    /// Set acceptance criteria
    #[must_use]
    pub fn with_criteria(mut self, criteria: Vec<String>) -> Self {
        self.acceptance_criteria = criteria;
        self
    }

    /// Set technical notes
    #[must_use]
    pub fn with_technical_notes(mut self, notes: impl Into<String>) -> Self {
        self.technical_notes = Some(notes.into());
        self
    }

    /// Set priority; `Critical` is rejected for tasks
    pub fn with_priority(mut self, priority: Priority) -> Result<Self, ValidationError> {
        self.priority = priority.check_basic("priority")?;
        Ok(self)
    }

    /// Set estimated effort
    #[must_use]
    pub fn with_effort(mut self, effort: EffortSize) -> Self {
        self.estimated_effort = Some(effort);
        self
    }
}

/// High-level feature or initiative owning tasks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Epic {
    /// Title, 5-200 chars
    pub title: String,
    /// Why this matters
    pub description: String,
    /// Who benefits and what value
    #[serde(default)]
    pub business_value: Option<String>,
    /// High/Medium/Low
    #[serde(default)]
    pub priority: Priority,
    /// Owned tasks (may be empty for epic-only structures)
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl Epic {
    /// Create an epic with defaults (Medium priority, no tasks)
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let title = title.into();
        check_length("title", &title, 5, 200)?;
        Ok(Self {
            title,
            description: description.into(),
            business_value: None,
            priority: Priority::Medium,
            tasks: Vec::new(),
        })
    }

    /// Set business value
    #[must_use]
    pub fn with_business_value(mut self, value: impl Into<String>) -> Self {
        self.business_value = Some(value.into());
        self
    }

    /// Set priority; `Critical` is rejected for epics
    pub fn with_priority(mut self, priority: Priority) -> Result<Self, ValidationError> {
        self.priority = priority.check_basic("priority")?;
        Ok(self)
    }

    /// Append an owned task
    #[must_use]
    pub fn with_task(mut self, task: Task) -> Self {
        self.tasks.push(task);
        self
    }

    /// Replace the owned task list
    #[must_use]
    pub fn with_tasks(mut self, tasks: Vec<Task>) -> Self {
        self.tasks = tasks;
        self
    }
}

/// Where a bug occurs; every field optional
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Environment {
    /// Browser and version
    #[serde(default)]
    pub browser: Option<String>,
    /// Operating system
    #[serde(default)]
    pub os: Option<String>,
    /// Device
    #[serde(default)]
    pub device: Option<String>,
    /// Component/app version
    #[serde(default)]
    pub version: Option<String>,
    /// Affected user role or permission level
    #[serde(default)]
    pub user_role: Option<String>,
    /// Data preconditions
    #[serde(default)]
    pub data_conditions: Option<String>,
}

impl Environment {
    /// True when no field is set
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.browser.is_none()
            && self.os.is_none()
            && self.device.is_none()
            && self.version.is_none()
            && self.user_role.is_none()
            && self.data_conditions.is_none()
    }
}

/// Technical context for a bug; every field optional
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TechnicalDetails {
    /// Exact error message text
    #[serde(default)]
    pub error_message: Option<String>,
    /// Stack trace text
    #[serde(default)]
    pub stack_trace: Option<String>,
    /// Console log excerpt
    #[serde(default)]
    pub console_logs: Option<String>,
    /// Affected code reference (file/line)
    #[serde(default)]
    pub affected_code: Option<String>,
    /// Failing API calls
    #[serde(default)]
    pub api_calls: Option<String>,
    /// Relevant database state
    #[serde(default)]
    pub database_state: Option<String>,
}

/// Bug/problem report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bug {
    /// Summary, 10-200 chars
    pub summary: String,
    /// Current vs expected behavior and impact, at least 20 chars
    pub description: String,
    /// Severity of the defect itself
    #[serde(default)]
    pub severity: Severity,
    /// Scheduling priority; `Critical` is allowed here
    #[serde(default)]
    pub priority: Priority,
    /// Numbered reproduction steps, minimum 3
    pub reproduction_steps: Vec<String>,
    /// Where the bug occurs
    #[serde(default)]
    pub environment: Environment,
    /// Error messages, traces, logs
    #[serde(default)]
    pub technical_details: Option<TechnicalDetails>,
    /// How to verify the fix
    #[serde(default)]
    pub acceptance_criteria: Vec<String>,
    /// Proposed remedy
    #[serde(default)]
    pub suggested_fix: Option<String>,
}

impl Bug {
    /// Create a bug report
    ///
    /// Enforces the construction-time invariants: summary 10-200 chars,
    /// description at least 20 chars, at least 3 reproduction steps.
    pub fn new(
        summary: impl Into<String>,
        description: impl Into<String>,
        reproduction_steps: Vec<String>,
    ) -> Result<Self, ValidationError> {
        let summary = summary.into();
        let description = description.into();
        check_length("summary", &summary, 10, 200)?;
        check_length("description", &description, 20, usize::MAX)?;
        check_min_entries("reproduction_steps", &reproduction_steps, 3)?;
        Ok(Self {
            summary,
            description,
            severity: Severity::Medium,
            priority: Priority::Medium,
            reproduction_steps,
            environment: Environment::default(),
            technical_details: None,
            acceptance_criteria: Vec::new(),
            suggested_fix: None,
        })
    }

    /// Set severity
    #[must_use]
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Set priority (full Critical..Low set)
    #[must_use]
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Set environment
    #[must_use]
    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    /// Set technical details
    #[must_use]
    pub fn with_technical_details(mut self, details: TechnicalDetails) -> Self {
        self.technical_details = Some(details);
        self
    }

    /// Set fix-verification criteria
    #[must_use]
    pub fn with_criteria(mut self, criteria: Vec<String>) -> Self {
        self.acceptance_criteria = criteria;
        self
    }

    /// Set suggested fix
    #[must_use]
    pub fn with_suggested_fix(mut self, fix: impl Into<String>) -> Self {
        self.suggested_fix = Some(fix.into());
        self
    }
}

/// Agile user story in "As a / I want to / So that" form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserStory {
    /// Title, 5-200 chars
    pub title: String,
    /// Role or persona
    pub as_a: String,
    /// Action or feature
    pub i_want_to: String,
    /// Business value or benefit
    pub so_that: String,
    /// Testable criteria, minimum 3
    pub acceptance_criteria: Vec<String>,
    /// Checklist completing the story
    #[serde(default)]
    pub definition_of_done: Option<Vec<String>>,
    /// High/Medium/Low
    #[serde(default)]
    pub priority: Priority,
    /// Effort size label, never a raw point count
    #[serde(default)]
    pub estimated_effort: Option<EffortSize>,
}

impl UserStory {
    /// Create a user story
    ///
    /// The template triad (`as_a`, `i_want_to`, `so_that`) is required and
    /// must be non-blank; at least 3 acceptance criteria are required.
    pub fn new(
        title: impl Into<String>,
        as_a: impl Into<String>,
        i_want_to: impl Into<String>,
        so_that: impl Into<String>,
        acceptance_criteria: Vec<String>,
    ) -> Result<Self, ValidationError> {
        let title = title.into();
        let as_a = as_a.into();
        let i_want_to = i_want_to.into();
        let so_that = so_that.into();
        check_length("title", &title, 5, 200)?;
        check_required("as_a", &as_a)?;
        check_required("i_want_to", &i_want_to)?;
        check_required("so_that", &so_that)?;
        check_min_entries("acceptance_criteria", &acceptance_criteria, 3)?;
        Ok(Self {
            title,
            as_a,
            i_want_to,
            so_that,
            acceptance_criteria,
            definition_of_done: None,
            priority: Priority::Medium,
            estimated_effort: None,
        })
    }

    /// Set definition of done
    #[must_use]
    pub fn with_definition_of_done(mut self, items: Vec<String>) -> Self {
        self.definition_of_done = Some(items);
        self
    }

    /// Set priority; `Critical` is rejected for stories
    pub fn with_priority(mut self, priority: Priority) -> Result<Self, ValidationError> {
        self.priority = priority.check_basic("priority")?;
        Ok(self)
    }

    /// Set estimated effort
    #[must_use]
    pub fn with_effort(mut self, effort: EffortSize) -> Self {
        self.estimated_effort = Some(effort);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn task_title_bounds() {
        assert!(Task::new("Add x", "desc").is_ok());
        let err = Task::new("Add", "desc").unwrap_err();
        assert!(matches!(
            err,
            ValidationError::LengthOutOfRange { field: "title", .. }
        ));
        assert!(Task::new("x".repeat(201), "desc").is_err());
    }

    #[test]
    fn task_rejects_critical_priority() {
        let task = Task::new("Add login", "desc").unwrap();
        let err = task.with_priority(Priority::Critical).unwrap_err();
        assert_eq!(
            err,
            ValidationError::InvalidValue {
                field: "priority",
                value: "Critical".to_string()
            }
        );
    }

    #[test]
    fn bug_requires_three_reproduction_steps() {
        let steps2 = vec!["open page".to_string(), "click login".to_string()];
        let err = Bug::new(
            "Login button dead on Safari",
            "Clicking login does nothing on Safari iOS 15",
            steps2,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ValidationError::TooFewEntries {
                field: "reproduction_steps",
                min: 3,
                actual: 2
            }
        ));

        let steps3 = vec![
            "open page".to_string(),
            "click login".to_string(),
            "observe nothing".to_string(),
        ];
        let bug = Bug::new(
            "Login button dead on Safari",
            "Clicking login does nothing on Safari iOS 15",
            steps3,
        )
        .unwrap();
        assert_eq!(bug.severity, Severity::Medium);
        assert!(bug.environment.is_empty());
    }

    #[test]
    fn bug_accepts_critical_priority() {
        let bug = Bug::new(
            "Data loss when saving drafts",
            "Draft content is dropped silently on save",
            vec!["a".into(), "b".into(), "c".into()],
        )
        .unwrap()
        .with_priority(Priority::Critical)
        .with_severity(Severity::Critical);
        assert_eq!(bug.priority, Priority::Critical);
    }

    #[test]
    fn story_requires_triad_and_three_criteria() {
        let criteria3: Vec<String> = vec!["a".into(), "b".into(), "c".into()];

        assert!(UserStory::new("Reset password", "user", "reset my password", "I regain access", criteria3.clone()).is_ok());

        let err = UserStory::new("Reset password", " ", "reset", "access", criteria3.clone())
            .unwrap_err();
        assert_eq!(err, ValidationError::MissingField { field: "as_a" });

        let err = UserStory::new(
            "Reset password",
            "user",
            "reset my password",
            "I regain access",
            vec!["a".into(), "b".into()],
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ValidationError::TooFewEntries {
                field: "acceptance_criteria",
                ..
            }
        ));
    }

    #[test]
    fn effort_rejects_free_text_literal() {
        // "High" is a priority literal, not an effort size
        let parsed: Result<EffortSize, _> = serde_json::from_str("\"High\"");
        assert!(parsed.is_err());
        let parsed: EffortSize = serde_json::from_str("\"Large\"").unwrap();
        assert_eq!(parsed, EffortSize::Large);
    }

    #[test]
    fn issue_type_wire_names() {
        assert_eq!(
            serde_json::to_string(&IssueType::EpicOnly).unwrap(),
            "\"epic-only\""
        );
        assert_eq!(
            serde_json::from_str::<IssueType>("\"story\"").unwrap(),
            IssueType::Story
        );
    }
}
