//! Response contract: wire shapes and their mapping into the model
//!
//! One wire struct per response shape, with exactly the fields the data
//! model defines; no field exists here without a model counterpart, and vice
//! versa. Untyped JSON never crosses into the model layer: every wire value
//! is converted through the validating constructors, and a failure is a
//! [`ContractError`] at this boundary.
//!
//! [`parse_extraction`] is used by BOTH the extraction engine and the
//! refinement step of the review engine. The reuse is deliberate: refinement
//! output must satisfy the same schema extraction output does.

use crate::error::ContractError;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tg_model::{
    Bug, EffortSize, Environment, Epic, IssueType, Priority, Severity, Task, TechnicalDetails,
    TicketStructure, UserStory, ValidationError,
};

/// Parse an enum literal through its serde definition
///
/// Keeps the closed literal set defined in exactly one place (the enum) and
/// turns a stray literal into a `ValidationError` naming the field.
fn parse_literal<T: DeserializeOwned>(
    field: &'static str,
    value: Option<String>,
) -> Result<Option<T>, ValidationError> {
    match value {
        None => Ok(None),
        Some(s) => serde_json::from_value(Value::String(s.clone()))
            .map(Some)
            .map_err(|_| ValidationError::InvalidValue { field, value: s }),
    }
}

#[derive(Debug, Deserialize)]
struct EpicsResponse {
    #[serde(default)]
    epics: Vec<EpicWire>,
}

#[derive(Debug, Deserialize)]
struct EpicWire {
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    business_value: Option<String>,
    #[serde(default)]
    priority: Option<String>,
    #[serde(default)]
    tasks: Vec<TaskWire>,
}

#[derive(Debug, Deserialize)]
struct TaskWire {
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    acceptance_criteria: Vec<String>,
    #[serde(default)]
    technical_notes: Option<String>,
    #[serde(default)]
    priority: Option<String>,
    #[serde(default)]
    estimated_effort: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BugsResponse {
    #[serde(default)]
    bugs: Vec<BugWire>,
}

#[derive(Debug, Deserialize)]
struct BugWire {
    summary: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    severity: Option<String>,
    #[serde(default)]
    priority: Option<String>,
    #[serde(default)]
    reproduction_steps: Vec<String>,
    #[serde(default)]
    environment: Environment,
    #[serde(default)]
    technical_details: Option<TechnicalDetails>,
    #[serde(default)]
    acceptance_criteria: Vec<String>,
    #[serde(default)]
    suggested_fix: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StoriesResponse {
    #[serde(default)]
    stories: Vec<StoryWire>,
}

#[derive(Debug, Deserialize)]
struct StoryWire {
    title: String,
    #[serde(default)]
    as_a: String,
    #[serde(default)]
    i_want_to: String,
    #[serde(default)]
    so_that: String,
    #[serde(default)]
    acceptance_criteria: Vec<String>,
    #[serde(default)]
    definition_of_done: Option<Vec<String>>,
    #[serde(default)]
    priority: Option<String>,
    #[serde(default)]
    estimated_effort: Option<String>,
}

impl TryFrom<TaskWire> for Task {
    type Error = ValidationError;

    fn try_from(wire: TaskWire) -> Result<Self, Self::Error> {
        let mut task =
            Task::new(wire.title, wire.description)?.with_criteria(wire.acceptance_criteria);
        if let Some(notes) = wire.technical_notes {
            task = task.with_technical_notes(notes);
        }
        if let Some(priority) = parse_literal::<Priority>("priority", wire.priority)? {
            task = task.with_priority(priority)?;
        }
        if let Some(effort) = parse_literal::<EffortSize>("estimated_effort", wire.estimated_effort)?
        {
            task = task.with_effort(effort);
        }
        Ok(task)
    }
}

impl TryFrom<EpicWire> for Epic {
    type Error = ValidationError;

    fn try_from(wire: EpicWire) -> Result<Self, Self::Error> {
        let mut epic = Epic::new(wire.title, wire.description)?;
        if let Some(value) = wire.business_value {
            epic = epic.with_business_value(value);
        }
        if let Some(priority) = parse_literal::<Priority>("priority", wire.priority)? {
            epic = epic.with_priority(priority)?;
        }
        let tasks = wire
            .tasks
            .into_iter()
            .map(Task::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(epic.with_tasks(tasks))
    }
}

impl TryFrom<BugWire> for Bug {
    type Error = ValidationError;

    fn try_from(wire: BugWire) -> Result<Self, Self::Error> {
        let mut bug = Bug::new(wire.summary, wire.description, wire.reproduction_steps)?
            .with_environment(wire.environment)
            .with_criteria(wire.acceptance_criteria);
        if let Some(severity) = parse_literal::<Severity>("severity", wire.severity)? {
            bug = bug.with_severity(severity);
        }
        if let Some(priority) = parse_literal::<Priority>("priority", wire.priority)? {
            bug = bug.with_priority(priority);
        }
        if let Some(details) = wire.technical_details {
            bug = bug.with_technical_details(details);
        }
        if let Some(fix) = wire.suggested_fix {
            bug = bug.with_suggested_fix(fix);
        }
        Ok(bug)
    }
}

impl TryFrom<StoryWire> for UserStory {
    type Error = ValidationError;

    fn try_from(wire: StoryWire) -> Result<Self, Self::Error> {
        let mut story = UserStory::new(
            wire.title,
            wire.as_a,
            wire.i_want_to,
            wire.so_that,
            wire.acceptance_criteria,
        )?;
        if let Some(items) = wire.definition_of_done {
            story = story.with_definition_of_done(items);
        }
        if let Some(priority) = parse_literal::<Priority>("priority", wire.priority)? {
            story = story.with_priority(priority)?;
        }
        if let Some(effort) = parse_literal::<EffortSize>("estimated_effort", wire.estimated_effort)?
        {
            story = story.with_effort(effort);
        }
        Ok(story)
    }
}

/// Map an extraction (or refinement) response onto a [`TicketStructure`]
///
/// Rejects the response if it is not valid JSON, if any mapped entity fails
/// validation, or if it holds no items for the requested issue type.
pub fn parse_extraction(
    json_text: &str,
    project_key: &str,
    issue_type: IssueType,
) -> Result<TicketStructure, ContractError> {
    let structure = TicketStructure::new(project_key, issue_type)?;
    match issue_type {
        IssueType::Task | IssueType::EpicOnly => {
            let response: EpicsResponse = serde_json::from_str(json_text)?;
            let epics = response
                .epics
                .into_iter()
                .map(Epic::try_from)
                .collect::<Result<Vec<_>, _>>()?;
            if epics.is_empty() {
                return Err(ContractError::Empty(issue_type));
            }
            Ok(structure.with_epics(epics))
        }
        IssueType::Bug => {
            let response: BugsResponse = serde_json::from_str(json_text)?;
            let bugs = response
                .bugs
                .into_iter()
                .map(Bug::try_from)
                .collect::<Result<Vec<_>, _>>()?;
            if bugs.is_empty() {
                return Err(ContractError::Empty(issue_type));
            }
            Ok(structure.with_bugs(bugs))
        }
        IssueType::Story => {
            let response: StoriesResponse = serde_json::from_str(json_text)?;
            let stories = response
                .stories
                .into_iter()
                .map(UserStory::try_from)
                .collect::<Result<Vec<_>, _>>()?;
            if stories.is_empty() {
                return Err(ContractError::Empty(issue_type));
            }
            Ok(structure.with_stories(stories))
        }
    }
}

/// Parse a review response into a critique
///
/// The wire shape is the critique itself: six string lists, absent keys
/// defaulting to empty rather than erroring.
pub fn parse_review(json_text: &str) -> Result<tg_model::CritiqueResult, ContractError> {
    Ok(serde_json::from_str(json_text)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn epics_response_maps_onto_model() {
        let json = r#"{"epics":[{"title":"Auth system","description":"d","priority":"High",
            "tasks":[{"title":"Login endpoint","description":"d",
                "acceptance_criteria":["a","b","c"],"priority":"High","estimated_effort":"Medium"}]}]}"#;
        let s = parse_extraction(json, "PROJ", IssueType::Task).unwrap();
        assert_eq!(s.epics.len(), 1);
        assert_eq!(s.epics[0].priority, Priority::High);
        assert_eq!(s.epics[0].tasks[0].estimated_effort, Some(EffortSize::Medium));
        assert_eq!(s.total_items(), 2);
    }

    #[test]
    fn effort_literal_high_is_a_validation_error() {
        let json = r#"{"epics":[{"title":"Auth system","description":"d",
            "tasks":[{"title":"Login endpoint","description":"d","estimated_effort":"High"}]}]}"#;
        let err = parse_extraction(json, "PROJ", IssueType::Task).unwrap_err();
        match err {
            ContractError::Validation(ValidationError::InvalidValue { field, value }) => {
                assert_eq!(field, "estimated_effort");
                assert_eq!(value, "High");
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn task_priority_critical_is_rejected() {
        let json = r#"{"epics":[{"title":"Auth system","description":"d",
            "tasks":[{"title":"Login endpoint","description":"d","priority":"Critical"}]}]}"#;
        assert!(matches!(
            parse_extraction(json, "PROJ", IssueType::Task),
            Err(ContractError::Validation(ValidationError::InvalidValue { .. }))
        ));
    }

    #[test]
    fn bug_response_enforces_step_minimum() {
        let json = r#"{"bugs":[{"summary":"Login button dead on Safari",
            "description":"Button never submits the form on iOS",
            "severity":"High","priority":"Critical",
            "reproduction_steps":["open","click"]}]}"#;
        assert!(matches!(
            parse_extraction(json, "PROJ", IssueType::Bug),
            Err(ContractError::Validation(ValidationError::TooFewEntries { .. }))
        ));
    }

    #[test]
    fn bug_response_with_context_maps_fully() {
        let json = r#"{"bugs":[{"summary":"Login button dead on Safari",
            "description":"Button never submits the form on iOS",
            "severity":"High","priority":"Critical",
            "reproduction_steps":["open","click","observe"],
            "environment":{"browser":"Safari iOS 15","os":"iOS 15"},
            "technical_details":{"console_logs":"TypeError: null"},
            "acceptance_criteria":["submits"],
            "suggested_fix":"add touchend handler"}]}"#;
        let s = parse_extraction(json, "PROJ", IssueType::Bug).unwrap();
        let bug = &s.bugs[0];
        assert_eq!(bug.priority, Priority::Critical);
        assert_eq!(bug.environment.browser.as_deref(), Some("Safari iOS 15"));
        assert_eq!(
            bug.technical_details.as_ref().unwrap().console_logs.as_deref(),
            Some("TypeError: null")
        );
    }

    #[test]
    fn story_response_requires_triad() {
        let json = r#"{"stories":[{"title":"Password reset",
            "as_a":"user","i_want_to":"reset my password","so_that":"I regain access",
            "acceptance_criteria":["a","b","c"],"estimated_effort":"Small"}]}"#;
        let s = parse_extraction(json, "PROJ", IssueType::Story).unwrap();
        assert_eq!(s.stories[0].estimated_effort, Some(EffortSize::Small));

        let missing = r#"{"stories":[{"title":"Password reset",
            "i_want_to":"reset","so_that":"access","acceptance_criteria":["a","b","c"]}]}"#;
        assert!(matches!(
            parse_extraction(missing, "PROJ", IssueType::Story),
            Err(ContractError::Validation(ValidationError::MissingField { field: "as_a" }))
        ));
    }

    #[test]
    fn non_json_and_empty_responses_are_contract_errors() {
        assert!(matches!(
            parse_extraction("here are your tickets!", "PROJ", IssueType::Task),
            Err(ContractError::Json(_))
        ));
        assert!(matches!(
            parse_extraction(r#"{"epics":[]}"#, "PROJ", IssueType::Task),
            Err(ContractError::Empty(IssueType::Task))
        ));
        // the wrong key for the issue type also means no items
        assert!(matches!(
            parse_extraction(r#"{"epics":[]}"#, "PROJ", IssueType::Bug),
            Err(ContractError::Empty(IssueType::Bug))
        ));
    }

    #[test]
    fn review_response_defaults_absent_keys() {
        let critique = parse_review(r#"{"gaps":["g"],"questions":["q"]}"#).unwrap();
        assert!(critique.has_issues());
        assert!(critique.suggestions.is_empty());
        assert!(parse_review("not json").is_err());
    }
}
