//! Flattened text rendering of a structure
//!
//! Indented epic -> task -> criteria (or bug / story) text embedded in the
//! review and refinement prompts. This is prompt plumbing, not the editable
//! document format; that belongs to the serializer collaborator.

use tg_model::{Bug, Epic, TicketStructure, UserStory};

/// Render a structure as indented plain text
#[must_use]
pub fn flatten(structure: &TicketStructure) -> String {
    let mut lines = vec![
        format!("Project: {}", structure.project_key),
        format!("Issue Type: {}", structure.issue_type),
    ];

    for epic in &structure.epics {
        render_epic(&mut lines, epic);
    }
    for bug in &structure.bugs {
        render_bug(&mut lines, bug);
    }
    for story in &structure.stories {
        render_story(&mut lines, story);
    }

    lines.join("\n")
}

fn render_epic(lines: &mut Vec<String>, epic: &Epic) {
    lines.push(String::new());
    lines.push(format!("Epic: {}", epic.title));
    lines.push(format!("Description: {}", epic.description));
    if let Some(value) = &epic.business_value {
        lines.push(format!("Business Value: {value}"));
    }
    lines.push(format!("Priority: {}", epic.priority));

    for task in &epic.tasks {
        lines.push(String::new());
        lines.push(format!("  Task: {}", task.title));
        lines.push(format!("  Description: {}", task.description));
        lines.push(format!("  Priority: {}", task.priority));
        if let Some(effort) = task.estimated_effort {
            lines.push(format!("  Estimated Effort: {effort}"));
        }
        if !task.acceptance_criteria.is_empty() {
            lines.push("  Acceptance Criteria:".to_string());
            for criterion in &task.acceptance_criteria {
                lines.push(format!("    - {criterion}"));
            }
        }
        if let Some(notes) = &task.technical_notes {
            lines.push(format!("  Technical Notes: {notes}"));
        }
    }
}

fn render_bug(lines: &mut Vec<String>, bug: &Bug) {
    lines.push(String::new());
    lines.push(format!("Bug: {}", bug.summary));
    lines.push(format!("Description: {}", bug.description));
    lines.push(format!("Severity: {}", bug.severity));
    lines.push(format!("Priority: {}", bug.priority));

    lines.push("Reproduction Steps:".to_string());
    for (i, step) in bug.reproduction_steps.iter().enumerate() {
        lines.push(format!("  {}. {step}", i + 1));
    }

    if !bug.environment.is_empty() {
        lines.push("Environment:".to_string());
        let env = &bug.environment;
        for (label, value) in [
            ("Browser", &env.browser),
            ("OS", &env.os),
            ("Device", &env.device),
            ("Version", &env.version),
            ("User Role", &env.user_role),
            ("Data Conditions", &env.data_conditions),
        ] {
            if let Some(value) = value {
                lines.push(format!("  {label}: {value}"));
            }
        }
    }

    if !bug.acceptance_criteria.is_empty() {
        lines.push("Fix Verification Criteria:".to_string());
        for criterion in &bug.acceptance_criteria {
            lines.push(format!("  - {criterion}"));
        }
    }
    if let Some(fix) = &bug.suggested_fix {
        lines.push(format!("Suggested Fix: {fix}"));
    }
}

fn render_story(lines: &mut Vec<String>, story: &UserStory) {
    lines.push(String::new());
    lines.push(format!("Story: {}", story.title));
    lines.push(format!("As a: {}", story.as_a));
    lines.push(format!("I want to: {}", story.i_want_to));
    lines.push(format!("So that: {}", story.so_that));
    lines.push(format!("Priority: {}", story.priority));
    if let Some(effort) = story.estimated_effort {
        lines.push(format!("Estimated Effort: {effort}"));
    }

    lines.push("Acceptance Criteria:".to_string());
    for criterion in &story.acceptance_criteria {
        lines.push(format!("  - {criterion}"));
    }

    if let Some(items) = &story.definition_of_done {
        lines.push("Definition of Done:".to_string());
        for item in items {
            lines.push(format!("  - {item}"));
        }
    }
}
