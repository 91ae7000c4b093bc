//! Instruction templates for every engine call
//!
//! Each template fixes two things: the instruction text sent to the
//! provider, and the JSON shape expected back. Field names in the shapes
//! match the work-item model one for one, and every enum-like field states
//! its exact literal set so a provider cannot invent values the model will
//! accept.
//!
//! The refinement template asks for the same JSON shape as extraction; the
//! response is parsed with the same contract mapping.

/// System prompt for extraction calls
pub const EXTRACTION_SYSTEM: &str = "You are a technical product manager extracting \
issue-tracker tickets from text. Return valid JSON only.";

/// System prompt for review calls
pub const REVIEW_SYSTEM: &str = "You are a senior software architect reviewing requirements. \
Find gaps, ambiguities, and missing details. Be thorough and critical. Return valid JSON only.";

/// System prompt for refinement calls
pub const REFINEMENT_SYSTEM: &str = "You are a requirements analyst. Refine the ticket \
structure based on user feedback. Return valid JSON only.";

const TASK_EXTRACTION: &str = r#"Extract epics and tasks from the text below.

Text:
{text}

Project Key: {project_key}

Extract:
1. EPICS - high-level features: clear title (5-200 chars), description explaining why it
   matters, business value (who benefits), priority.
2. TASKS under each epic - actionable work items: specific title, description with technical
   context, acceptance criteria covering functional behavior, security, performance, error
   cases and testing, technical notes (APIs, schemas, dependencies).
3. IMPLICIT REQUIREMENTS the text does not mention but the work needs: error handling,
   input validation, security, testing, monitoring.

Rules:
- priority MUST be exactly one of: "High", "Medium", "Low"
- estimated_effort MUST be exactly one of: "Small", "Medium", "Large"
- Acceptance criteria must be specific and testable
- Separate software modules (batch jobs, services, front-end) go to separate tasks

Return JSON of this exact shape:
{
  "epics": [
    {
      "title": "...",
      "description": "...",
      "business_value": "...",
      "priority": "High",
      "tasks": [
        {
          "title": "...",
          "description": "...",
          "acceptance_criteria": ["..."],
          "technical_notes": "...",
          "priority": "Medium",
          "estimated_effort": "Medium"
        }
      ]
    }
  ]
}"#;

const BUG_EXTRACTION: &str = r#"Extract bug reports from the text below.

Text:
{text}

Project Key: {project_key}

Extract for each bug:
1. SUMMARY - what is broken, where, and under what conditions (10-200 chars).
2. DESCRIPTION - current behavior, expected behavior, user/business impact (at least 20 chars).
3. REPRODUCTION STEPS - numbered, exact, at least 3, reproducible by any developer.
4. ENVIRONMENT - browser, OS, device, version, user role, data conditions (when mentioned).
5. TECHNICAL DETAILS - exact error messages, stack traces, console logs, failing API calls,
   database state (when mentioned).
6. ACCEPTANCE CRITERIA - how to verify the fix, including regression scenarios.

Rules:
- severity MUST be exactly one of: "Critical", "High", "Medium", "Low"
- priority MUST be exactly one of: "Critical", "High", "Medium", "Low"
- Critical means system down, data loss, or security breach

Return JSON of this exact shape:
{
  "bugs": [
    {
      "summary": "...",
      "description": "...",
      "severity": "High",
      "priority": "High",
      "reproduction_steps": ["...", "...", "..."],
      "environment": {"browser": "...", "os": "...", "device": "...", "version": "...",
                      "user_role": "...", "data_conditions": "..."},
      "technical_details": {"error_message": "...", "stack_trace": "...", "console_logs": "...",
                            "affected_code": "...", "api_calls": "...", "database_state": "..."},
      "acceptance_criteria": ["..."],
      "suggested_fix": "..."
    }
  ]
}"#;

const STORY_EXTRACTION: &str = r#"Extract agile user stories from the text below.

Text:
{text}

Project Key: {project_key}

Extract for each story:
1. The template triad: as_a (role/persona), i_want_to (action/feature), so_that
   (business value) - all three required.
2. ACCEPTANCE CRITERIA - at least 3, Given/When/Then form, covering the happy path,
   validation and error scenarios.
3. DEFINITION OF DONE - checklist items completing the story (when derivable).

Rules:
- priority MUST be exactly one of: "High", "Medium", "Low"
- estimated_effort MUST be exactly one of: "Small", "Medium", "Large"

Return JSON of this exact shape:
{
  "stories": [
    {
      "title": "...",
      "as_a": "...",
      "i_want_to": "...",
      "so_that": "...",
      "acceptance_criteria": ["...", "...", "..."],
      "definition_of_done": ["..."],
      "priority": "High",
      "estimated_effort": "Medium"
    }
  ]
}"#;

const REVIEW: &str = r#"Review the ticket structure below for completeness and quality.

Current Structure:
{structure}

Check:
1. COMPLETENESS - does each item have at least 3 detailed acceptance criteria covering
   success AND failure scenarios? Are inputs/outputs, edge cases, performance and security
   requirements specified?
2. AMBIGUITY - flag vague wording ("user-friendly", "fast", "robust"), undefined terms,
   missing specifics (which API? what format? what happens if...?).
3. MISSING WORK - required tasks the structure does not mention: migrations, error
   handling, input sanitization, rate limiting, tests, monitoring, rollback.
4. QUESTIONS - specific clarification questions for the author (exact technical choices,
   business rules, performance targets), not open-ended ones.

Return JSON of this exact shape (every value a list of strings; use [] when empty):
{
  "gaps": ["..."],
  "ambiguities": ["..."],
  "missing_tasks": ["..."],
  "questions": ["..."],
  "suggestions": ["..."],
  "production_readiness_concerns": ["..."]
}"#;

const REFINEMENT: &str = r#"Refine this ticket structure based on user feedback.

Original Structure:
{structure}

User Feedback:
{feedback}

Apply the feedback: fill gaps, resolve ambiguities, add the suggested work, enhance
acceptance criteria with specifics. Preserve all existing information; only add or enhance.

Rules:
- priority MUST use the exact values "High", "Medium", "Low" (bugs also allow "Critical")
- estimated_effort MUST use the exact values "Small", "Medium", "Large"
- severity MUST use the exact values "Critical", "High", "Medium", "Low"

Return the same JSON shape as extraction: a top-level "epics", "bugs", or "stories" array
matching the structure's issue type, with the same field names as before."#;

use tg_model::IssueType;

/// Render the extraction prompt for an issue type
#[must_use]
pub fn extraction_prompt(issue_type: IssueType, text: &str, project_key: &str) -> String {
    let template = match issue_type {
        IssueType::Bug => BUG_EXTRACTION,
        IssueType::Story => STORY_EXTRACTION,
        IssueType::Task | IssueType::EpicOnly => TASK_EXTRACTION,
    };
    template
        .replace("{text}", text)
        .replace("{project_key}", project_key)
}

/// Render the review prompt over a flattened structure
#[must_use]
pub fn review_prompt(structure_text: &str) -> String {
    REVIEW.replace("{structure}", structure_text)
}

/// Render the refinement prompt over a flattened structure and Q&A feedback
#[must_use]
pub fn refinement_prompt(structure_text: &str, feedback: &str) -> String {
    REFINEMENT
        .replace("{structure}", structure_text)
        .replace("{feedback}", feedback)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extraction_prompt_selects_template_and_fills_placeholders() {
        let prompt = extraction_prompt(IssueType::Bug, "login broken", "PROJ");
        assert!(prompt.contains("bug reports"));
        assert!(prompt.contains("login broken"));
        assert!(prompt.contains("Project Key: PROJ"));
        assert!(!prompt.contains("{text}"));

        let prompt = extraction_prompt(IssueType::EpicOnly, "notes", "PROJ");
        assert!(prompt.contains("\"epics\""));
    }

    #[test]
    fn templates_state_closed_literal_sets() {
        for issue_type in [IssueType::Task, IssueType::Story] {
            let prompt = extraction_prompt(issue_type, "t", "PROJ");
            assert!(prompt.contains(r#""Small", "Medium", "Large""#));
            assert!(prompt.contains(r#""High", "Medium", "Low""#));
        }
        let bug = extraction_prompt(IssueType::Bug, "t", "PROJ");
        assert!(bug.contains(r#""Critical", "High", "Medium", "Low""#));
    }

    #[test]
    fn review_and_refinement_embed_structure() {
        let review = review_prompt("Epic: Auth");
        assert!(review.contains("Epic: Auth"));
        assert!(review.contains("production_readiness_concerns"));

        let refine = refinement_prompt("Epic: Auth", "Q: x\nA: y");
        assert!(refine.contains("Q: x"));
        assert!(refine.contains("same JSON shape as extraction"));
    }
}
