//! The instruction given to the agent for every file.
//!
//! The prompt doubles as a contract: the agent must return either the
//! complete replacement file or the literal sentinel, and the orchestrator
//! filters responses against exactly that contract.

/// The literal response meaning "no change required"
pub const UNCHANGED_SENTINEL: &str = "UNCHANGED";

/// Builds the fix instruction for one file
///
/// Deterministic; no state, no side effects.
#[must_use]
pub fn build_prompt(path: &str, issue_description: &str, original_content: &str) -> String {
    indoc::formatdoc! {"
        File: {path}
        Issue: {issue_description}

        Instructions:
        1. Keep the entire original code unchanged except for the minimal modifications needed to address the issue.
        2. Do not rewrite or reformat the entire file.
        3. Insert or modify only what is necessary (for example, add an input field and a button in an appropriate location if needed).
        4. Return only the complete updated file content exactly as it should appear, with no extra formatting, markdown code fences, or commentary.
        If no change is needed, return '{UNCHANGED_SENTINEL}'.

        Original File Content:
        {original_content}"
    }
}
