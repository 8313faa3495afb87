//! Prompt construction, response normalization and the per-file fix loop.

mod normalize;
mod orchestrator;
mod prompt;

pub use normalize::strip_code_fences;
pub use orchestrator::fix_files;
pub use prompt::{build_prompt, UNCHANGED_SENTINEL};

use crate::lang;

/// A proposed, not yet committed, modification of one file
///
/// Only created when the cleaned agent response differs from the original
/// and is not the no-change sentinel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateEdit {
    pub path: String,
    pub original_content: String,
    pub updated_content: String,
}

impl CandidateEdit {
    /// Renders a unified diff of the proposed change for operator review
    #[must_use]
    pub fn render_diff(&self) -> String {
        let patch = diffy::create_patch(&self.original_content, &self.updated_content);

        format!(
            "File: {path} ({language})\n{patch}",
            path = self.path,
            language = lang::language_for_path(&self.path),
        )
    }
}
