//! Session state between the fix pass and the commit pass.
//!
//! A [`ReviewSession`] exists only while candidate edits await operator
//! confirmation. It is created by a successful process pass, owned by the
//! command handler, and consumed (never reused) by a commit attempt.

use std::collections::HashMap;

use crate::fixer::CandidateEdit;
use crate::git::{FileRecord, RepoRef};

#[derive(Debug, Clone)]
pub struct ReviewSession {
    repo: RepoRef,
    branch: String,
    /// Revision markers as captured at fetch time, keyed by path
    markers: HashMap<String, String>,
    edits: Vec<CandidateEdit>,
}

impl ReviewSession {
    #[must_use]
    pub fn new(
        repo: RepoRef,
        branch: impl Into<String>,
        files: &[FileRecord],
        edits: Vec<CandidateEdit>,
    ) -> Self {
        let markers = files
            .iter()
            .map(|record| (record.path.clone(), record.revision_marker.clone()))
            .collect();

        Self {
            repo,
            branch: branch.into(),
            markers,
            edits,
        }
    }

    #[must_use]
    pub fn repo(&self) -> &RepoRef {
        &self.repo
    }

    #[must_use]
    pub fn branch(&self) -> &str {
        &self.branch
    }

    #[must_use]
    pub fn edits(&self) -> &[CandidateEdit] {
        &self.edits
    }

    /// The fetch-time revision marker for a path, never recomputed
    #[must_use]
    pub fn revision_marker(&self, path: &str) -> Option<&str> {
        self.markers.get(path).map(String::as_str)
    }
}

/// Aggregated outcome of a commit pass, rendered to the operator before
/// the session is discarded
#[derive(Debug, Clone, Default)]
pub struct CommitSummary {
    pub succeeded: Vec<String>,
    pub failed: Vec<(String, String)>,
}

impl CommitSummary {
    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.failed.is_empty()
    }

    #[must_use]
    pub fn render(&self) -> String {
        if self.succeeded.is_empty() && self.failed.is_empty() {
            return "Nothing was committed".to_string();
        }

        let mut lines = Vec::new();

        if self.all_succeeded() {
            lines.push(format!(
                "Changes committed successfully ({} file(s))",
                self.succeeded.len()
            ));
        } else {
            lines.push(format!(
                "Commit finished with failures: {} succeeded, {} failed",
                self.succeeded.len(),
                self.failed.len()
            ));
        }

        for path in &self.succeeded {
            lines.push(format!("  committed {path}"));
        }
        for (path, reason) in &self.failed {
            lines.push(format!("  failed    {path}: {reason}"));
        }

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session_with_one_edit() -> ReviewSession {
        let files = vec![
            FileRecord {
                path: "index.html".into(),
                original_content: "<p>old</p>".into(),
                revision_marker: "abc123".into(),
            },
            FileRecord {
                path: "untouched.css".into(),
                original_content: "p {}".into(),
                revision_marker: "def456".into(),
            },
        ];
        let edits = vec![CandidateEdit {
            path: "index.html".into(),
            original_content: "<p>old</p>".into(),
            updated_content: "<p>new</p>".into(),
        }];

        ReviewSession::new(
            RepoRef {
                owner: "acme".into(),
                name: "widgets".into(),
            },
            "main",
            &files,
            edits,
        )
    }

    #[test]
    fn test_markers_come_from_fetch_time_records() {
        let session = session_with_one_edit();

        assert_eq!(session.revision_marker("index.html"), Some("abc123"));
        assert_eq!(session.revision_marker("untouched.css"), Some("def456"));
        assert_eq!(session.revision_marker("missing.js"), None);
    }

    #[test]
    fn test_summary_render_all_ok() {
        let summary = CommitSummary {
            succeeded: vec!["index.html".into()],
            failed: vec![],
        };

        assert!(summary.all_succeeded());
        let rendered = summary.render();
        assert!(rendered.contains("committed successfully"));
        assert!(rendered.contains("index.html"));
    }

    #[test]
    fn test_summary_render_partial_failure() {
        let summary = CommitSummary {
            succeeded: vec!["a.py".into()],
            failed: vec![("b.py".into(), "conflict: stale marker".into())],
        };

        assert!(!summary.all_succeeded());
        let rendered = summary.render();
        assert!(rendered.contains("1 succeeded, 1 failed"));
        assert!(rendered.contains("b.py: conflict: stale marker"));
    }
}
