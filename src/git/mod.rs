//! Types and the client seam for the repository hosting service.
//!
//! Everything the workflow needs from GitHub goes through [`RepositoryHost`],
//! so the passes can be exercised against a mock in tests.

pub mod github;

use std::sync::LazyLock;

use anyhow::{Context as _, Result};
use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use regex::Regex;
use serde::Deserialize;

/// Owner and name of a repository, derived once from the operator's URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    pub owner: String,
    pub name: String,
}

impl std::fmt::Display for RepoRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// One entry of the recursive repository tree
#[derive(Debug, Clone, Deserialize)]
pub struct TreeEntry {
    pub path: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl TreeEntry {
    /// Blobs are files; trees, commits and symlinks are not
    #[must_use]
    pub fn is_file(&self) -> bool {
        self.kind == "blob"
    }
}

/// A file as fetched from the hosting service
///
/// The revision marker is the blob sha captured at fetch time; a later
/// write must present exactly this marker or the service rejects it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    pub path: String,
    pub original_content: String,
    pub revision_marker: String,
}

static REPO_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"github\.com[:/](?P<owner>[^/]+)/(?P<repo>[^/]+?)(?:\.git)?/?$")
        .expect("invalid repo url regex")
});

/// Extracts owner and repository name from a GitHub URL
///
/// Accepts https, ssh (`git@github.com:owner/repo`) and plain forms, with
/// or without a `.git` suffix or trailing slash.
pub fn parse_repo_url(repo_url: &str) -> Result<RepoRef> {
    let captures = REPO_URL_RE
        .captures(repo_url.trim())
        .with_context(|| format!("Invalid GitHub repository URL: {repo_url}"))?;

    Ok(RepoRef {
        owner: captures["owner"].to_string(),
        name: captures["repo"].to_string(),
    })
}

/// The four operations the workflow needs from the hosting service
#[cfg_attr(test, automock)]
#[async_trait]
pub trait RepositoryHost: Send + Sync {
    /// The declared default branch, or a fallback if the service omits it
    async fn resolve_default_branch(&self, repo: &RepoRef) -> Result<String>;

    /// The full recursive tree of the branch
    async fn list_tree(&self, repo: &RepoRef, branch: &str) -> Result<Vec<TreeEntry>>;

    /// One file's decoded content and revision marker
    ///
    /// Retrieval failure yields `Ok(None)` so a single missing or undecodable
    /// file never aborts a batch.
    async fn fetch_file(
        &self,
        repo: &RepoRef,
        path: &str,
        branch: &str,
    ) -> Result<Option<FileRecord>>;

    /// Writes a new revision of a file, guarded by the fetch-time marker
    ///
    /// The service rejects the write if the marker is stale; that error is
    /// surfaced as-is, never retried or merged.
    async fn write_file(
        &self,
        repo: &RepoRef,
        path: &str,
        new_content: &str,
        commit_message: &str,
        revision_marker: &str,
        branch: &str,
    ) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_repo_url() {
        let urls = vec![
            "https://github.com/acme/widgets",
            "https://github.com/acme/widgets.git",
            "https://github.com/acme/widgets/",
            "git@github.com:acme/widgets.git",
            "  https://github.com/acme/widgets \n",
        ];

        for url in urls {
            let repo = parse_repo_url(url).unwrap();
            assert_eq!(repo.owner, "acme", "for {url}");
            assert_eq!(repo.name, "widgets", "for {url}");
        }
    }

    #[test]
    fn test_parse_repo_url_rejects_garbage() {
        for url in ["", "not a url", "https://example.com/acme/widgets"] {
            assert!(parse_repo_url(url).is_err(), "expected failure for {url:?}");
        }
    }

    #[test]
    fn test_tree_entry_is_file() {
        let blob = TreeEntry {
            path: "app.py".into(),
            kind: "blob".into(),
        };
        let tree = TreeEntry {
            path: "src".into(),
            kind: "tree".into(),
        };

        assert!(blob.is_file());
        assert!(!tree.is_file());
    }
}
