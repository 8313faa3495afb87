//! Octocrab implementation of the repository host.
//!
//! Wraps the four content-API operations the workflow needs: repository
//! metadata for the default branch, the recursive tree, reads and
//! marker-guarded writes of single files.

use anyhow::{Context as _, Result};
use async_trait::async_trait;
use octocrab::Octocrab;
use serde::Deserialize;

use crate::config::Config;

use super::{FileRecord, RepoRef, RepositoryHost, TreeEntry};

const FALLBACK_BRANCH: &str = "main";

pub struct GithubSession {
    octocrab: Octocrab,
}

impl GithubSession {
    pub fn from_config(config: &Config) -> Result<Self> {
        let octocrab = Octocrab::builder()
            .personal_token(config.github_token()?.expose_secret())
            .build()
            .context("Failed to build github client")?;

        Ok(Self { octocrab })
    }
}

#[derive(Debug, Deserialize)]
struct GitTree {
    tree: Vec<TreeEntry>,
    #[serde(default)]
    truncated: bool,
}

#[async_trait]
impl RepositoryHost for GithubSession {
    #[tracing::instrument(skip(self), err)]
    async fn resolve_default_branch(&self, repo: &RepoRef) -> Result<String> {
        let repository = self
            .octocrab
            .repos(&repo.owner, &repo.name)
            .get()
            .await
            .with_context(|| format!("Failed to get repository info for {repo}"))?;

        Ok(repository
            .default_branch
            .unwrap_or_else(|| FALLBACK_BRANCH.to_string()))
    }

    #[tracing::instrument(skip(self), err)]
    async fn list_tree(&self, repo: &RepoRef, branch: &str) -> Result<Vec<TreeEntry>> {
        let route = format!(
            "/repos/{owner}/{name}/git/trees/{branch}?recursive=1",
            owner = repo.owner,
            name = repo.name,
        );

        let tree: GitTree = self
            .octocrab
            .get(route, None::<&()>)
            .await
            .with_context(|| format!("Failed to get repository tree for {repo}"))?;

        if tree.truncated {
            tracing::warn!(%repo, branch, "Repository tree was truncated by the API");
        }

        Ok(tree.tree)
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_file(
        &self,
        repo: &RepoRef,
        path: &str,
        branch: &str,
    ) -> Result<Option<FileRecord>> {
        let contents = match self
            .octocrab
            .repos(&repo.owner, &repo.name)
            .get_content()
            .path(path)
            .r#ref(branch)
            .send()
            .await
        {
            Ok(contents) => contents,
            Err(error) => {
                tracing::warn!(%repo, path, %error, "Failed to fetch file; skipping");
                return Ok(None);
            }
        };

        let Some(content) = contents.items.into_iter().next() else {
            tracing::warn!(%repo, path, "Contents response was empty; skipping");
            return Ok(None);
        };

        let revision_marker = content.sha.clone();
        let Some(decoded) = content.decoded_content() else {
            tracing::warn!(%repo, path, "File is not decodable utf-8 text; skipping");
            return Ok(None);
        };

        Ok(Some(FileRecord {
            path: path.to_string(),
            original_content: decoded,
            revision_marker,
        }))
    }

    #[tracing::instrument(skip(self, new_content), err)]
    async fn write_file(
        &self,
        repo: &RepoRef,
        path: &str,
        new_content: &str,
        commit_message: &str,
        revision_marker: &str,
        branch: &str,
    ) -> Result<()> {
        self.octocrab
            .repos(&repo.owner, &repo.name)
            .update_file(path, commit_message, new_content, revision_marker)
            .branch(branch)
            .send()
            .await
            .map_err(|error| anyhow::anyhow!(describe_write_error(&error)))
            .with_context(|| format!("Failed to update {path} in {repo}"))?;

        Ok(())
    }
}

/// A 409 means the revision marker went stale between fetch and commit;
/// everything else is passed through as the API reported it.
fn describe_write_error(error: &octocrab::Error) -> String {
    if let octocrab::Error::GitHub { source, .. } = error {
        if source.status_code.as_u16() == 409 {
            return format!(
                "conflict: the file changed upstream since it was fetched ({})",
                source.message
            );
        }
        return format!("{} ({})", source.message, source.status_code);
    }

    format!("{error}")
}
