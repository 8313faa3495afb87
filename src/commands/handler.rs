use std::sync::Arc;

use anyhow::Result;
use tokio::{sync::mpsc, task};

use crate::{
    agent::FixAgent,
    config::Config,
    fixer::fix_files,
    frontend::App,
    git::{github::GithubSession, parse_repo_url, RepositoryHost},
    lang,
    session::{CommitSummary, ReviewSession},
};

use super::{
    command::{Command, CommandEvent},
    responder::{CommandResponse, Responder},
};

/// Commands always flow via the `CommandHandler`
///
/// It is the principal entry point for the backend. Actions are handled
/// strictly one at a time: a command runs to completion before the next is
/// taken off the channel, so there is never more than one outstanding
/// model or HTTP call.
pub struct CommandHandler {
    /// Receives commands
    rx: Option<mpsc::UnboundedReceiver<CommandEvent>>,
    /// Sends commands
    tx: mpsc::UnboundedSender<CommandEvent>,

    config: Arc<Config>,

    /// Candidate edits awaiting confirmation; written by a process pass,
    /// consumed by the commit pass
    review: Option<ReviewSession>,
}

impl CommandHandler {
    #[must_use]
    pub fn from_config(config: impl Into<Config>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        CommandHandler {
            rx: Some(rx),
            tx,
            config: Arc::new(config.into()),
            review: None,
        }
    }

    pub fn register_ui(&mut self, app: &mut App) {
        app.command_tx = Some(self.tx.clone());
    }

    /// Starts the command handler
    ///
    /// # Panics
    ///
    /// - Missing receiver for commands
    #[must_use]
    pub fn start(mut self) -> task::JoinHandle<()> {
        let mut rx = self.rx.take().expect("Expected a receiver");

        task::spawn(async move {
            while let Some(event) = rx.recv().await {
                if event.command().is_quit() {
                    tracing::warn!("Backend received quit command, shutting down");
                    break;
                }

                let result = self.handle_command_event(&event).await;

                if let Err(error) = result {
                    tracing::error!(?error, cmd = %event.command(), "Failed to handle command");
                    event
                        .responder()
                        .error(&format!("Failed to handle command: {error:#}"));
                }

                event
                    .responder()
                    .send(CommandResponse::Completed(event.uuid()));
            }

            tracing::warn!("CommandHandler shutting down");
        })
    }

    #[tracing::instrument(skip_all, fields(cmd = %event.command(), uuid = %event.uuid()), err)]
    async fn handle_command_event(&mut self, event: &CommandEvent) -> Result<()> {
        let now = std::time::Instant::now();
        let responder = event.clone_responder();

        match event.command() {
            Command::ShowConfig => {
                responder.system_message(&toml::to_string_pretty(self.config.as_ref())?);
            }
            Command::ProcessRepository {
                repo_url,
                issue_description,
            } => {
                let github = GithubSession::from_config(&self.config)?;
                let mut agent = FixAgent::from_config(&self.config)?;

                self.review = process_repository(
                    &github,
                    &mut agent,
                    &self.config,
                    repo_url,
                    issue_description,
                    &responder,
                )
                .await?;
            }
            Command::CommitChanges { message } => {
                anyhow::ensure!(!message.trim().is_empty(), "Please provide a commit message");

                if self.review.is_none() {
                    responder.system_message("No changes to commit. Process a repository first.");
                    return Ok(());
                }

                // Anything that can fail before the first write happens
                // before the session is consumed, so a setup error leaves
                // the reviewed edits intact for another attempt
                let github = GithubSession::from_config(&self.config)?;

                if let Some(session) = self.review.take() {
                    commit_changes(&github, session, message, &responder).await?;
                }
            }
            Command::Quit => unreachable!("Quit should be handled earlier"),
        }

        tracing::debug!(elapsed_secs = now.elapsed().as_secs_f64(), "Command handled");

        Ok(())
    }
}

/// Fetches the eligible files of a repository and runs the fix pass
///
/// Returns a [`ReviewSession`] when at least one candidate edit was
/// produced; `None` leaves the workflow idle.
#[tracing::instrument(skip_all, err)]
pub async fn process_repository(
    host: &dyn RepositoryHost,
    agent: &mut FixAgent,
    config: &Config,
    repo_url: &str,
    issue_description: &str,
    responder: &dyn Responder,
) -> Result<Option<ReviewSession>> {
    anyhow::ensure!(
        !repo_url.trim().is_empty() && !issue_description.trim().is_empty(),
        "Please provide both the repository URL and issue description"
    );

    let repo = parse_repo_url(repo_url)?;
    let branch = host.resolve_default_branch(&repo).await?;
    responder.system_message(&format!("Default branch: {branch}"));

    let tree = host.list_tree(&repo, &branch).await?;

    let mut files = Vec::new();
    for entry in tree {
        if !entry.is_file() || !lang::is_fixable(&entry.path, config.allowed_extensions()) {
            continue;
        }

        responder.update(&format!("Fetching {}", entry.path));
        if let Some(record) = host.fetch_file(&repo, &entry.path, &branch).await? {
            files.push(record);
        }
    }

    if files.is_empty() {
        responder.system_message("No files retrieved.");
        return Ok(None);
    }

    let edits = fix_files(agent, &files, issue_description, responder).await;

    if edits.is_empty() {
        responder.system_message("Agent did not modify any files.");
        return Ok(None);
    }

    for edit in &edits {
        responder.diff(&edit.render_diff());
    }
    responder.system_message(&format!(
        "Processing complete. Review the {} proposed change(s) above.",
        edits.len()
    ));

    Ok(Some(ReviewSession::new(repo, branch, &files, edits)))
}

/// Writes every reviewed edit back, guarded by its fetch-time marker
///
/// Each write is independent; failures are collected, not retried, and the
/// aggregated summary is reported before the (consumed) session is gone.
#[tracing::instrument(skip_all, err)]
pub async fn commit_changes(
    host: &dyn RepositoryHost,
    session: ReviewSession,
    commit_message: &str,
    responder: &dyn Responder,
) -> Result<CommitSummary> {
    anyhow::ensure!(
        !commit_message.trim().is_empty(),
        "Please provide a commit message"
    );

    let mut summary = CommitSummary::default();

    for edit in session.edits() {
        let Some(marker) = session.revision_marker(&edit.path) else {
            summary.failed.push((
                edit.path.clone(),
                "no revision marker captured at fetch time".to_string(),
            ));
            continue;
        };

        responder.update(&format!("Committing {}", edit.path));

        match host
            .write_file(
                session.repo(),
                &edit.path,
                &edit.updated_content,
                commit_message,
                marker,
                session.branch(),
            )
            .await
        {
            Ok(()) => summary.succeeded.push(edit.path.clone()),
            Err(error) => summary.failed.push((edit.path.clone(), format!("{error:#}"))),
        }
    }

    responder.system_message(&summary.render());

    Ok(summary)
}
