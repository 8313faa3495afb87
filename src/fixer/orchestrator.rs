//! Runs the agent over a batch of files, one file at a time.

use crate::agent::FixAgent;
use crate::commands::Responder;
use crate::git::FileRecord;

use super::{build_prompt, strip_code_fences, CandidateEdit, UNCHANGED_SENTINEL};

/// Asks the agent for a minimal fix of every file and collects the edits
///
/// Files are processed strictly in input order. A file is dropped from the
/// result when the cleaned response is the no-change sentinel or matches
/// the original verbatim. A failed agent invocation is reported for that
/// file and the batch continues.
#[tracing::instrument(skip_all, fields(num_files = files.len()))]
pub async fn fix_files(
    agent: &mut FixAgent,
    files: &[FileRecord],
    issue_description: &str,
    responder: &dyn Responder,
) -> Vec<CandidateEdit> {
    let mut edits = Vec::new();

    for record in files {
        responder.update(&format!("Asking the agent about {}", record.path));

        let prompt = build_prompt(&record.path, issue_description, &record.original_content);

        let response = match agent.ask(&prompt).await {
            Ok(response) => response,
            Err(error) => {
                tracing::error!(path = record.path, ?error, "Agent invocation failed");
                responder.error(&format!("Error processing {}: {error:#}", record.path));
                continue;
            }
        };

        let cleaned = strip_code_fences(&response);

        // Cleaning trims surrounding whitespace, so compare against the
        // trimmed original as well
        if cleaned == UNCHANGED_SENTINEL || cleaned == record.original_content.trim() {
            tracing::debug!(path = record.path, "Agent proposed no change");
            continue;
        }

        edits.push(CandidateEdit {
            path: record.path.clone(),
            original_content: record.original_content.clone(),
            updated_content: cleaned,
        });
    }

    edits
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::agent::MockCompletionBackend;
    use crate::commands::MockResponder;

    fn record(path: &str, content: &str) -> FileRecord {
        FileRecord {
            path: path.to_string(),
            original_content: content.to_string(),
            revision_marker: format!("sha-{path}"),
        }
    }

    fn quiet_responder() -> MockResponder {
        let mut responder = MockResponder::new();
        responder.expect_update().returning(|_| ());
        responder.expect_system_message().returning(|_| ());
        responder.expect_error().returning(|_| ());
        responder
    }

    #[test_log::test(tokio::test)]
    async fn test_sentinel_and_verbatim_responses_are_dropped() {
        let mut backend = MockCompletionBackend::new();
        let mut responses = vec![
            "UNCHANGED".to_string(),
            "fn main() {}\n".to_string(),
            "```python\nprint('fixed')\n```".to_string(),
        ]
        .into_iter();
        backend
            .expect_complete()
            .times(3)
            .returning(move |_| Ok(responses.next().unwrap()));

        let mut agent = FixAgent::new(Box::new(backend), false);
        let files = vec![
            record("a.js", "console.log(1)\n"),
            record("b.js", "fn main() {}\n"),
            record("c.py", "print('broken')"),
        ];

        let edits = fix_files(&mut agent, &files, "an issue", &quiet_responder()).await;

        assert_eq!(edits.len(), 1);
        assert_eq!(edits[0].path, "c.py");
        assert_eq!(edits[0].updated_content, "print('fixed')");
    }

    #[test_log::test(tokio::test)]
    async fn test_agent_failure_skips_file_and_continues() {
        let mut backend = MockCompletionBackend::new();
        let mut outcomes = vec![
            Err(anyhow::anyhow!("rate limited")),
            Ok("fixed content".to_string()),
        ]
        .into_iter();
        backend
            .expect_complete()
            .times(2)
            .returning(move |_| outcomes.next().unwrap());

        let mut responder = MockResponder::new();
        responder.expect_update().returning(|_| ());
        responder
            .expect_error()
            .withf(|msg| msg.contains("Error processing broken.py") && msg.contains("rate limited"))
            .once()
            .returning(|_| ());

        let mut agent = FixAgent::new(Box::new(backend), false);
        let files = vec![record("broken.py", "a"), record("ok.py", "b")];

        let edits = fix_files(&mut agent, &files, "an issue", &responder).await;

        assert_eq!(edits.len(), 1);
        assert_eq!(edits[0].path, "ok.py");
    }

    #[test_log::test(tokio::test)]
    async fn test_edits_preserve_input_order_and_invariants() {
        let mut backend = MockCompletionBackend::new();
        backend
            .expect_complete()
            .returning(|messages| {
                // The prompt embeds the original content on its last line
                let swiftide::chat_completion::ChatMessage::User(prompt) =
                    messages.last().unwrap()
                else {
                    panic!("expected a user message");
                };
                if prompt.contains("keep me") {
                    Ok("UNCHANGED".to_string())
                } else {
                    Ok("updated".to_string())
                }
            });

        let mut agent = FixAgent::new(Box::new(backend), false);
        let files = vec![
            record("one.md", "fix me"),
            record("two.md", "keep me"),
            record("three.md", "fix me too"),
        ];

        let edits = fix_files(&mut agent, &files, "an issue", &quiet_responder()).await;

        let paths = edits.iter().map(|edit| edit.path.as_str()).collect::<Vec<_>>();
        assert_eq!(paths, ["one.md", "three.md"]);

        for edit in &edits {
            assert_ne!(edit.updated_content, edit.original_content);
            assert_ne!(edit.updated_content, UNCHANGED_SENTINEL);
        }
    }
}
