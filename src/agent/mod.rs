//! The generative agent that proposes fixes.
//!
//! [`FixAgent`] owns the conversation with the model. By default the
//! conversation is reset before every prompt so each file gets an
//! independent minimal fix; `retain_agent_history` in the configuration
//! keeps the exchange going across files instead.

use anyhow::{Context as _, Result};
use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use swiftide::chat_completion::{ChatCompletion, ChatCompletionRequest, ChatMessage};

use crate::config::Config;

/// The seam between the agent and the model provider
#[cfg_attr(test, automock)]
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Completes the conversation and returns the assistant's text
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String>;
}

#[async_trait]
impl CompletionBackend for Box<dyn ChatCompletion> {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
        let request: ChatCompletionRequest = messages.to_vec().into();
        let response = ChatCompletion::complete(self.as_ref(), &request)
            .await
            .context("Completion request failed")?;

        response
            .message()
            .map(ToString::to_string)
            .context("Model returned an empty response")
    }
}

pub struct FixAgent {
    backend: Box<dyn CompletionBackend>,
    history: Vec<ChatMessage>,
    retain_history: bool,
}

impl FixAgent {
    #[must_use]
    pub fn new(backend: Box<dyn CompletionBackend>, retain_history: bool) -> Self {
        Self {
            backend,
            history: Vec::new(),
            retain_history,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let llm = config.llm.get_chat_completion_model(config.backoff)?;

        Ok(Self::new(Box::new(llm), config.retain_agent_history))
    }

    /// Sends one prompt and returns the raw response text
    #[tracing::instrument(skip_all, err)]
    pub async fn ask(&mut self, prompt: &str) -> Result<String> {
        if !self.retain_history {
            self.history.clear();
        }

        self.history.push(ChatMessage::new_user(prompt));
        let answer = self.backend.complete(&self.history).await?;
        self.history
            .push(ChatMessage::new_assistant(Some(answer.clone()), None));

        Ok(answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_ask_resets_history_by_default() {
        let mut backend = MockCompletionBackend::new();
        backend
            .expect_complete()
            .times(2)
            .withf(|messages| messages.len() == 1)
            .returning(|_| Ok("answer".to_string()));

        let mut agent = FixAgent::new(Box::new(backend), false);
        agent.ask("first").await.unwrap();
        agent.ask("second").await.unwrap();
    }

    #[tokio::test]
    async fn test_ask_can_retain_history() {
        let mut backend = MockCompletionBackend::new();
        backend
            .expect_complete()
            .withf(|messages| messages.len() == 1)
            .returning(|_| Ok("answer".to_string()));
        backend
            .expect_complete()
            .withf(|messages| messages.len() == 3)
            .returning(|_| Ok("answer".to_string()));

        let mut agent = FixAgent::new(Box::new(backend), true);
        agent.ask("first").await.unwrap();
        agent.ask("second").await.unwrap();
    }

    #[tokio::test]
    async fn test_ask_propagates_backend_errors() {
        let mut backend = MockCompletionBackend::new();
        backend
            .expect_complete()
            .returning(|_| Err(anyhow::anyhow!("model unavailable")));

        let mut agent = FixAgent::new(Box::new(backend), false);
        let error = agent.ask("prompt").await.unwrap_err();
        assert!(error.to_string().contains("model unavailable"));
    }
}
