use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use serde::{Deserialize, Serialize};

use super::defaults::*;
use super::{ApiKey, LLMConfiguration};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub llm: LLMConfiguration,

    /// Optional in the file; `Config::load` falls back to `$GITHUB_TOKEN`
    /// and fails loudly when neither is present
    #[serde(default, serialize_with = "serde_hidden_secret")]
    github_token: Option<ApiKey>,

    #[serde(default = "default_log_dir")]
    log_dir: PathBuf,

    /// Extensions (with leading dot) eligible for a fix pass
    #[serde(default = "default_allowed_extensions")]
    allowed_extensions: Vec<String>,

    /// Keep the agent's conversation across files within one fix pass
    ///
    /// Off by default so every file gets an independent, minimal fix.
    #[serde(default)]
    pub retain_agent_history: bool,

    #[serde(default)]
    pub backoff: BackoffConfiguration,
}

/// Backoff applied inside the OpenAI-style clients; the workflow itself
/// never retries a failed action.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct BackoffConfiguration {
    pub initial_interval_sec: u64,
    pub multiplier: f64,
    pub randomization_factor: f64,
    pub max_elapsed_time_sec: u64,
}

impl Default for BackoffConfiguration {
    fn default() -> Self {
        Self {
            initial_interval_sec: 1,
            multiplier: 2.0,
            randomization_factor: 0.5,
            max_elapsed_time_sec: 60,
        }
    }
}

impl Config {
    /// Loads the configuration file
    pub async fn load(path: impl AsRef<Path>) -> Result<Config> {
        let path = path.as_ref();
        let file = tokio::fs::read(path)
            .await
            .with_context(|| format!("Could not find `{}`", path.display()))?;

        let mut config: Config =
            toml::from_str(std::str::from_utf8(&file)?).context("Failed to parse configuration")?;

        if config.github_token.is_none() {
            if let Ok(token) = std::env::var("GITHUB_TOKEN") {
                config.github_token = Some(token.into());
            }
        }
        anyhow::ensure!(
            config.github_token.is_some(),
            "No GitHub token: set `github_token` in `{}` or export GITHUB_TOKEN",
            path.display()
        );

        Ok(config)
    }

    /// The GitHub token; present after a successful [`Config::load`]
    pub fn github_token(&self) -> Result<&ApiKey> {
        self.github_token
            .as_ref()
            .context("No GitHub token configured")
    }

    pub fn log_dir(&self) -> &Path {
        self.log_dir.as_path()
    }

    pub fn allowed_extensions(&self) -> &[String] {
        &self.allowed_extensions
    }
}

/// Serialize a secret as "****"
pub(super) fn serde_hidden_secret<S>(
    _secret: &Option<ApiKey>,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str("****")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OpenAIPromptModel;

    #[test]
    fn test_minimal_config() {
        let toml = r#"
            github_token = "text:gh-token"

            [llm]
            provider = "OpenAI"
            api_key = "text:test-key"
            prompt_model = "gpt-4o"
            "#;

        let config: Config = toml::from_str(toml).unwrap();

        assert_eq!(config.github_token().unwrap().expose_secret(), "gh-token");
        assert!(!config.retain_agent_history);
        assert!(config
            .allowed_extensions()
            .contains(&".py".to_string()));

        let LLMConfiguration::OpenAI { prompt_model, .. } = &config.llm else {
            panic!("Expected OpenAI configuration");
        };
        assert_eq!(prompt_model, &OpenAIPromptModel::GPT4O);
    }

    #[test]
    fn test_extension_allow_list_overridable() {
        let toml = r#"
            github_token = "text:gh-token"
            allowed_extensions = [".rs"]

            [llm]
            provider = "OpenAI"
            api_key = "text:test-key"
            "#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.allowed_extensions(), &[".rs".to_string()]);
    }

    #[test]
    fn test_serialized_config_hides_token() {
        let toml = r#"
            github_token = "text:gh-token"

            [llm]
            provider = "OpenAI"
            api_key = "text:test-key"
            "#;

        let config: Config = toml::from_str(toml).unwrap();
        let serialized = toml::to_string_pretty(&config).unwrap();

        assert!(!serialized.contains("gh-token"));
        assert!(!serialized.contains("test-key"));
    }

    // Exercises the token fallback chain in one test; GITHUB_TOKEN is
    // process-wide state and no other test touches it
    #[tokio::test]
    async fn test_load_requires_a_github_token() {
        use std::io::Write as _;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
            [llm]
            provider = "OpenAI"
            api_key = "text:test-key"
            "#
        )
        .unwrap();

        std::env::remove_var("GITHUB_TOKEN");
        let error = Config::load(file.path()).await.unwrap_err();
        assert!(error.to_string().contains("No GitHub token"));

        std::env::set_var("GITHUB_TOKEN", "from-env");
        let config = Config::load(file.path()).await.unwrap();
        assert_eq!(config.github_token().unwrap().expose_secret(), "from-env");
        std::env::remove_var("GITHUB_TOKEN");
    }
}
