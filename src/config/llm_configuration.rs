use std::time::Duration;

use super::ApiKey;
use crate::config::BackoffConfiguration;
use anyhow::{Context as _, Result};
use backoff::ExponentialBackoffBuilder;
use serde::{Deserialize, Serialize};
use swiftide::{
    chat_completion::ChatCompletion,
    integrations::{
        self,
        anthropic::Anthropic,
        ollama::{config::OllamaConfig, Ollama},
        open_router::{config::OpenRouterConfig, OpenRouter},
    },
};
use url::Url;

/// Which model answers the fix prompts
///
/// The provider is tagged in the configuration file:
///
/// ```toml
/// [llm]
/// provider = "OpenAI"
/// api_key = "env:OPENAI_API_KEY"
/// prompt_model = "gpt-4o-mini"
/// ```
#[derive(
    Debug,
    Clone,
    Deserialize,
    Serialize,
    strum_macros::EnumString,
    strum_macros::VariantNames,
    strum_macros::Display,
)]
#[serde(tag = "provider")]
#[strum(ascii_case_insensitive)]
pub enum LLMConfiguration {
    OpenAI {
        api_key: Option<ApiKey>,
        #[serde(default)]
        prompt_model: OpenAIPromptModel,
        #[serde(default)]
        base_url: Option<Url>,
    },
    Ollama {
        #[serde(default)]
        prompt_model: Option<String>,
        #[serde(default)]
        base_url: Option<Url>,
    },
    OpenRouter {
        #[serde(default)]
        api_key: Option<ApiKey>,
        #[serde(default)]
        prompt_model: String,
    },
    Anthropic {
        api_key: Option<ApiKey>,
        #[serde(default)]
        prompt_model: AnthropicModel,
    },
}

#[derive(
    Debug,
    Clone,
    Deserialize,
    Serialize,
    PartialEq,
    strum_macros::EnumString,
    strum_macros::Display,
    strum_macros::VariantNames,
    Default,
)]
pub enum AnthropicModel {
    #[strum(serialize = "claude-3-5-sonnet-latest")]
    #[serde(rename = "claude-3-5-sonnet-latest")]
    #[default]
    Claude35Sonnet,
    #[strum(serialize = "claude-3-5-haiku-latest")]
    #[serde(rename = "claude-3-5-haiku-latest")]
    Claude35Haiku,
}

#[derive(
    Debug,
    Clone,
    Deserialize,
    Serialize,
    PartialEq,
    strum_macros::EnumString,
    strum_macros::Display,
    strum_macros::VariantNames,
    Default,
)]
pub enum OpenAIPromptModel {
    #[strum(serialize = "gpt-4o-mini")]
    #[serde(rename = "gpt-4o-mini")]
    #[default]
    GPT4OMini,
    #[strum(serialize = "gpt-4o")]
    #[serde(rename = "gpt-4o")]
    GPT4O,
}

impl LLMConfiguration {
    fn build_openai(
        &self,
        backoff_config: BackoffConfiguration,
    ) -> Result<integrations::openai::OpenAI> {
        let LLMConfiguration::OpenAI {
            api_key,
            prompt_model,
            base_url,
        } = self
        else {
            anyhow::bail!("Expected OpenAI configuration")
        };

        let api_key = api_key.as_ref().context("Expected an api key")?;

        let mut config =
            async_openai::config::OpenAIConfig::default().with_api_key(api_key.expose_secret());

        if let Some(base_url) = base_url {
            config = config.with_api_base(base_url.to_string());
        };

        let backoff = ExponentialBackoffBuilder::default()
            .with_initial_interval(Duration::from_secs(backoff_config.initial_interval_sec))
            .with_multiplier(backoff_config.multiplier)
            .with_randomization_factor(backoff_config.randomization_factor)
            .with_max_elapsed_time(Some(Duration::from_secs(
                backoff_config.max_elapsed_time_sec,
            )))
            .build();

        let client = async_openai::Client::with_config(config).with_backoff(backoff);

        integrations::openai::OpenAI::builder()
            .client(client)
            .default_prompt_model(prompt_model.to_string())
            .build()
            .context("Failed to build OpenAI client")
    }

    fn build_ollama(&self) -> Result<Ollama> {
        let LLMConfiguration::Ollama {
            prompt_model,
            base_url,
        } = self
        else {
            anyhow::bail!("Expected Ollama configuration")
        };

        let mut config = OllamaConfig::default();

        if let Some(base_url) = base_url {
            config.with_api_base(base_url.as_str());
        };

        let mut builder = Ollama::builder()
            .client(async_openai::Client::with_config(config))
            .to_owned();

        if let Some(prompt_model) = prompt_model {
            builder.default_prompt_model(prompt_model);
        }

        builder.build().context("Failed to build Ollama client")
    }

    fn build_anthropic(&self) -> Result<Anthropic> {
        let LLMConfiguration::Anthropic {
            api_key,
            prompt_model,
        } = self
        else {
            anyhow::bail!("Expected Anthropic configuration")
        };

        let api_key = api_key.as_ref().context("Expected an api key")?;
        let client = async_anthropic::Client::from_api_key(api_key.expose_secret());

        Anthropic::builder()
            .client(client)
            .default_prompt_model(prompt_model.to_string())
            .build()
            .context("Failed to build Anthropic client")
    }

    fn build_open_router(&self, backoff_config: BackoffConfiguration) -> Result<OpenRouter> {
        let LLMConfiguration::OpenRouter {
            prompt_model,
            api_key,
        } = self
        else {
            anyhow::bail!("Expected OpenRouter configuration")
        };

        let api_key = api_key.as_ref().context("Expected an api key")?;
        let config = OpenRouterConfig::builder()
            .api_key(api_key.expose_secret())
            .build()?;

        let backoff = ExponentialBackoffBuilder::default()
            .with_initial_interval(Duration::from_secs(backoff_config.initial_interval_sec))
            .with_multiplier(backoff_config.multiplier)
            .with_randomization_factor(backoff_config.randomization_factor)
            .with_max_elapsed_time(Some(Duration::from_secs(
                backoff_config.max_elapsed_time_sec,
            )))
            .build();

        let client = async_openai::Client::with_config(config).with_backoff(backoff);

        OpenRouter::builder()
            .client(client)
            .default_prompt_model(prompt_model)
            .to_owned()
            .build()
            .context("Failed to build OpenRouter client")
    }

    pub fn get_chat_completion_model(
        &self,
        backoff_config: BackoffConfiguration,
    ) -> Result<Box<dyn ChatCompletion>> {
        let boxed = match self {
            LLMConfiguration::OpenAI { .. } => {
                Box::new(self.build_openai(backoff_config)?) as Box<dyn ChatCompletion>
            }
            LLMConfiguration::Ollama { .. } => {
                Box::new(self.build_ollama()?) as Box<dyn ChatCompletion>
            }
            LLMConfiguration::OpenRouter { .. } => {
                Box::new(self.build_open_router(backoff_config)?) as Box<dyn ChatCompletion>
            }
            LLMConfiguration::Anthropic { .. } => {
                Box::new(self.build_anthropic()?) as Box<dyn ChatCompletion>
            }
        };
        Ok(boxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_openai() {
        let toml = r#"
            provider = "OpenAI"
            api_key = "text:test-key"
            prompt_model = "gpt-4o-mini"
            "#;

        let config: LLMConfiguration = toml::from_str(toml).unwrap();
        let LLMConfiguration::OpenAI {
            api_key,
            prompt_model,
            ..
        } = &config
        else {
            panic!("Expected OpenAI configuration")
        };

        assert_eq!(api_key.as_ref().unwrap().expose_secret(), "test-key");
        assert_eq!(prompt_model, &OpenAIPromptModel::GPT4OMini);
    }

    #[test]
    fn test_deserialize_anthropic_default_model() {
        let toml = r#"
            provider = "Anthropic"
            api_key = "text:test-key"
            "#;

        let config: LLMConfiguration = toml::from_str(toml).unwrap();
        let LLMConfiguration::Anthropic { prompt_model, .. } = &config else {
            panic!("Expected Anthropic configuration")
        };

        assert_eq!(prompt_model, &AnthropicModel::Claude35Sonnet);
    }

    #[test]
    fn test_deserialize_ollama_without_key() {
        let toml = r#"
            provider = "Ollama"
            prompt_model = "llama3"
            "#;

        let config: LLMConfiguration = toml::from_str(toml).unwrap();
        let LLMConfiguration::Ollama { prompt_model, .. } = &config else {
            panic!("Expected Ollama configuration")
        };

        assert_eq!(prompt_model.as_deref(), Some("llama3"));
    }
}
