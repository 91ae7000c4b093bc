//! OpenAI-compatible chat-completions provider
//!
//! One implementation covers every endpoint speaking the OpenAI chat API,
//! including Ollama's compatibility endpoint. The differences between
//! profiles (Ollama does not accept the structured `response_format`
//! parameter) live entirely inside this module; engines never see them.

use crate::error::ProviderError;
use crate::CompletionProvider;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

const OPENAI_API_BASE: &str = "https://api.openai.com/v1";

/// Configuration for an OpenAI-compatible provider
#[derive(Debug, Clone)]
pub struct OpenAiCompatibleConfig {
    /// Display name used in logs and errors
    pub provider_name: String,
    /// Bearer API key (Ollama accepts any placeholder)
    pub api_key: String,
    /// Model name
    pub model: String,
    /// API base URL; defaults to the OpenAI endpoint
    pub base_url: Option<String>,
    /// Whether the endpoint honors `response_format: json_object`
    pub json_response_mode: bool,
    /// Sampling temperature
    pub temperature: f32,
}

impl OpenAiCompatibleConfig {
    /// Config for the OpenAI API
    #[must_use]
    pub fn openai(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            provider_name: "openai".to_string(),
            api_key: api_key.into(),
            model: model.into(),
            base_url: None,
            json_response_mode: true,
            temperature: 0.3,
        }
    }

    /// Config for an Ollama server's OpenAI-compatible endpoint
    ///
    /// Ollama ignores the API key and rejects the structured-response
    /// parameter, so json_response_mode is off and the prompt contract alone
    /// constrains the output.
    #[must_use]
    pub fn ollama(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        let base = base_url.into();
        Self {
            provider_name: "ollama".to_string(),
            api_key: "ollama".to_string(),
            model: model.into(),
            base_url: Some(format!("{}/v1", base.trim_end_matches('/'))),
            json_response_mode: false,
            temperature: 0.3,
        }
    }

    /// Override the base URL
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Override the sampling temperature
    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: AssistantMessage,
}

#[derive(Debug, Deserialize)]
struct AssistantMessage {
    content: Option<String>,
}

/// Provider speaking the OpenAI chat-completions protocol
pub struct OpenAiCompatibleProvider {
    client: Client,
    config: OpenAiCompatibleConfig,
}

impl OpenAiCompatibleProvider {
    /// Create a provider from a config
    pub fn new(config: OpenAiCompatibleConfig) -> Result<Self, ProviderError> {
        if config.api_key.is_empty() {
            return Err(ProviderError::InvalidConfig(format!(
                "{}: api key is empty",
                config.provider_name
            )));
        }
        let client = Client::builder().build()?;
        Ok(Self { client, config })
    }

    fn api_url(&self) -> String {
        let base = self.config.base_url.as_deref().unwrap_or(OPENAI_API_BASE);
        format!("{}/chat/completions", base.trim_end_matches('/'))
    }
}

#[async_trait]
impl CompletionProvider for OpenAiCompatibleProvider {
    fn name(&self) -> &str {
        &self.config.provider_name
    }

    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        expect_json: bool,
    ) -> Result<String, ProviderError> {
        let response_format = (expect_json && self.config.json_response_mode)
            .then_some(ResponseFormat { kind: "json_object" });

        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: user_prompt,
                },
            ],
            temperature: self.config.temperature,
            response_format,
        };

        tracing::debug!(
            provider = %self.config.provider_name,
            model = %self.config.model,
            expect_json,
            "sending completion request"
        );

        let response = self
            .client
            .post(self.api_url())
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: ChatResponse = response.json().await?;
        body.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or(ProviderError::MissingContent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ollama_profile_disables_json_mode() {
        let config = OpenAiCompatibleConfig::ollama("http://localhost:11434/", "llama3:8b");
        assert!(!config.json_response_mode);
        assert_eq!(
            config.base_url.as_deref(),
            Some("http://localhost:11434/v1")
        );
    }

    #[test]
    fn openai_profile_defaults() {
        let config = OpenAiCompatibleConfig::openai("sk-test", "gpt-4-turbo");
        assert!(config.json_response_mode);
        assert!(config.base_url.is_none());

        let provider = OpenAiCompatibleProvider::new(config).unwrap();
        assert_eq!(provider.name(), "openai");
        assert_eq!(
            provider.api_url(),
            "https://api.openai.com/v1/chat/completions"
        );
    }

    #[test]
    fn empty_api_key_is_invalid_config() {
        let config = OpenAiCompatibleConfig::openai("", "gpt-4-turbo");
        assert!(matches!(
            OpenAiCompatibleProvider::new(config),
            Err(ProviderError::InvalidConfig(_))
        ));
    }

    #[test]
    fn response_format_serialized_only_when_set() {
        let request = ChatRequest {
            model: "m",
            messages: vec![],
            temperature: 0.3,
            response_format: None,
        };
        let json = serde_json::to_string(&request).unwrap();
        assert!(!json.contains("response_format"));

        let request = ChatRequest {
            response_format: Some(ResponseFormat {
                kind: "json_object",
            }),
            ..request
        };
        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains(r#""response_format":{"type":"json_object"}"#));
    }
}
