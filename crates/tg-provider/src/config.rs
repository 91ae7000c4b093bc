//! Environment-driven provider configuration
//!
//! Reads provider selection and credentials from the environment once and
//! hands the result to callers as a plain value. Engine code never reads
//! configuration implicitly; it receives a built provider (or none) at
//! construction.
//!
//! Variables:
//! - `TICKETGEN_PROVIDER`: `openai` | `anthropic` | `ollama`; unset means no
//!   model, deterministic fallback only
//! - `OPENAI_API_KEY`, `OPENAI_MODEL` (default `gpt-4-turbo`)
//! - `ANTHROPIC_API_KEY`, `ANTHROPIC_MODEL` (default `claude-3-5-sonnet-latest`)
//! - `OLLAMA_BASE_URL` (default `http://localhost:11434`), `OLLAMA_MODEL`
//!   (default `llama3:8b`)

use crate::anthropic::{AnthropicConfig, AnthropicProvider};
use crate::error::ProviderError;
use crate::openai::{OpenAiCompatibleConfig, OpenAiCompatibleProvider};
use crate::CompletionProvider;
use std::env;
use std::sync::Arc;

const DEFAULT_OPENAI_MODEL: &str = "gpt-4-turbo";
const DEFAULT_ANTHROPIC_MODEL: &str = "claude-3-5-sonnet-latest";
const DEFAULT_OLLAMA_BASE_URL: &str = "http://localhost:11434";
const DEFAULT_OLLAMA_MODEL: &str = "llama3:8b";

/// Provider settings as read from the environment
#[derive(Debug, Clone, Default)]
pub struct ProviderConfig {
    /// Raw `TICKETGEN_PROVIDER` value; `None` means run without a model
    pub provider: Option<String>,
    /// OpenAI API key
    pub openai_api_key: String,
    /// OpenAI model name
    pub openai_model: String,
    /// Anthropic API key
    pub anthropic_api_key: String,
    /// Anthropic model name
    pub anthropic_model: String,
    /// Ollama server base URL
    pub ollama_base_url: String,
    /// Ollama model name
    pub ollama_model: String,
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

impl ProviderConfig {
    /// Read the configuration from the process environment
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            provider: env::var("TICKETGEN_PROVIDER")
                .ok()
                .map(|v| v.to_lowercase())
                .filter(|v| !v.is_empty()),
            openai_api_key: env_or("OPENAI_API_KEY", ""),
            openai_model: env_or("OPENAI_MODEL", DEFAULT_OPENAI_MODEL),
            anthropic_api_key: env_or("ANTHROPIC_API_KEY", ""),
            anthropic_model: env_or("ANTHROPIC_MODEL", DEFAULT_ANTHROPIC_MODEL),
            ollama_base_url: env_or("OLLAMA_BASE_URL", DEFAULT_OLLAMA_BASE_URL),
            ollama_model: env_or("OLLAMA_MODEL", DEFAULT_OLLAMA_MODEL),
        }
    }

    /// Validate the configuration, returning one message per problem
    ///
    /// An empty list means [`ProviderConfig::build`] will succeed.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        match self.provider.as_deref() {
            None => {}
            Some("openai") => {
                if self.openai_api_key.is_empty() {
                    errors.push("OPENAI_API_KEY not set (TICKETGEN_PROVIDER=openai)".to_string());
                }
            }
            Some("anthropic") => {
                if self.anthropic_api_key.is_empty() {
                    errors.push(
                        "ANTHROPIC_API_KEY not set (TICKETGEN_PROVIDER=anthropic)".to_string(),
                    );
                }
            }
            Some("ollama") => {
                if self.ollama_base_url.is_empty() {
                    errors.push("OLLAMA_BASE_URL not set (TICKETGEN_PROVIDER=ollama)".to_string());
                }
            }
            Some(other) => {
                errors.push(format!(
                    "invalid TICKETGEN_PROVIDER '{other}' (must be 'openai', 'anthropic', or 'ollama')"
                ));
            }
        }
        errors
    }

    /// Build the configured provider, or `None` when no provider is selected
    pub fn build(&self) -> Result<Option<Arc<dyn CompletionProvider>>, ProviderError> {
        let provider: Arc<dyn CompletionProvider> = match self.provider.as_deref() {
            None => return Ok(None),
            Some("openai") => Arc::new(OpenAiCompatibleProvider::new(
                OpenAiCompatibleConfig::openai(&self.openai_api_key, &self.openai_model),
            )?),
            Some("ollama") => Arc::new(OpenAiCompatibleProvider::new(
                OpenAiCompatibleConfig::ollama(&self.ollama_base_url, &self.ollama_model),
            )?),
            Some("anthropic") => Arc::new(AnthropicProvider::new(AnthropicConfig::new(
                &self.anthropic_api_key,
                &self.anthropic_model,
            ))?),
            Some(other) => {
                return Err(ProviderError::InvalidConfig(format!(
                    "unknown provider '{other}'"
                )))
            }
        };
        Ok(Some(provider))
    }
}
