//! Ticketgen model-provider capability
//!
//! One interface, [`CompletionProvider`], with an implementation per
//! provider. Engines receive the capability explicitly at construction
//! (`Option<Arc<dyn CompletionProvider>>`); there is no process-wide
//! provider singleton, and provider differences (Ollama's missing structured
//! JSON mode, Anthropic's top-level system prompt) stay inside the
//! respective implementation.
//!
//! # Example
//!
//! ```rust,ignore
//! use tg_provider::{CompletionProvider, ProviderConfig};
//!
//! # async fn example() -> Result<(), tg_provider::ProviderError> {
//! let provider = ProviderConfig::from_env().build()?;
//! if let Some(provider) = provider {
//!     let text = provider.complete("You extract tickets.", "...", true).await?;
//!     println!("{text}");
//! }
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod anthropic;
pub mod config;
pub mod error;
pub mod mock;
pub mod openai;

use async_trait::async_trait;

pub use anthropic::{AnthropicConfig, AnthropicProvider};
pub use config::ProviderConfig;
pub use error::ProviderError;
pub use mock::{MockProvider, RecordedCall};
pub use openai::{OpenAiCompatibleConfig, OpenAiCompatibleProvider};

/// Capability to complete a prompt against a model provider
///
/// The call is an opaque synchronous step from the engines' point of view:
/// no retry, no internal timeout. A transport or API failure is a
/// [`ProviderError`] and always propagates; only the *shape* of a successful
/// response is the engines' concern.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Provider display name for logs and errors
    fn name(&self) -> &str;

    /// Complete a system+user prompt pair, returning the raw response text
    ///
    /// `expect_json` asks the provider for a structured JSON response where
    /// the protocol supports it; providers without such a mode ignore it.
    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        expect_json: bool,
    ) -> Result<String, ProviderError>;
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
