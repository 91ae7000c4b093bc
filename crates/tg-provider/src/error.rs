//! Provider error types
//!
//! A [`ProviderError`] means the provider path itself is unusable (network,
//! auth, quota, bad configuration). Engines always propagate it to the
//! caller; only response-shape failures degrade to the deterministic
//! fallback, and those are not represented here.

/// The model call itself failed
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// Transport-level failure (connect, TLS, timeout set by the caller)
    #[error("http transport error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider answered with a non-success status
    #[error("provider returned {status}: {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body or status text
        message: String,
    },

    /// The provider answered but the payload held no completion text
    #[error("provider response contained no completion content")]
    MissingContent,

    /// Provider configuration is unusable
    #[error("invalid provider configuration: {0}")]
    InvalidConfig(String),
}
