//! Error types for model providers.

use thiserror::Error;

/// Errors that can occur when calling a model provider.
#[derive(Debug, Error)]
pub enum LlmError {
    /// Provider has no API key
    #[error("{0} not set")]
    MissingApiKey(&'static str),

    /// HTTP request failed before a response was received
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Provider answered with an error status
    #[error("{provider} API error ({status}): {message}")]
    Api {
        provider: &'static str,
        status: u16,
        message: String,
    },

    /// Response body could not be decoded
    #[error("Failed to parse response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Result alias for provider calls.
pub type LlmResult<T> = Result<T, LlmError>;
