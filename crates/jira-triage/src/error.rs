//! Error types for the triage pipeline.

use thiserror::Error;

/// Errors returned by an issue tracker client.
#[derive(Debug, Error)]
pub enum TrackerError {
    /// HTTP request failed before a response was received
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Tracker answered with a non-success status
    #[error("Jira API returned error status {status}: {body}")]
    Status { status: u16, body: String },

    /// Response body did not match the expected shape
    #[error("Failed to parse Jira API response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Client could not be constructed
    #[error("Invalid tracker configuration: {0}")]
    Config(String),
}

/// Errors that abort a whole run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The initial issue listing failed before any key was collected
    #[error("Failed to list issues for query '{query}': {source}")]
    IssueListing {
        query: String,
        #[source]
        source: TrackerError,
    },

    /// A prompt template failed to register
    #[error("Prompt template error: {0}")]
    Template(String),
}

/// Errors raised while resolving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Jira URL is not an absolute http(s) URL
    #[error("Invalid Jira URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Page size must be positive
    #[error("Page size must be greater than zero")]
    ZeroPageSize,
}
