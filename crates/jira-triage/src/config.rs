//! Configuration for triage runs.
//!
//! Values come from the environment with defaults, and CLI flags override
//! them field by field.

use std::env;

use url::Url;

use crate::error::ConfigError;

/// Jira instance placeholder used when `JIRA_URL` is unset.
pub const DEFAULT_JIRA_URL: &str = "http://your-jira-domain";

/// JQL used when no query is given.
pub const DEFAULT_QUERY: &str = "assignee=currentUser()";

/// Model used when `OPENAI_MODEL` is unset.
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Resolved run configuration.
#[derive(Clone)]
pub struct Config {
    /// Jira instance URL.
    pub jira_url: String,
    /// Jira account email; empty selects bearer token auth.
    pub jira_email: String,
    /// Jira API token or personal access token.
    pub jira_api_token: String,
    /// JQL query selecting the issues to triage.
    pub jql_query: String,
    /// OpenAI API key.
    pub openai_api_key: String,
    /// Chat model name.
    pub model: String,
}

/// Per-field overrides, typically parsed from CLI flags.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub jira_url: Option<String>,
    pub jira_email: Option<String>,
    pub jira_api_token: Option<String>,
    pub jql_query: Option<String>,
    pub openai_api_key: Option<String>,
    pub model: Option<String>,
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            jira_url: lookup("JIRA_URL").unwrap_or_else(|| DEFAULT_JIRA_URL.to_string()),
            jira_email: lookup("JIRA_EMAIL").unwrap_or_default(),
            jira_api_token: lookup("JIRA_API_TOKEN").unwrap_or_default(),
            jql_query: lookup("JQL_QUERY").unwrap_or_else(|| DEFAULT_QUERY.to_string()),
            openai_api_key: lookup("OPENAI_API_KEY").unwrap_or_default(),
            model: lookup("OPENAI_MODEL")
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        }
    }

    /// Apply overrides on top of this configuration.
    #[must_use]
    pub fn with_overrides(mut self, overrides: Overrides) -> Self {
        fn apply(target: &mut String, value: Option<String>) {
            if let Some(value) = value {
                *target = value;
            }
        }
        apply(&mut self.jira_url, overrides.jira_url);
        apply(&mut self.jira_email, overrides.jira_email);
        apply(&mut self.jira_api_token, overrides.jira_api_token);
        apply(&mut self.jql_query, overrides.jql_query);
        apply(&mut self.openai_api_key, overrides.openai_api_key);
        apply(&mut self.model, overrides.model);
        self
    }

    /// Email for basic auth, if one is configured.
    pub fn email(&self) -> Option<&str> {
        Some(self.jira_email.as_str()).filter(|e| !e.is_empty())
    }

    /// Check that the Jira URL is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidUrl {
            url: self.jira_url.clone(),
            reason,
        };
        let url = Url::parse(&self.jira_url).map_err(|e| invalid(e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
        }
        Ok(())
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fn redact(secret: &str) -> &'static str {
            if secret.is_empty() {
                "<unset>"
            } else {
                "<redacted>"
            }
        }
        f.debug_struct("Config")
            .field("jira_url", &self.jira_url)
            .field("jira_email", &self.jira_email)
            .field("jira_api_token", &redact(&self.jira_api_token))
            .field("jql_query", &self.jql_query)
            .field("openai_api_key", &redact(&self.openai_api_key))
            .field("model", &self.model)
            .finish()
    }
}
