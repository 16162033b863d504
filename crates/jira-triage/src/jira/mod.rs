//! Jira integration.
//!
//! Implements [`IssueTracker`](crate::tracker::IssueTracker) over the Jira
//! REST API v2:
//!
//! - JQL search with `startAt`/`maxResults` paging
//! - Issue fetch with `expand=transitions`
//! - Direct field updates
//! - Transitions with field updates (for closed issues)
//!
//! # Configuration
//!
//! - `JIRA_URL`: Jira instance URL (e.g., `https://your-domain.atlassian.net`)
//! - `JIRA_EMAIL`: User email for basic authentication (optional)
//! - `JIRA_API_TOKEN`: Jira API token or personal access token

mod client;
pub mod models;

pub use client::JiraClient;
