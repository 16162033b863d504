//! Issue tracker abstraction.
//!
//! The rest of the crate only talks to [`IssueTracker`], so the Jira REST
//! client can be swapped for an in-memory double in tests.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::error::TrackerError;

/// Result alias for tracker calls.
pub type TrackerResult<T> = Result<T, TrackerError>;

/// Name of the terminal workflow status that rejects plain field updates.
pub const CLOSED_STATUS: &str = "closed";

/// Search-page projection of an issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueSummary {
    /// Issue key (e.g., "PROJ-123").
    pub key: String,
}

/// A workflow transition available on an issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// Transition ID used when executing the transition.
    pub id: String,
    /// Human-readable transition name.
    pub name: String,
}

impl Transition {
    /// Create a transition.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Structured issue record populated by the tracker adapter.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Issue {
    /// Issue key.
    pub key: String,
    /// One-line summary.
    pub summary: String,
    /// Free-form description, if any.
    pub description: Option<String>,
    /// Current labels.
    pub labels: Vec<String>,
    /// Workflow status name (e.g., "In Progress", "Closed").
    pub status: String,
    /// Transitions available from the current status, when requested.
    pub transitions: Vec<Transition>,
}

impl Issue {
    /// Whether the issue sits in the terminal "closed" status.
    pub fn is_closed(&self) -> bool {
        self.status.to_lowercase() == CLOSED_STATUS
    }

    /// Description with empty values collapsed to `None`.
    pub fn description_text(&self) -> Option<&str> {
        self.description.as_deref().filter(|d| !d.is_empty())
    }
}

/// Field name to value map sent with updates and transitions.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FieldUpdate(BTreeMap<String, Value>);

impl FieldUpdate {
    /// Empty update.
    pub fn new() -> Self {
        Self::default()
    }

    /// Update that replaces the issue's labels.
    pub fn labels<S: AsRef<str>>(labels: &[S]) -> Self {
        let values = labels
            .iter()
            .map(|l| Value::String(l.as_ref().to_string()))
            .collect();
        Self::new().with("labels", Value::Array(values))
    }

    /// Add or replace a field.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(field.into(), value.into());
        self
    }

    /// Look up a field value.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Labels carried by this update, if it sets any.
    pub fn label_values(&self) -> Option<Vec<String>> {
        self.get("labels")?.as_array().map(|values| {
            values
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect()
        })
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Operations the triage pipeline needs from an issue tracker.
#[async_trait]
pub trait IssueTracker: Send + Sync {
    /// Run a search and return one page of results.
    ///
    /// `fields` restricts the returned fields; `None` uses the tracker default.
    async fn search(
        &self,
        query: &str,
        start_at: usize,
        max_results: usize,
        fields: Option<&[&str]>,
    ) -> TrackerResult<Vec<IssueSummary>>;

    /// Fetch an issue with summary, description, labels, status and transitions.
    async fn get_issue(&self, key: &str) -> TrackerResult<Issue>;

    /// Directly update fields on an issue.
    async fn update_fields(&self, key: &str, fields: &FieldUpdate) -> TrackerResult<()>;

    /// List transitions available from the issue's current status.
    async fn list_transitions(&self, key: &str) -> TrackerResult<Vec<Transition>>;

    /// Execute a transition while setting fields in the same request.
    async fn transition_with_fields(
        &self,
        key: &str,
        transition_id: &str,
        fields: &FieldUpdate,
    ) -> TrackerResult<()>;
}
