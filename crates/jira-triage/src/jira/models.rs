//! Jira REST v2 wire types.
//!
//! Jira returns loosely-typed `fields` objects; everything is optional here
//! and converted into the crate's [`Issue`] record at the edge.

use serde::{Deserialize, Serialize};

use crate::tracker::{FieldUpdate, Issue, IssueSummary, Transition};

/// Response of `GET /rest/api/2/search`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    #[serde(default)]
    pub start_at: usize,
    #[serde(default)]
    pub total: Option<usize>,
    #[serde(default)]
    pub issues: Vec<SearchIssue>,
}

/// Issue entry within a search page.
#[derive(Debug, Deserialize)]
pub struct SearchIssue {
    pub key: String,
}

impl From<SearchIssue> for IssueSummary {
    fn from(issue: SearchIssue) -> Self {
        Self { key: issue.key }
    }
}

/// Response of `GET /rest/api/2/issue/{key}`.
#[derive(Debug, Deserialize)]
pub struct IssueResponse {
    pub key: String,
    #[serde(default)]
    pub fields: IssueFields,
    #[serde(default)]
    pub transitions: Vec<TransitionResponse>,
}

/// Subset of issue fields the pipeline reads.
#[derive(Debug, Default, Deserialize)]
pub struct IssueFields {
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub labels: Option<Vec<String>>,
    #[serde(default)]
    pub status: Option<StatusField>,
}

/// Workflow status object.
#[derive(Debug, Deserialize)]
pub struct StatusField {
    pub name: String,
}

/// Transition entry.
#[derive(Debug, Deserialize)]
pub struct TransitionResponse {
    pub id: String,
    pub name: String,
}

impl From<TransitionResponse> for Transition {
    fn from(t: TransitionResponse) -> Self {
        Self {
            id: t.id,
            name: t.name,
        }
    }
}

/// Response of `GET /rest/api/2/issue/{key}/transitions`.
#[derive(Debug, Deserialize)]
pub struct TransitionsResponse {
    #[serde(default)]
    pub transitions: Vec<TransitionResponse>,
}

impl From<IssueResponse> for Issue {
    fn from(response: IssueResponse) -> Self {
        let fields = response.fields;
        Self {
            key: response.key,
            summary: fields.summary.unwrap_or_default(),
            description: fields.description,
            labels: fields.labels.unwrap_or_default(),
            status: fields.status.map(|s| s.name).unwrap_or_default(),
            transitions: response
                .transitions
                .into_iter()
                .map(Transition::from)
                .collect(),
        }
    }
}

/// Body of `PUT /rest/api/2/issue/{key}`.
#[derive(Debug, Serialize)]
pub struct UpdateRequest<'a> {
    pub fields: &'a FieldUpdate,
}

/// Body of `POST /rest/api/2/issue/{key}/transitions`.
#[derive(Debug, Serialize)]
pub struct TransitionRequest<'a> {
    pub transition: TransitionRef<'a>,
    #[serde(skip_serializing_if = "no_fields")]
    pub fields: &'a FieldUpdate,
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn no_fields(fields: &&FieldUpdate) -> bool {
    fields.is_empty()
}

/// Transition identifier reference.
#[derive(Debug, Serialize)]
pub struct TransitionRef<'a> {
    pub id: &'a str,
}
