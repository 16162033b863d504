//! REST client for the Jira API (v2).

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::Response;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use super::models::{
    IssueResponse, SearchResponse, TransitionRef, TransitionRequest, TransitionsResponse,
    UpdateRequest,
};
use crate::error::TrackerError;
use crate::tracker::{FieldUpdate, Issue, IssueSummary, IssueTracker, TrackerResult, Transition};

/// Fields fetched for a full issue.
const ISSUE_FIELDS: &str = "summary,description,labels,status";

/// Jira REST client
#[derive(Debug, Clone)]
pub struct JiraClient {
    client: reqwest::Client,
    base_url: String,
}

impl JiraClient {
    /// Create a new Jira client.
    ///
    /// # Arguments
    /// * `base_url` - Jira instance URL (e.g., `https://your-domain.atlassian.net`)
    /// * `email` - Account email; when present the token is sent with HTTP
    ///   basic auth (Jira Cloud), otherwise as a bearer personal access token
    ///   (Jira Server/Data Center)
    /// * `api_token` - API token or personal access token
    pub fn new(base_url: &str, email: Option<&str>, api_token: &str) -> TrackerResult<Self> {
        let auth_value = match email.filter(|e| !e.is_empty()) {
            Some(email) => format!("Basic {}", STANDARD.encode(format!("{email}:{api_token}"))),
            None => format!("Bearer {api_token}"),
        };

        let mut auth = HeaderValue::from_str(&auth_value)
            .map_err(|e| TrackerError::Config(format!("Invalid API token: {e}")))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| TrackerError::Config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/rest/api/2/{path}", self.base_url)
    }

    /// Fail on non-success status, keeping the body for diagnostics.
    async fn check(response: Response) -> TrackerResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(TrackerError::Status {
            status: status.as_u16(),
            body,
        })
    }

    async fn decode<R: DeserializeOwned>(response: Response) -> TrackerResult<R> {
        let body = Self::check(response).await?.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl IssueTracker for JiraClient {
    #[instrument(skip(self, fields))]
    async fn search(
        &self,
        query: &str,
        start_at: usize,
        max_results: usize,
        fields: Option<&[&str]>,
    ) -> TrackerResult<Vec<IssueSummary>> {
        let mut params = vec![
            ("jql", query.to_string()),
            ("startAt", start_at.to_string()),
            ("maxResults", max_results.to_string()),
        ];
        if let Some(fields) = fields {
            params.push(("fields", fields.join(",")));
        }

        let response = self
            .client
            .get(self.url("search"))
            .query(&params)
            .send()
            .await?;
        let page: SearchResponse = Self::decode(response).await?;

        debug!(
            returned = page.issues.len(),
            total = ?page.total,
            "Search page received"
        );
        Ok(page.issues.into_iter().map(IssueSummary::from).collect())
    }

    #[instrument(skip(self))]
    async fn get_issue(&self, key: &str) -> TrackerResult<Issue> {
        let response = self
            .client
            .get(self.url(&format!("issue/{key}")))
            .query(&[("fields", ISSUE_FIELDS), ("expand", "transitions")])
            .send()
            .await?;
        let issue: IssueResponse = Self::decode(response).await?;
        Ok(issue.into())
    }

    #[instrument(skip(self, fields))]
    async fn update_fields(&self, key: &str, fields: &FieldUpdate) -> TrackerResult<()> {
        let response = self
            .client
            .put(self.url(&format!("issue/{key}")))
            .json(&UpdateRequest { fields })
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_transitions(&self, key: &str) -> TrackerResult<Vec<Transition>> {
        let response = self
            .client
            .get(self.url(&format!("issue/{key}/transitions")))
            .send()
            .await?;
        let body: TransitionsResponse = Self::decode(response).await?;
        Ok(body.transitions.into_iter().map(Transition::from).collect())
    }

    #[instrument(skip(self, fields))]
    async fn transition_with_fields(
        &self,
        key: &str,
        transition_id: &str,
        fields: &FieldUpdate,
    ) -> TrackerResult<()> {
        let request = TransitionRequest {
            transition: TransitionRef { id: transition_id },
            fields,
        };
        let response = self
            .client
            .post(self.url(&format!("issue/{key}/transitions")))
            .json(&request)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }
}
