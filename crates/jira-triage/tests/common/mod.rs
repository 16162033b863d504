//! In-memory doubles for the tracker and the model provider.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use jira_triage::tracker::TrackerResult;
use jira_triage::{FieldUpdate, Issue, IssueSummary, IssueTracker, TrackerError, Transition};
use llm::{AIMessage, AIProvider, AIResponse, GenerateOptions, LlmError, LlmResult, TokenUsage};

// =============================================================================
// Fake tracker
// =============================================================================

/// One search call as the pipeline issued it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchCall {
    pub query: String,
    pub start_at: usize,
    pub max_results: usize,
}

/// Scripted page: a list of keys or a transport failure.
pub enum Page {
    Keys(Vec<String>),
    Fail,
}

/// Build a page of `count` keys numbered from `first`.
pub fn page(first: usize, count: usize) -> Page {
    Page::Keys((first..first + count).map(|n| format!("PROJ-{n}")).collect())
}

#[derive(Default)]
pub struct FakeTracker {
    pages: Mutex<VecDeque<Page>>,
    issues: Mutex<HashMap<String, Issue>>,
    transitions: HashMap<String, Vec<Transition>>,
    failing_updates: Vec<String>,
    pub searches: Mutex<Vec<SearchCall>>,
    pub updates: Mutex<Vec<(String, FieldUpdate)>>,
    pub transitioned: Mutex<Vec<(String, String, FieldUpdate)>>,
}

impl FakeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pages(self, pages: Vec<Page>) -> Self {
        *self.pages.lock().unwrap() = pages.into();
        self
    }

    pub fn with_issue(self, issue: Issue) -> Self {
        self.issues.lock().unwrap().insert(issue.key.clone(), issue);
        self
    }

    pub fn with_transitions(mut self, key: &str, transitions: Vec<Transition>) -> Self {
        self.transitions.insert(key.to_string(), transitions);
        self
    }

    pub fn with_failing_update(mut self, key: &str) -> Self {
        self.failing_updates.push(key.to_string());
        self
    }

    pub fn searches(&self) -> Vec<SearchCall> {
        self.searches.lock().unwrap().clone()
    }

    pub fn updates(&self) -> Vec<(String, FieldUpdate)> {
        self.updates.lock().unwrap().clone()
    }

    pub fn transitioned(&self) -> Vec<(String, String, FieldUpdate)> {
        self.transitioned.lock().unwrap().clone()
    }
}

fn unavailable() -> TrackerError {
    TrackerError::Status {
        status: 503,
        body: "Service Unavailable".to_string(),
    }
}

#[async_trait]
impl IssueTracker for FakeTracker {
    async fn search(
        &self,
        query: &str,
        start_at: usize,
        max_results: usize,
        _fields: Option<&[&str]>,
    ) -> TrackerResult<Vec<IssueSummary>> {
        self.searches.lock().unwrap().push(SearchCall {
            query: query.to_string(),
            start_at,
            max_results,
        });
        match self.pages.lock().unwrap().pop_front() {
            Some(Page::Keys(keys)) => Ok(keys.into_iter().map(|key| IssueSummary { key }).collect()),
            Some(Page::Fail) => Err(unavailable()),
            None => Ok(Vec::new()),
        }
    }

    async fn get_issue(&self, key: &str) -> TrackerResult<Issue> {
        self.issues
            .lock()
            .unwrap()
            .get(key)
            .cloned()
            .ok_or_else(|| TrackerError::Status {
                status: 404,
                body: format!("Issue {key} does not exist"),
            })
    }

    async fn update_fields(&self, key: &str, fields: &FieldUpdate) -> TrackerResult<()> {
        if self.failing_updates.iter().any(|k| k == key) {
            return Err(unavailable());
        }
        self.updates
            .lock()
            .unwrap()
            .push((key.to_string(), fields.clone()));
        Ok(())
    }

    async fn list_transitions(&self, key: &str) -> TrackerResult<Vec<Transition>> {
        Ok(self.transitions.get(key).cloned().unwrap_or_default())
    }

    async fn transition_with_fields(
        &self,
        key: &str,
        transition_id: &str,
        fields: &FieldUpdate,
    ) -> TrackerResult<()> {
        self.transitioned.lock().unwrap().push((
            key.to_string(),
            transition_id.to_string(),
            fields.clone(),
        ));
        Ok(())
    }
}

pub fn issue(key: &str, status: &str, description: Option<&str>, labels: &[&str]) -> Issue {
    Issue {
        key: key.to_string(),
        summary: format!("Summary of {key}"),
        description: description.map(str::to_string),
        labels: labels.iter().map(|l| (*l).to_string()).collect(),
        status: status.to_string(),
        transitions: Vec::new(),
    }
}

// =============================================================================
// Scripted provider
// =============================================================================

/// A recorded oracle request.
#[derive(Debug, Clone)]
pub struct OracleCall {
    pub model: String,
    pub messages: Vec<AIMessage>,
    pub options: GenerateOptions,
}

impl OracleCall {
    pub fn user_prompt(&self) -> &str {
        self.messages
            .last()
            .map(|m| m.content.as_str())
            .unwrap_or_default()
    }
}

/// Answers each call with the next scripted reply; `Err` simulates a failure.
#[derive(Default)]
pub struct ScriptedProvider {
    replies: Mutex<VecDeque<Result<String, String>>>,
    pub calls: Mutex<Vec<OracleCall>>,
}

impl ScriptedProvider {
    pub fn new(replies: Vec<Result<&str, &str>>) -> Self {
        Self {
            replies: Mutex::new(
                replies
                    .into_iter()
                    .map(|r| r.map(str::to_string).map_err(str::to_string))
                    .collect(),
            ),
            calls: Mutex::default(),
        }
    }

    /// Provider that answers every call successfully, in order.
    pub fn replying(replies: &[&str]) -> Self {
        Self::new(replies.iter().map(|r| Ok(*r)).collect())
    }

    pub fn calls(&self) -> Vec<OracleCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl AIProvider for ScriptedProvider {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn is_configured(&self) -> bool {
        true
    }

    async fn generate_text(
        &self,
        model: &str,
        messages: &[AIMessage],
        options: &GenerateOptions,
    ) -> LlmResult<AIResponse> {
        self.calls.lock().unwrap().push(OracleCall {
            model: model.to_string(),
            messages: messages.to_vec(),
            options: options.clone(),
        });
        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err("no scripted reply left".to_string()));

        match reply {
            Ok(text) => Ok(AIResponse {
                text,
                usage: TokenUsage::default(),
                model: model.to_string(),
                provider: "scripted".to_string(),
            }),
            Err(message) => Err(LlmError::Api {
                provider: "scripted",
                status: 500,
                message,
            }),
        }
    }
}
