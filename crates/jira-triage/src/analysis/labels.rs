//! Domain and technology classification.

use std::sync::Arc;

use llm::{AIMessage, AIProvider, GenerateOptions};
use serde_json::json;
use tracing::{info, warn};

use super::prompts::{PromptManager, LABELS, LABELS_SYSTEM_PROMPT};
use super::verdict::{FallbackReason, Verdict};
use super::vocabulary::Vocabulary;
use super::DESCRIPTION_PLACEHOLDER;
use crate::error::PipelineError;

/// Two short lines of labels.
const MAX_ANSWER_TOKENS: u32 = 200;

const DOMAINS_PREFIX: &str = "Domains:";
const TECHNOLOGIES_PREFIX: &str = "Technologies:";

/// Labels assigned to a task, each a member of the vocabulary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskLabels {
    pub domains: Vec<String>,
    pub technologies: Vec<String>,
}

impl TaskLabels {
    /// Domains followed by technologies, in classification order.
    pub fn combined(&self) -> Vec<String> {
        self.domains
            .iter()
            .chain(&self.technologies)
            .cloned()
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty() && self.technologies.is_empty()
    }
}

/// Split one response line into vocabulary members.
fn parse_line(line: &str, prefix: &str, accept: impl Fn(&str) -> bool) -> Vec<String> {
    let line = line.trim();
    let line = line.strip_prefix(prefix).unwrap_or(line);
    line.split(';')
        .map(str::trim)
        .filter(|token| accept(token))
        .map(str::to_string)
        .collect()
}

/// Parse a two-line `Domains: ...` / `Technologies: ...` answer.
///
/// Tokens outside the vocabulary are dropped. A response with fewer than two
/// lines yields an empty fallback rather than a half-filled result.
pub fn parse_labels(raw: &str, vocabulary: &Vocabulary) -> Verdict<TaskLabels> {
    let mut lines = raw.split('\n');
    let (Some(domains_line), Some(technologies_line)) = (lines.next(), lines.next()) else {
        return Verdict::Fallback {
            value: TaskLabels::default(),
            reason: FallbackReason::MalformedResponse(raw.to_string()),
        };
    };

    Verdict::Classified(TaskLabels {
        domains: parse_line(domains_line, DOMAINS_PREFIX, |t| vocabulary.is_domain(t)),
        technologies: parse_line(technologies_line, TECHNOLOGIES_PREFIX, |t| {
            vocabulary.is_technology(t)
        }),
    })
}

/// Classifies tasks into domain and technology labels.
pub struct LabelClassifier {
    provider: Arc<dyn AIProvider>,
    prompts: PromptManager,
    model: String,
    vocabulary: Vocabulary,
}

impl LabelClassifier {
    /// Create a classifier that prompts with the given vocabulary.
    pub fn new(
        provider: Arc<dyn AIProvider>,
        model: impl Into<String>,
        vocabulary: Vocabulary,
    ) -> Result<Self, PipelineError> {
        Ok(Self {
            provider,
            prompts: PromptManager::new()?,
            model: model.into(),
            vocabulary,
        })
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// Build the user prompt for a task.
    pub fn prompt(&self, summary: &str, description: Option<&str>) -> Result<String, PipelineError> {
        let description = description
            .filter(|d| !d.is_empty())
            .unwrap_or(DESCRIPTION_PLACEHOLDER);
        self.prompts.render(
            LABELS,
            &json!({
                "summary": summary,
                "description": description,
                "domains": self.vocabulary.domains().join(", "),
                "technologies": self.vocabulary.technologies().join(", "),
            }),
        )
    }

    /// Classify a task. Never fails: problems yield empty label lists.
    pub async fn classify(&self, summary: &str, description: Option<&str>) -> Verdict<TaskLabels> {
        let prompt = match self.prompt(summary, description) {
            Ok(p) => p,
            Err(e) => {
                return Verdict::Fallback {
                    value: TaskLabels::default(),
                    reason: FallbackReason::Prompt(e.to_string()),
                }
            }
        };

        let messages = [AIMessage::system(LABELS_SYSTEM_PROMPT), AIMessage::user(prompt)];
        let options = GenerateOptions::classification(MAX_ANSWER_TOKENS);

        let verdict = match self
            .provider
            .generate_text(&self.model, &messages, &options)
            .await
        {
            Ok(response) => parse_labels(&response.text, &self.vocabulary),
            Err(e) => Verdict::Fallback {
                value: TaskLabels::default(),
                reason: FallbackReason::OracleUnavailable(e.to_string()),
            },
        };

        match &verdict {
            Verdict::Classified(labels) => info!(
                domains = ?labels.domains,
                technologies = ?labels.technologies,
                "Classified task"
            ),
            Verdict::Fallback { reason, .. } => warn!(%reason, "Classification fell back to no labels"),
        }
        verdict
    }
}
