//! Complexity scoring using an AI provider.

use std::fmt;
use std::sync::Arc;

use llm::{AIMessage, AIProvider, GenerateOptions};
use serde_json::json;
use tracing::{info, warn};

use super::prompts::{PromptManager, COMPLEXITY, COMPLEXITY_SYSTEM_PROMPT};
use super::verdict::{FallbackReason, Verdict};
use super::DESCRIPTION_PLACEHOLDER;
use crate::error::PipelineError;

/// A single digit, with room for an echoed prefix.
const MAX_ANSWER_TOKENS: u32 = 10;

/// Prefix some models echo from the few-shot examples.
const OUTPUT_PREFIX: &str = "Output: ";

/// Task complexity on a 0-3 scale, where 0 means "unable to determine".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ComplexityScore(u8);

impl ComplexityScore {
    /// Could not be determined.
    pub const UNDETERMINED: Self = Self(0);
    pub const LOW: Self = Self(1);
    pub const MEDIUM: Self = Self(2);
    pub const HIGH: Self = Self(3);

    /// Build a score, rejecting values outside 0-3.
    pub fn new(value: u8) -> Option<Self> {
        (value <= 3).then_some(Self(value))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn is_determined(self) -> bool {
        self.0 != 0
    }
}

impl fmt::Display for ComplexityScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Parse a raw oracle answer into a complexity verdict.
///
/// Only exactly `1`, `2` or `3` (after dropping an `Output: ` prefix and
/// surrounding whitespace) count as classified. A literal `0` is treated the
/// same as any other unexpected answer.
pub fn parse_complexity(raw: &str) -> Verdict<ComplexityScore> {
    let answer = raw.replace(OUTPUT_PREFIX, "");
    let answer = answer.trim();
    match answer {
        "1" => Verdict::Classified(ComplexityScore::LOW),
        "2" => Verdict::Classified(ComplexityScore::MEDIUM),
        "3" => Verdict::Classified(ComplexityScore::HIGH),
        other => Verdict::Fallback {
            value: ComplexityScore::UNDETERMINED,
            reason: FallbackReason::UnexpectedResponse(other.to_string()),
        },
    }
}

/// Scores task complexity with a single oracle call per task.
pub struct ComplexityAnalyzer {
    provider: Arc<dyn AIProvider>,
    prompts: PromptManager,
    model: String,
}

impl ComplexityAnalyzer {
    /// Create a new analyzer with the given AI provider.
    pub fn new(provider: Arc<dyn AIProvider>, model: impl Into<String>) -> Result<Self, PipelineError> {
        Ok(Self {
            provider,
            prompts: PromptManager::new()?,
            model: model.into(),
        })
    }

    /// Build the user prompt for a task.
    pub fn prompt(&self, summary: &str, description: Option<&str>) -> Result<String, PipelineError> {
        let description = description
            .filter(|d| !d.is_empty())
            .unwrap_or(DESCRIPTION_PLACEHOLDER);
        self.prompts.render(
            COMPLEXITY,
            &json!({ "summary": summary, "description": description }),
        )
    }

    /// Score a task. Never fails: every problem becomes a fallback of 0.
    pub async fn analyze(&self, summary: &str, description: Option<&str>) -> Verdict<ComplexityScore> {
        let prompt = match self.prompt(summary, description) {
            Ok(p) => p,
            Err(e) => {
                return Verdict::Fallback {
                    value: ComplexityScore::UNDETERMINED,
                    reason: FallbackReason::Prompt(e.to_string()),
                }
            }
        };

        let messages = [AIMessage::system(COMPLEXITY_SYSTEM_PROMPT), AIMessage::user(prompt)];
        let options = GenerateOptions::classification(MAX_ANSWER_TOKENS);

        let verdict = match self
            .provider
            .generate_text(&self.model, &messages, &options)
            .await
        {
            Ok(response) => parse_complexity(&response.text),
            Err(e) => Verdict::Fallback {
                value: ComplexityScore::UNDETERMINED,
                reason: FallbackReason::OracleUnavailable(e.to_string()),
            },
        };

        match &verdict {
            Verdict::Classified(score) => info!(complexity = %score, "Complexity analyzed"),
            Verdict::Fallback { reason, .. } => warn!(%reason, "Complexity fell back to 0"),
        }
        verdict
    }
}
