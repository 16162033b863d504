//! Provider-neutral request and response types.
//!
//! A classification request is a system instruction followed by one user
//! prompt; the provider hands back whatever text the model wrote.

use async_trait::async_trait;
use serde::Serialize;

use crate::error::LlmResult;

/// Who authored a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AIRole {
    System,
    User,
    Assistant,
}

impl AIRole {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// One chat message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AIMessage {
    pub role: AIRole,
    pub content: String,
}

impl AIMessage {
    pub fn new(role: AIRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Instruction that frames the model's behavior.
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(AIRole::System, content)
    }

    /// The prompt being answered.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(AIRole::User, content)
    }

    /// A prior model turn, for few-shot conversations.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(AIRole::Assistant, content)
    }
}

/// Token accounting reported by the provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
    pub total_tokens: u32,
}

/// Raw model output plus metadata.
#[derive(Debug, Clone)]
pub struct AIResponse {
    /// Text of the first choice; empty when the model returned none.
    pub text: String,
    pub usage: TokenUsage,
    /// Model name as echoed by the provider.
    pub model: String,
    pub provider: String,
}

/// Sampling options for a single request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerateOptions {
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub stop_sequences: Option<Vec<String>>,
}

impl GenerateOptions {
    /// Sampling temperature for short classification answers.
    pub const CLASSIFICATION_TEMPERATURE: f32 = 0.2;

    /// Low-temperature options capped at `max_tokens` output tokens.
    pub fn classification(max_tokens: u32) -> Self {
        Self {
            temperature: Some(Self::CLASSIFICATION_TEMPERATURE),
            max_tokens: Some(max_tokens),
            stop_sequences: None,
        }
    }
}

/// A chat-completion backend.
///
/// Implementations make exactly one request per call. Retries and
/// fallbacks belong to the caller.
#[async_trait]
pub trait AIProvider: Send + Sync {
    /// Short provider identifier (e.g., "openai").
    fn name(&self) -> &'static str;

    /// Whether credentials are present.
    fn is_configured(&self) -> bool;

    async fn generate_text(
        &self,
        model: &str,
        messages: &[AIMessage],
        options: &GenerateOptions,
    ) -> LlmResult<AIResponse>;
}
