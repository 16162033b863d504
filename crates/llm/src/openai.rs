//! OpenAI chat-completions backend.

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::error::{LlmError, LlmResult};
use crate::provider::{AIMessage, AIProvider, AIResponse, GenerateOptions, TokenUsage};

const CHAT_COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";

const PROVIDER: &str = "openai";

const API_KEY_VAR: &str = "OPENAI_API_KEY";

/// Request and response bodies of the chat-completions endpoint.
mod wire {
    use serde::{Deserialize, Serialize};

    use crate::provider::{AIMessage, AIRole, TokenUsage};

    #[derive(Debug, Serialize)]
    pub struct ChatMessage<'a> {
        pub role: AIRole,
        pub content: &'a str,
    }

    impl<'a> From<&'a AIMessage> for ChatMessage<'a> {
        fn from(message: &'a AIMessage) -> Self {
            Self {
                role: message.role,
                content: &message.content,
            }
        }
    }

    #[derive(Debug, Serialize)]
    pub struct ChatRequest<'a> {
        pub model: &'a str,
        pub messages: Vec<ChatMessage<'a>>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub temperature: Option<f32>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub max_tokens: Option<u32>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub stop: Option<&'a [String]>,
    }

    #[derive(Debug, Deserialize)]
    pub struct ChatResponse {
        pub model: String,
        #[serde(default)]
        pub choices: Vec<Choice>,
        #[serde(default)]
        pub usage: Option<Usage>,
    }

    impl ChatResponse {
        /// Content of the first choice, if the model produced any.
        pub fn into_text(self) -> Option<String> {
            self.choices.into_iter().next()?.message.content
        }
    }

    #[derive(Debug, Deserialize)]
    pub struct Choice {
        pub message: ChoiceMessage,
    }

    #[derive(Debug, Deserialize)]
    pub struct ChoiceMessage {
        pub content: Option<String>,
    }

    #[derive(Debug, Deserialize)]
    #[allow(clippy::struct_field_names)]
    pub struct Usage {
        pub prompt_tokens: u32,
        pub completion_tokens: u32,
        pub total_tokens: u32,
    }

    impl From<Usage> for TokenUsage {
        fn from(usage: Usage) -> Self {
            Self {
                input_tokens: usage.prompt_tokens,
                output_tokens: usage.completion_tokens,
                total_tokens: usage.total_tokens,
            }
        }
    }

    #[derive(Debug, Deserialize)]
    pub struct ErrorBody {
        pub error: ErrorDetail,
    }

    #[derive(Debug, Deserialize)]
    pub struct ErrorDetail {
        pub message: String,
    }
}

/// Pull the human-readable message out of an error body, falling back to
/// the raw body when it is not the documented shape.
fn error_message(body: String) -> String {
    serde_json::from_str::<wire::ErrorBody>(&body).map_or(body, |b| b.error.message)
}

/// Chat-completions provider authenticated with a bearer API key.
pub struct OpenAIProvider {
    client: Client,
    api_key: Option<String>,
    endpoint: String,
}

impl OpenAIProvider {
    /// Create a provider. An empty key leaves it unconfigured and every call
    /// fails with [`LlmError::MissingApiKey`].
    pub fn new(api_key: impl Into<String>) -> Self {
        let api_key = api_key.into();
        Self {
            client: Client::new(),
            api_key: (!api_key.is_empty()).then_some(api_key),
            endpoint: CHAT_COMPLETIONS_URL.to_string(),
        }
    }

    /// Point at a compatible endpoint (proxy, Azure OpenAI, test server).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[async_trait]
impl AIProvider for OpenAIProvider {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn generate_text(
        &self,
        model: &str,
        messages: &[AIMessage],
        options: &GenerateOptions,
    ) -> LlmResult<AIResponse> {
        let Some(api_key) = &self.api_key else {
            return Err(LlmError::MissingApiKey(API_KEY_VAR));
        };

        let request = wire::ChatRequest {
            model,
            messages: messages.iter().map(wire::ChatMessage::from).collect(),
            temperature: options.temperature,
            max_tokens: options.max_tokens,
            stop: options.stop_sequences.as_deref(),
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(LlmError::Api {
                provider: PROVIDER,
                status: status.as_u16(),
                message: error_message(body),
            });
        }

        let mut completion: wire::ChatResponse = serde_json::from_str(&body)?;
        let model = completion.model.clone();
        let usage = completion
            .usage
            .take()
            .map(TokenUsage::from)
            .unwrap_or_default();
        let text = completion.into_text().unwrap_or_default();

        debug!(
            %model,
            output_tokens = usage.output_tokens,
            "Completion received"
        );

        Ok(AIResponse {
            text,
            usage,
            model,
            provider: PROVIDER.to_string(),
        })
    }
}
