//! LLM Client: the single point of entry for all Claude API calls in Scribe.
//!
//! ARCHITECTURAL RULE: No other module may call the Anthropic API directly.
//! All completions go through a `CompletionClient`; `LlmClient` is the production one.
//!
//! Model: claude-3-5-sonnet-20241022 (hardcoded, do not make configurable).
//!
//! No retry loop: a failed round-trip surfaces immediately and the content service
//! downgrades it to a fallback result.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub mod prompts;

#[cfg(test)]
pub mod mock;

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
/// The model used for all LLM calls in Scribe.
pub const MODEL: &str = "claude-3-5-sonnet-20241022";
const REQUEST_TIMEOUT_SECS: u64 = 120;

/// Opening marker the transport layer wraps around inline text blocks.
pub const TEXT_BLOCK_OPEN: &str = "[TextBlock(text=\"";
/// Closing marker matching `TEXT_BLOCK_OPEN`.
pub const TEXT_BLOCK_CLOSE: &str = "\", type=\"text\")]";

/// Any failure of the completion round-trip (network, auth, quota, bad body).
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Parameters of a single completion round-trip.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    messages: Vec<AnthropicMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct LlmResponse {
    pub content: Vec<ContentBlock>,
    pub usage: Usage,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub block_type: String,
    pub text: Option<String>,
}

#[cfg(test)]
impl ContentBlock {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            block_type: "text".to_string(),
            text: Some(text.into()),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct AnthropicError {
    error: AnthropicErrorBody,
}

#[derive(Debug, Deserialize)]
struct AnthropicErrorBody {
    message: String,
}

/// What a completion call hands back, before any normalization.
///
/// The text has to be pulled out of the payload explicitly: a plain string is used
/// as-is, while structured content blocks are rendered with the transport's
/// `[TextBlock(text="…", type="text")]` tagging.
#[derive(Debug, Clone, PartialEq)]
pub enum CompletionPayload {
    RawString(String),
    Structured(Vec<ContentBlock>),
}

impl CompletionPayload {
    /// Textual representation of the payload.
    pub fn to_text(&self) -> String {
        match self {
            CompletionPayload::RawString(s) => s.clone(),
            CompletionPayload::Structured(blocks) => blocks
                .iter()
                .filter(|b| b.block_type == "text")
                .filter_map(|b| b.text.as_deref())
                .map(|t| format!("{TEXT_BLOCK_OPEN}{t}{TEXT_BLOCK_CLOSE}"))
                .collect(),
        }
    }
}

impl From<&str> for CompletionPayload {
    fn from(s: &str) -> Self {
        CompletionPayload::RawString(s.to_string())
    }
}

impl From<String> for CompletionPayload {
    fn from(s: String) -> Self {
        CompletionPayload::RawString(s)
    }
}

/// A remote text-completion service. Carried per session as `Arc<dyn CompletionClient>`.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionPayload, LlmError>;
}

/// Wraps the Anthropic Messages API.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
}

impl LlmClient {
    pub fn new(api_key: String) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()?,
            api_key,
        })
    }
}

#[async_trait]
impl CompletionClient for LlmClient {
    /// Single round-trip to the Claude API with one user-role message.
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionPayload, LlmError> {
        let request_body = AnthropicRequest {
            model: MODEL,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            messages: vec![AnthropicMessage {
                role: "user",
                content: &request.prompt,
            }],
        };

        let response = self
            .client
            .post(ANTHROPIC_API_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<AnthropicError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        let llm_response: LlmResponse = serde_json::from_str(&body)?;

        debug!(
            "LLM call succeeded: input_tokens={}, output_tokens={}",
            llm_response.usage.input_tokens, llm_response.usage.output_tokens
        );

        Ok(CompletionPayload::Structured(llm_response.content))
    }
}
