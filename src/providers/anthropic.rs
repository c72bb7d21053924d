//! Anthropic adapter (Messages API, no embeddings).
//!
//! See: <https://docs.anthropic.com/en/api/messages>

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::http::check_status;
use super::traits::ProviderAdapter;
use crate::types::{Capabilities, CompletionRequest, CompletionResponse, Role, Usage};
use crate::{HeimdallError, Result};

/// Default base URL for the Anthropic API
pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";

/// Default chat model
pub const DEFAULT_MODEL: &str = "claude-3-5-sonnet-20241022";

/// API version header value
const API_VERSION: &str = "2023-06-01";

/// Highest temperature the Messages API accepts.
const MAX_TEMPERATURE: f32 = 1.0;

/// Adapter for Anthropic Claude models.
#[derive(Clone)]
pub struct AnthropicProvider {
    api_key: Option<String>,
    http: Client,
    base_url: String,
    model: String,
}

impl AnthropicProvider {
    /// Create an adapter; `None` leaves it permanently unavailable.
    pub fn new(api_key: Option<String>, http: Client) -> Self {
        Self {
            api_key,
            http,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Point at a different base URL (for testing with wiremock).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the chat model.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

#[derive(Serialize)]
struct MessagesBody<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    messages: Vec<WireMessage<'a>>,
}

#[derive(Serialize)]
struct WireMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MessagesReply {
    #[serde(default)]
    content: Vec<ContentBlock>,
    #[serde(default)]
    usage: Option<WireUsage>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize)]
struct WireUsage {
    #[serde(default)]
    input_tokens: u32,
    #[serde(default)]
    output_tokens: u32,
}

/// Split system messages out of the conversation.
///
/// The Messages API takes the system prompt as a top-level field; several
/// system messages are joined in order.
fn split_system(request: &CompletionRequest) -> (Option<String>, Vec<WireMessage<'_>>) {
    let mut system = Vec::new();
    let mut messages = Vec::with_capacity(request.messages.len());
    for message in &request.messages {
        match message.role {
            Role::System => system.push(message.content.as_str()),
            role => messages.push(WireMessage {
                role: role.as_str(),
                content: &message.content,
            }),
        }
    }
    let system = (!system.is_empty()).then(|| system.join("\n\n"));
    (system, messages)
}

#[async_trait]
impl ProviderAdapter for AnthropicProvider {
    fn name(&self) -> &str {
        "anthropic"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::completion_only()
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            HeimdallError::Configuration("anthropic API key missing".to_string())
        })?;

        let (system, messages) = split_system(request);
        info!(
            provider = "anthropic",
            model = %self.model,
            messages_count = messages.len(),
            max_tokens = request.max_tokens,
            "completion request"
        );

        let response = self
            .http
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", api_key)
            .header("anthropic-version", API_VERSION)
            .json(&MessagesBody {
                model: &self.model,
                max_tokens: request.max_tokens,
                temperature: request.temperature.min(MAX_TEMPERATURE),
                system,
                messages,
            })
            .send()
            .await?;
        let response = check_status(response, "anthropic").await?;

        let reply: MessagesReply = response.json().await?;
        if reply.content.is_empty() {
            return Err(HeimdallError::EmptyResponse);
        }
        let content: String = reply.content.into_iter().filter_map(|b| b.text).collect();
        let usage = reply
            .usage
            .map(|u| Usage::new(u.input_tokens, u.output_tokens))
            .unwrap_or_default();

        info!(
            provider = "anthropic",
            total_tokens = usage.total_tokens,
            "completion response"
        );

        Ok(CompletionResponse {
            content,
            model: self.model.clone(),
            provider: self.name().to_string(),
            usage,
        })
    }
}
