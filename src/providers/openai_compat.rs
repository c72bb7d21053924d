//! Wire format for OpenAI-compatible chat completion endpoints.
//!
//! Used by both the OpenAI and Groq adapters; Groq serves the same schema
//! under its `/openai/v1` prefix.

use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::http::check_status;
use crate::types::{CompletionRequest, Usage};
use crate::{HeimdallError, Result};

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct WireMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<WireUsage>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct WireUsage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
}

/// Text and usage from a completed chat call.
pub(crate) struct ChatOutput {
    pub content: String,
    pub usage: Usage,
}

/// POST a chat completion and normalize the reply.
pub(crate) async fn chat_completion(
    http: &Client,
    url: &str,
    api_key: &str,
    model: &str,
    request: &CompletionRequest,
    provider: &str,
) -> Result<ChatOutput> {
    let body = ChatRequest {
        model,
        messages: request
            .messages
            .iter()
            .map(|m| WireMessage {
                role: m.role.as_str(),
                content: &m.content,
            })
            .collect(),
        max_tokens: request.max_tokens,
        temperature: request.temperature,
    };

    let response = http
        .post(url)
        .bearer_auth(api_key)
        .json(&body)
        .send()
        .await?;
    let response = check_status(response, provider).await?;

    let parsed: ChatResponse = response.json().await?;
    let content = parsed
        .choices
        .into_iter()
        .next()
        .ok_or(HeimdallError::EmptyResponse)?
        .message
        .content
        .unwrap_or_default();
    let usage = parsed
        .usage
        .map(|u| Usage::new(u.prompt_tokens, u.completion_tokens))
        .unwrap_or_default();

    Ok(ChatOutput { content, usage })
}
