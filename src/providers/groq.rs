//! Groq adapter (OpenAI-compatible chat completions, no embeddings).

use async_trait::async_trait;
use reqwest::Client;
use tracing::info;

use super::openai_compat::chat_completion;
use super::traits::ProviderAdapter;
use crate::types::{Capabilities, CompletionRequest, CompletionResponse};
use crate::{HeimdallError, Result};

/// Default base URL for Groq's OpenAI-compatible API
pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Default chat model
pub const DEFAULT_MODEL: &str = "llama-3.1-70b-versatile";

/// Adapter for Groq inference.
#[derive(Clone)]
pub struct GroqProvider {
    api_key: Option<String>,
    http: Client,
    base_url: String,
    model: String,
}

impl GroqProvider {
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

#[async_trait]
impl ProviderAdapter for GroqProvider {
    fn name(&self) -> &str {
        "groq"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::completion_only()
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| HeimdallError::Configuration("groq API key missing".to_string()))?;
        info!(
            provider = "groq",
            model = %self.model,
            messages_count = request.messages.len(),
            max_tokens = request.max_tokens,
            "completion request"
        );

        let output = chat_completion(
            &self.http,
            &format!("{}/chat/completions", self.base_url),
            api_key,
            &self.model,
            request,
            "groq",
        )
        .await?;

        info!(
            provider = "groq",
            total_tokens = output.usage.total_tokens,
            "completion response"
        );

        Ok(CompletionResponse {
            content: output.content,
            model: self.model.clone(),
            provider: self.name().to_string(),
            usage: output.usage,
        })
    }
}
