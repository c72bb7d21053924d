//! OpenAI adapter: chat completions and embeddings.
//!
//! See: <https://platform.openai.com/docs/api-reference>

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::http::check_status;
use super::openai_compat::chat_completion;
use super::traits::ProviderAdapter;
use crate::types::{
    Capabilities, CompletionRequest, CompletionResponse, EmbeddingRequest, EmbeddingResponse,
};
use crate::{HeimdallError, Result};

/// Default base URL for the OpenAI API
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Default chat model
pub const DEFAULT_MODEL: &str = "gpt-4o";

/// Default embedding model
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";

/// Adapter for the OpenAI API.
///
/// Supports:
/// - Chat completions
/// - Embeddings
///
/// Availability optionally includes a `GET /models` reachability probe.
#[derive(Clone)]
pub struct OpenAiProvider {
    api_key: Option<String>,
    http: Client,
    base_url: String,
    model: String,
    embedding_model: String,
    probe: bool,
}

impl OpenAiProvider {
    /// Create an adapter; `None` leaves it permanently unavailable.
    pub fn new(api_key: Option<String>, http: Client) -> Self {
        Self {
            api_key,
            http,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
            probe: true,
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

    /// Set the default embedding model.
    pub fn embedding_model(mut self, model: impl Into<String>) -> Self {
        self.embedding_model = model.into();
        self
    }

    /// Enable or disable the reachability probe in `is_available`.
    pub fn probe_availability(mut self, enabled: bool) -> Self {
        self.probe = enabled;
        self
    }

    fn key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .ok_or_else(|| HeimdallError::Configuration("openai API key missing".to_string()))
    }

    async fn probe_models(&self, api_key: &str) -> Result<()> {
        let response = self
            .http
            .get(format!("{}/models", self.base_url))
            .bearer_auth(api_key)
            .send()
            .await?;
        check_status(response, "openai").await?;
        Ok(())
    }
}

#[derive(Serialize)]
struct EmbedBody<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Deserialize)]
struct EmbedReply {
    #[serde(default)]
    data: Vec<EmbedDatum>,
}

#[derive(Deserialize)]
struct EmbedDatum {
    embedding: Vec<f32>,
}

#[async_trait]
impl ProviderAdapter for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::full()
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn is_available(&self) -> bool {
        let Some(api_key) = self.api_key.as_deref() else {
            return false;
        };
        if !self.probe {
            return true;
        }
        match self.probe_models(api_key).await {
            Ok(()) => true,
            Err(e) => {
                warn!(provider = "openai", error = %e, "provider unreachable");
                false
            }
        }
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse> {
        let api_key = self.key()?;
        info!(
            provider = "openai",
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
            "openai",
        )
        .await?;

        info!(
            provider = "openai",
            prompt_tokens = output.usage.prompt_tokens,
            completion_tokens = output.usage.completion_tokens,
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

    async fn embed(&self, request: &EmbeddingRequest) -> Result<EmbeddingResponse> {
        let api_key = self.key()?;
        let model = request.model.as_deref().unwrap_or(&self.embedding_model);
        info!(
            provider = "openai",
            model,
            text_length = request.text.len(),
            "embedding request"
        );

        let response = self
            .http
            .post(format!("{}/embeddings", self.base_url))
            .bearer_auth(api_key)
            .json(&EmbedBody {
                model,
                input: &request.text,
            })
            .send()
            .await?;
        let response = check_status(response, "openai").await?;

        let reply: EmbedReply = response.json().await?;
        let embedding = reply
            .data
            .into_iter()
            .next()
            .ok_or(HeimdallError::EmptyResponse)?
            .embedding;

        info!(
            provider = "openai",
            dimensions = embedding.len(),
            "embedding response"
        );

        Ok(EmbeddingResponse::new(embedding, model))
    }
}
