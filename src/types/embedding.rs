//! Embedding request/response types

use serde::{Deserialize, Serialize};

use crate::{HeimdallError, Result};

/// Request for a text embedding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingRequest {
    pub text: String,
    /// Overrides the adapter's default embedding model.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl EmbeddingRequest {
    /// Embed `text` with the adapter's default model.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            model: None,
        }
    }

    /// Use a specific embedding model.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Reject empty text.
    pub fn validate(&self) -> Result<()> {
        if self.text.is_empty() {
            return Err(HeimdallError::InvalidInput(
                "text must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Embedding result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingResponse {
    pub embedding: Vec<f32>,
    pub model: String,
    pub dimensions: usize,
}

impl EmbeddingResponse {
    /// Build a response; `dimensions` always matches the vector length.
    pub fn new(embedding: Vec<f32>, model: impl Into<String>) -> Self {
        Self {
            dimensions: embedding.len(),
            embedding,
            model: model.into(),
        }
    }
}
