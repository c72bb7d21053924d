//! Heimdall error types

use std::time::Duration;

/// Heimdall error types
#[derive(Debug, thiserror::Error)]
pub enum HeimdallError {
    // Provider/network errors
    #[error("transport error: {0}")]
    Transport(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Option<Duration> },

    #[error("authentication failed")]
    Unauthenticated,

    #[error("empty response from provider")]
    EmptyResponse,

    // Capability errors
    /// The adapter cannot perform this operation at all.
    /// The registry skips it rather than counting it as a failure.
    #[error("provider does not support {0}")]
    CapabilityUnsupported(&'static str),

    /// No registered adapter carries the embedding capability.
    #[error("embedding not supported by any configured provider")]
    EmbeddingUnsupported,

    /// Every candidate adapter was unavailable or failed.
    #[error("no AI provider available")]
    NoProviderAvailable,

    // Configuration errors
    #[error("configuration error: {0}")]
    Configuration(String),

    // Cache store errors (never surfaced by the gateway)
    #[error("cache error: {0}")]
    Cache(String),

    // Data errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl HeimdallError {
    /// Whether this error is local to a single adapter, so the registry
    /// should move on to the next one in the chain.
    pub fn is_fallback_trigger(&self) -> bool {
        matches!(
            self,
            HeimdallError::Transport(_)
                | HeimdallError::Api { .. }
                | HeimdallError::RateLimited { .. }
                | HeimdallError::Unauthenticated
                | HeimdallError::EmptyResponse
                | HeimdallError::Configuration(_)
                | HeimdallError::Json(_)
        )
    }

    /// Whether the caller should present this as "service unavailable".
    pub fn is_unavailable(&self) -> bool {
        matches!(self, HeimdallError::NoProviderAvailable)
    }

    /// Provider-suggested delay from a `RateLimited` error, if any.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            HeimdallError::RateLimited { retry_after } => *retry_after,
            _ => None,
        }
    }
}

impl From<reqwest::Error> for HeimdallError {
    fn from(err: reqwest::Error) -> Self {
        HeimdallError::Transport(err.to_string())
    }
}

#[cfg(feature = "redis")]
impl From<redis::RedisError> for HeimdallError {
    fn from(err: redis::RedisError) -> Self {
        HeimdallError::Cache(err.to_string())
    }
}

/// Result type alias for Heimdall operations
pub type Result<T> = std::result::Result<T, HeimdallError>;
