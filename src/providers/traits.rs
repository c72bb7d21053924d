//! The capability-tagged provider interface.
//!
//! Every backend implements one trait, [`ProviderAdapter`], and declares
//! what it can do through [`Capabilities`]. The registry reads that set
//! instead of relying on which traits a type happens to implement:
//! - adapters lacking a capability are skipped, never attempted
//! - `CapabilityUnsupported` is an expected outcome, not a failure
//! - availability is self-reported and never fails
//!
//! # Example
//!
//! ```ignore
//! #[async_trait]
//! impl ProviderAdapter for MyBackend {
//!     fn name(&self) -> &str { "my-backend" }
//!     fn capabilities(&self) -> Capabilities { Capabilities::completion_only() }
//!     fn is_configured(&self) -> bool { self.api_key.is_some() }
//!     async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse> {
//!         // ... call the backend
//!     }
//! }
//! ```

use async_trait::async_trait;

use crate::types::{
    Capabilities, CompletionRequest, CompletionResponse, EmbeddingRequest, EmbeddingResponse,
    ProviderDescriptor,
};
use crate::{HeimdallError, Result};

/// One backend behind the gateway.
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    /// Provider name used for priority lists, attribution and logging.
    fn name(&self) -> &str;

    /// Operations this adapter supports.
    fn capabilities(&self) -> Capabilities;

    /// Whether the credentials this adapter needs were present at construction.
    fn is_configured(&self) -> bool;

    /// Whether the adapter can take a request right now.
    ///
    /// Must not fail: problems are reported as `false`. The default is
    /// credential presence; adapters may add a cheap reachability probe.
    async fn is_available(&self) -> bool {
        self.is_configured()
    }

    /// Generate a completion.
    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse>;

    /// Generate an embedding.
    async fn embed(&self, _request: &EmbeddingRequest) -> Result<EmbeddingResponse> {
        Err(HeimdallError::CapabilityUnsupported("embed"))
    }

    /// Immutable snapshot for the registry.
    fn descriptor(&self) -> ProviderDescriptor {
        ProviderDescriptor {
            name: self.name().to_string(),
            capabilities: self.capabilities(),
            configured: self.is_configured(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
