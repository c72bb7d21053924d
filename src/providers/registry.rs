//! Provider registry with fallback chain semantics.
//!
//! The `ProviderRegistry` stores adapters in priority order (index 0 = highest).
//! When an operation is requested, it tries adapters in order until one
//! succeeds or the chain is exhausted.
//!
//! # Fallback Triggers
//!
//! The registry moves on to the next adapter when:
//! - the adapter reports itself unavailable (it is never called)
//! - the adapter lacks the capability (it is never called)
//! - the call fails with an adapter-local error (auth, transport, rate limit)
//!
//! Attempts are strictly sequential so a request is billed at most once
//! per adapter, and no adapter is tried twice within one request.
//!
//! # Fallback Chain Flow
//!
//! ```text
//! User: gateway.complete(request, Some("groq"))
//!                     │
//!                     ▼
//!         ┌─────────────────────┐
//!         │  preferred: groq    │ ──► available? attempt once
//!         └─────────┬───────────┘
//!                   │ failed / unavailable
//!                   ▼
//!         ┌─────────────────────┐
//!         │  openai (prio 0)    │ ──► available? attempt
//!         └─────────┬───────────┘
//!                   │ failed
//!                   ▼
//!         ┌─────────────────────┐
//!         │  anthropic (prio 1) │ ──► returns response (provider = "anthropic")
//!         └─────────────────────┘
//! ```

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, error, instrument, warn};

use crate::telemetry;

use super::traits::ProviderAdapter;
use crate::types::{
    Capability, CompletionRequest, CompletionResponse, EmbeddingRequest, EmbeddingResponse,
    ProviderDescriptor, ProviderStatus, Usage,
};
use crate::{HeimdallError, Result};

/// Default fallback priority.
pub const DEFAULT_PRIORITY: [&str; 3] = ["openai", "anthropic", "groq"];

/// Registry of adapters with fallback chain semantics.
///
/// Built once at startup and read-only afterwards. Adapters are stored in
/// priority order (index 0 = highest priority).
#[derive(Default)]
pub struct ProviderRegistry {
    providers: Vec<Arc<dyn ProviderAdapter>>,
    descriptors: Vec<ProviderDescriptor>,
}

/// Result of a single adapter attempt.
enum Attempt<T> {
    Done(T),
    Skipped,
    Failed,
}

impl ProviderRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Registration (appends to end = lowest priority)
    // ========================================================================

    /// Add an adapter at the end of the chain.
    pub fn add(&mut self, provider: Arc<dyn ProviderAdapter>) {
        self.descriptors.push(provider.descriptor());
        self.providers.push(provider);
    }

    /// Build a registry ordered by `priority` from a pool of adapters.
    ///
    /// Names in `priority` without a matching adapter are ignored with a
    /// warning; adapters not named in `priority` are not registered.
    pub fn with_priority(pool: Vec<Arc<dyn ProviderAdapter>>, priority: &[String]) -> Self {
        let mut registry = Self::new();
        for name in priority {
            if registry.position(name).is_some() {
                continue;
            }
            match pool.iter().find(|p| p.name() == name) {
                Some(provider) => registry.add(Arc::clone(provider)),
                None => warn!(provider = %name, "unknown provider in priority list"),
            }
        }
        registry
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.providers.iter().position(|p| p.name() == name)
    }

    // ========================================================================
    // Fallback chain execution
    // ========================================================================

    /// Completion using the preferred adapter first, then the priority list.
    #[instrument(skip(self, request), fields(operation = "complete", preferred = preferred.unwrap_or("")))]
    pub async fn complete(
        &self,
        request: &CompletionRequest,
        preferred: Option<&str>,
    ) -> Result<CompletionResponse> {
        let mut attempted = None;

        if let Some(name) = preferred {
            match self.position(name) {
                Some(index) => {
                    let provider = &self.providers[index];
                    if provider.capabilities().supports(Capability::Completion)
                        && provider.is_available().await
                    {
                        attempted = Some(index);
                        if let Attempt::Done(response) =
                            Self::try_complete(provider.as_ref(), request).await?
                        {
                            return Ok(response);
                        }
                    } else {
                        debug!(provider = name, "preferred provider unavailable");
                    }
                }
                None => warn!(provider = name, "preferred provider not registered"),
            }
        }

        for (index, provider) in self.providers.iter().enumerate() {
            if attempted == Some(index)
                || !provider.capabilities().supports(Capability::Completion)
                || !provider.is_available().await
            {
                continue;
            }
            if let Attempt::Done(response) = Self::try_complete(provider.as_ref(), request).await? {
                return Ok(response);
            }
        }

        error!(operation = "complete", "no available providers");
        Err(HeimdallError::NoProviderAvailable)
    }

    /// Embedding using the first available embedding-capable adapter.
    ///
    /// Adapters without the embedding capability are skipped without being
    /// asked for availability or called.
    #[instrument(skip(self, request), fields(operation = "embed"))]
    pub async fn embed(&self, request: &EmbeddingRequest) -> Result<EmbeddingResponse> {
        if !self.has_embedding() {
            error!(operation = "embed", "no embedding providers configured");
            return Err(HeimdallError::EmbeddingUnsupported);
        }

        for provider in &self.providers {
            if !provider.capabilities().supports(Capability::Embedding)
                || !provider.is_available().await
            {
                continue;
            }
            if let Attempt::Done(response) = Self::try_embed(provider.as_ref(), request).await? {
                return Ok(response);
            }
        }

        error!(operation = "embed", "no available embedding providers");
        Err(HeimdallError::NoProviderAvailable)
    }

    async fn try_complete(
        provider: &dyn ProviderAdapter,
        request: &CompletionRequest,
    ) -> Result<Attempt<CompletionResponse>> {
        let start = Instant::now();
        let outcome = provider.complete(request).await;
        let attempt = Self::settle("complete", provider.name(), start, outcome)?;
        if let Attempt::Done(ref response) = attempt {
            Self::record_token_usage(provider.name(), &response.usage);
        }
        Ok(attempt)
    }

    async fn try_embed(
        provider: &dyn ProviderAdapter,
        request: &EmbeddingRequest,
    ) -> Result<Attempt<EmbeddingResponse>> {
        let start = Instant::now();
        let outcome = provider.embed(request).await;
        Self::settle("embed", provider.name(), start, outcome)
    }

    /// Classify one adapter outcome.
    ///
    /// Adapter-local failures become `Failed` so the chain continues;
    /// anything else is terminal for the request.
    fn settle<T>(
        operation: &'static str,
        provider: &str,
        start: Instant,
        outcome: Result<T>,
    ) -> Result<Attempt<T>> {
        match outcome {
            Ok(value) => {
                Self::record_request(operation, provider, start, true);
                Ok(Attempt::Done(value))
            }
            Err(HeimdallError::CapabilityUnsupported(_)) => {
                debug!(provider, operation, "provider lacks capability, skipping");
                Ok(Attempt::Skipped)
            }
            Err(e) if e.is_fallback_trigger() => {
                warn!(provider, operation, error = %e, "provider failed, falling back");
                Self::record_request(operation, provider, start, false);
                metrics::counter!(telemetry::FALLBACKS_TOTAL,
                    "provider" => provider.to_owned(),
                    "operation" => operation,
                )
                .increment(1);
                Ok(Attempt::Failed)
            }
            Err(e) => {
                Self::record_request(operation, provider, start, false);
                Err(e)
            }
        }
    }

    // ========================================================================
    // Introspection
    // ========================================================================

    /// Check if any registered adapter can embed.
    pub fn has_embedding(&self) -> bool {
        self.descriptors.iter().any(|d| d.capabilities.embedding)
    }

    /// Number of registered adapters.
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Whether no adapters are registered.
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Construction-time snapshots, in priority order.
    pub fn descriptors(&self) -> &[ProviderDescriptor] {
        &self.descriptors
    }

    /// Which adapters initialized with credentials, in priority order.
    ///
    /// For observability only; says nothing about live availability.
    pub fn list_providers(&self) -> Vec<ProviderStatus> {
        self.descriptors
            .iter()
            .map(|d| ProviderStatus {
                name: d.name.clone(),
                initialized: d.configured,
            })
            .collect()
    }

    // ========================================================================
    // Metrics recording
    // ========================================================================

    /// Record request outcome metrics (counter + histogram).
    fn record_request(operation: &'static str, provider: &str, start: Instant, ok: bool) {
        let status = if ok { "ok" } else { "error" };
        let elapsed = start.elapsed().as_secs_f64();
        metrics::counter!(telemetry::REQUESTS_TOTAL,
            "provider" => provider.to_owned(),
            "operation" => operation,
            "status" => status,
        )
        .increment(1);
        metrics::histogram!(telemetry::REQUEST_DURATION_SECONDS,
            "provider" => provider.to_owned(),
            "operation" => operation,
        )
        .record(elapsed);
    }

    /// Record token usage metrics from a completion.
    fn record_token_usage(provider: &str, usage: &Usage) {
        metrics::counter!(telemetry::TOKENS_TOTAL,
            "provider" => provider.to_owned(),
            "direction" => "prompt",
        )
        .increment(u64::from(usage.prompt_tokens));
        metrics::counter!(telemetry::TOKENS_TOTAL,
            "provider" => provider.to_owned(),
            "direction" => "completion",
        )
        .increment(u64::from(usage.completion_tokens));
    }
}

// ============================================================================
// Tests
// ============================================================================
