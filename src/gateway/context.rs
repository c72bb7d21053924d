//! The gateway application context.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::cache::{ResponseCache, keys};
use crate::drafting::{CoverLetter, CoverLetterRequest, JobDraft, JobDraftRequest};
use crate::providers::ProviderRegistry;
use crate::similarity::{self, Scored};
use crate::types::{
    Cached, CompletionRequest, CompletionResponse, EmbeddingRequest, EmbeddingResponse,
    ProviderStatus,
};
use crate::version;
use crate::Result;

/// Ranked candidates plus the query vector they were ranked against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResults {
    pub results: Vec<Scored>,
    pub query_embedding: Vec<f32>,
}

/// Gateway health report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    pub status: String,
    pub version: String,
    pub providers: Vec<ProviderStatus>,
    pub cache_connected: bool,
}

/// Owns the provider registry and the response cache.
///
/// Built once by [`HeimdallBuilder`](super::HeimdallBuilder) and shared
/// by reference or `Arc`. Holds no per-request state.
pub struct Gateway {
    registry: ProviderRegistry,
    cache: ResponseCache,
}

impl Gateway {
    pub(crate) fn new(registry: ProviderRegistry, cache: ResponseCache) -> Self {
        Self { registry, cache }
    }

    /// The provider registry, in priority order.
    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    /// The response cache.
    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    /// Complete through the cache, then the fallback chain.
    ///
    /// `preferred` is tried first when available; it does not take part in
    /// the cache key.
    #[instrument(skip(self, request), fields(operation = "complete"))]
    pub async fn complete(
        &self,
        request: &CompletionRequest,
        preferred: Option<&str>,
    ) -> Result<Cached<CompletionResponse>> {
        request.validate()?;
        let fields = keys::completion_fields(request);

        if let Some(hit) = self.cache.get(keys::COMPLETION, &fields).await {
            return Ok(Cached::hit(hit));
        }

        let response = self.registry.complete(request, preferred).await?;
        self.cache.set(keys::COMPLETION, &fields, &response).await;
        Ok(Cached::fresh(response))
    }

    /// Embed through the cache, then the embedding-capable adapters.
    ///
    /// The cache key covers only the first 100 characters of the text, so
    /// texts sharing that prefix share an embedding.
    #[instrument(skip(self, request), fields(operation = "embed"))]
    pub async fn embed(&self, request: &EmbeddingRequest) -> Result<Cached<EmbeddingResponse>> {
        request.validate()?;
        let fields = keys::embedding_fields(request);

        if let Some(hit) = self.cache.get(keys::EMBEDDING, &fields).await {
            return Ok(Cached::hit(hit));
        }

        let response = self.registry.embed(request).await?;
        self.cache.set(keys::EMBEDDING, &fields, &response).await;
        Ok(Cached::fresh(response))
    }

    /// Rank candidate vectors against a query vector.
    pub fn rank(&self, query: &[f32], candidates: &[Vec<f32>], top_k: usize) -> Result<Vec<Scored>> {
        similarity::rank(query, candidates, top_k)
    }

    /// Embed `query`, then rank `candidates` against it.
    #[instrument(skip(self, query, candidates), fields(candidates = candidates.len()))]
    pub async fn semantic_search(
        &self,
        query: &str,
        candidates: &[Vec<f32>],
        top_k: usize,
    ) -> Result<SearchResults> {
        let embedding = self.embed(&EmbeddingRequest::new(query)).await?.into_inner();
        let results = similarity::rank(&embedding.embedding, candidates, top_k)?;
        debug!(results = results.len(), "semantic search ranked");
        Ok(SearchResults {
            results,
            query_embedding: embedding.embedding,
        })
    }

    /// Generate a structured job posting.
    #[instrument(skip(self, request), fields(operation = "job_draft"))]
    pub async fn job_draft(&self, request: &JobDraftRequest) -> Result<Cached<JobDraft>> {
        request.validate()?;
        let fields = request.cache_fields();

        if let Some(hit) = self.cache.get(keys::JOB_DRAFT, &fields).await {
            return Ok(Cached::hit(hit));
        }

        let response = self
            .registry
            .complete(&request.completion_request(), request.provider.as_deref())
            .await?;
        let draft = request.parse_reply(&response);
        self.cache.set(keys::JOB_DRAFT, &fields, &draft).await;
        Ok(Cached::fresh(draft))
    }

    /// Generate a structured cover letter.
    #[instrument(skip(self, request), fields(operation = "cover_letter"))]
    pub async fn cover_letter(&self, request: &CoverLetterRequest) -> Result<Cached<CoverLetter>> {
        request.validate()?;
        let fields = request.cache_fields();

        if let Some(hit) = self.cache.get(keys::COVER_LETTER, &fields).await {
            return Ok(Cached::hit(hit));
        }

        let response = self
            .registry
            .complete(&request.completion_request(), request.provider.as_deref())
            .await?;
        let letter = request.parse_reply(&response);
        self.cache.set(keys::COVER_LETTER, &fields, &letter).await;
        Ok(Cached::fresh(letter))
    }

    /// Which providers initialized with credentials, in priority order.
    pub fn list_providers(&self) -> Vec<ProviderStatus> {
        self.registry.list_providers()
    }

    /// Liveness report with provider and cache status.
    pub fn health(&self) -> Health {
        Health {
            status: "healthy".to_string(),
            version: version::version_string(),
            providers: self.list_providers(),
            cache_connected: self.cache.is_connected(),
        }
    }

    /// Delete cached entries under `tag`, or all of them with `None`.
    pub async fn clear_cache(&self, tag: Option<&str>) -> usize {
        let deleted = self.cache.clear(tag).await;
        info!(tag = tag.unwrap_or("*"), deleted, "cache cleared");
        deleted
    }

    /// Tear the gateway down, releasing the cache store.
    pub async fn shutdown(self) {
        info!(
            cache_connected = self.cache.is_connected(),
            "gateway shutting down"
        );
        drop(self);
    }
}
