//! Builder for configuring gateway instances

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use super::Gateway;
use crate::cache::{CacheConfig, CacheStore, MemoryStore, ResponseCache};
use crate::config::{BackendSettings, Config, OpenAiSettings, Secrets};
use crate::providers::{
    AnthropicProvider, DEFAULT_PRIORITY, GroqProvider, OpenAiProvider, ProviderAdapter,
    ProviderRegistry, build_client,
};
use crate::Result;

/// Main entry point for creating gateway instances.
pub struct Heimdall;

impl Heimdall {
    /// Create a new builder for configuring the gateway.
    pub fn builder() -> HeimdallBuilder {
        HeimdallBuilder::new()
    }
}

/// Which cache the gateway gets.
enum CacheChoice {
    None,
    Memory,
    Store(Arc<dyn CacheStore>),
}

/// Builder for configuring gateway instances.
///
/// The three built-in adapters are always registered; an adapter without
/// a key reports itself unavailable and is never called.
pub struct HeimdallBuilder {
    openai_key: Option<String>,
    anthropic_key: Option<String>,
    groq_key: Option<String>,
    openai: OpenAiSettings,
    anthropic: BackendSettings,
    groq: BackendSettings,
    extra_adapters: Vec<Arc<dyn ProviderAdapter>>,
    priority: Option<Vec<String>>,
    cache: CacheChoice,
    cache_config: CacheConfig,
    timeout: Option<Duration>,
}

impl HeimdallBuilder {
    pub fn new() -> Self {
        Self {
            openai_key: None,
            anthropic_key: None,
            groq_key: None,
            openai: OpenAiSettings::default(),
            anthropic: BackendSettings::default(),
            groq: BackendSettings::default(),
            extra_adapters: Vec::new(),
            priority: None,
            cache: CacheChoice::None,
            cache_config: CacheConfig::default(),
            timeout: None,
        }
    }

    /// Configure the OpenAI adapter (completion and embeddings).
    pub fn openai(mut self, api_key: impl Into<String>) -> Self {
        self.openai_key = Some(api_key.into());
        self
    }

    /// Configure the Anthropic adapter.
    pub fn anthropic(mut self, api_key: impl Into<String>) -> Self {
        self.anthropic_key = Some(api_key.into());
        self
    }

    /// Configure the Groq adapter.
    pub fn groq(mut self, api_key: impl Into<String>) -> Self {
        self.groq_key = Some(api_key.into());
        self
    }

    /// Override OpenAI model, base URL and availability probing.
    pub fn openai_settings(mut self, settings: OpenAiSettings) -> Self {
        self.openai = settings;
        self
    }

    /// Override Anthropic model and base URL.
    pub fn anthropic_settings(mut self, settings: BackendSettings) -> Self {
        self.anthropic = settings;
        self
    }

    /// Override Groq model and base URL.
    pub fn groq_settings(mut self, settings: BackendSettings) -> Self {
        self.groq = settings;
        self
    }

    /// Register an additional adapter.
    ///
    /// Without an explicit [`priority`](Self::priority), extra adapters
    /// rank after the built-in ones, in the order they were added.
    pub fn adapter(mut self, adapter: Arc<dyn ProviderAdapter>) -> Self {
        self.extra_adapters.push(adapter);
        self
    }

    /// Set the fallback order by provider name.
    pub fn priority<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.priority = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Cache responses in process memory.
    pub fn memory_cache(mut self) -> Self {
        self.cache = CacheChoice::Memory;
        self
    }

    /// Cache responses in the given store.
    pub fn cache_store(mut self, store: Arc<dyn CacheStore>) -> Self {
        self.cache = CacheChoice::Store(store);
        self
    }

    /// Set cache namespace, TTL and in-memory capacity.
    pub fn cache_config(mut self, config: CacheConfig) -> Self {
        self.cache_config = config;
        self
    }

    /// Set a timeout for every HTTP request to a backend.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Configure a builder from loaded config and secrets.
    ///
    /// Connects to Redis when `cache.redis_url` is set; a failed connection
    /// is logged and the gateway runs without a cache.
    pub async fn from_config(config: &Config, secrets: &Secrets) -> Self {
        let mut builder = Self::new()
            .openai_settings(config.providers.openai.clone())
            .anthropic_settings(config.providers.anthropic.clone())
            .groq_settings(config.providers.groq.clone())
            .priority(config.providers.priority.clone())
            .cache_config(config.cache.cache_config());

        builder.openai_key = secrets.api_key("openai");
        builder.anthropic_key = secrets.api_key("anthropic");
        builder.groq_key = secrets.api_key("groq");

        if let Some(secs) = config.limits.http_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        if !config.cache.enabled {
            return builder;
        }

        match config.cache.redis_url.as_deref() {
            Some(url) => builder.redis_cache(url).await,
            None => builder.memory_cache(),
        }
    }

    #[cfg(feature = "redis")]
    async fn redis_cache(self, url: &str) -> Self {
        match crate::cache::RedisStore::connect(url).await {
            Ok(store) => self.cache_store(Arc::new(store)),
            Err(e) => {
                warn!(error = %e, "redis unavailable, continuing without cache");
                self
            }
        }
    }

    #[cfg(not(feature = "redis"))]
    async fn redis_cache(self, _url: &str) -> Self {
        warn!("redis support not compiled in, using in-memory cache");
        self.memory_cache()
    }

    /// Build the gateway.
    pub fn build(self) -> Result<Gateway> {
        let http = build_client(self.timeout)?;

        let mut openai = OpenAiProvider::new(self.openai_key, http.clone())
            .probe_availability(self.openai.probe_availability);
        if let Some(url) = self.openai.base_url {
            openai = openai.with_base_url(url);
        }
        if let Some(model) = self.openai.model {
            openai = openai.model(model);
        }
        if let Some(model) = self.openai.embedding_model {
            openai = openai.embedding_model(model);
        }

        let mut anthropic = AnthropicProvider::new(self.anthropic_key, http.clone());
        if let Some(url) = self.anthropic.base_url {
            anthropic = anthropic.with_base_url(url);
        }
        if let Some(model) = self.anthropic.model {
            anthropic = anthropic.model(model);
        }

        let mut groq = GroqProvider::new(self.groq_key, http);
        if let Some(url) = self.groq.base_url {
            groq = groq.with_base_url(url);
        }
        if let Some(model) = self.groq.model {
            groq = groq.model(model);
        }

        let priority = self.priority.unwrap_or_else(|| {
            DEFAULT_PRIORITY
                .iter()
                .map(|s| s.to_string())
                .chain(self.extra_adapters.iter().map(|a| a.name().to_string()))
                .collect()
        });

        let mut pool: Vec<Arc<dyn ProviderAdapter>> =
            vec![Arc::new(openai), Arc::new(anthropic), Arc::new(groq)];
        // later registrations shadow built-ins of the same name
        for adapter in self.extra_adapters {
            pool.retain(|p| p.name() != adapter.name());
            pool.push(adapter);
        }
        let registry = ProviderRegistry::with_priority(pool, &priority);

        let store: Option<Arc<dyn CacheStore>> = match self.cache {
            CacheChoice::None => None,
            CacheChoice::Memory => Some(Arc::new(MemoryStore::new(self.cache_config.max_entries))),
            CacheChoice::Store(store) => Some(store),
        };
        let cache = ResponseCache::new(self.cache_config, store);

        info!(
            providers = registry.len(),
            cache = cache.is_connected(),
            "gateway initialized"
        );
        Ok(Gateway::new(registry, cache))
    }
}

impl Default for HeimdallBuilder {
    fn default() -> Self {
        Self::new()
    }
}
