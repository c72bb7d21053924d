//! Heimdall - AI provider gateway with fallback and response caching
//!
//! Routes completion and embedding requests to OpenAI, Anthropic or Groq
//! under a deterministic priority order, falling back to the next backend
//! when one is unavailable or fails. Responses are cached under a content
//! fingerprint so identical paid calls are not repeated.
//!
//! # Completion Example
//!
//! ```rust,no_run
//! use heimdall::{CompletionRequest, Heimdall, Message};
//!
//! #[tokio::main]
//! async fn main() -> heimdall::Result<()> {
//!     let gateway = Heimdall::builder()
//!         .openai("sk-your-key")
//!         .anthropic("sk-ant-your-key")
//!         .memory_cache()
//!         .build()?;
//!
//!     let request = CompletionRequest::new(vec![
//!         Message::system("You are a helpful assistant."),
//!         Message::user("What is the capital of France?"),
//!     ]);
//!     let response = gateway.complete(&request, Some("anthropic")).await?;
//!
//!     println!("{} (via {})", response.content, response.provider);
//!     Ok(())
//! }
//! ```
//!
//! # Semantic Search Example
//!
//! ```rust,no_run
//! use heimdall::Heimdall;
//!
//! #[tokio::main]
//! async fn main() -> heimdall::Result<()> {
//!     let gateway = Heimdall::builder().openai("sk-your-key").build()?;
//!
//!     let candidates = vec![vec![0.1, 0.9, 0.0], vec![0.8, 0.1, 0.1]];
//!     let found = gateway.semantic_search("rust developer", &candidates, 1).await?;
//!
//!     println!("best match: {}", found.results[0].index);
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod config;
pub mod drafting;
pub mod error;
pub mod extract;
pub mod gateway;
pub mod providers;
pub mod similarity;
pub mod telemetry;
pub mod types;
pub mod version;

// Re-export main types at crate root
pub use cache::{CacheConfig, CacheStore, MemoryStore, ResponseCache};
#[cfg(feature = "redis")]
pub use cache::RedisStore;
pub use config::{Config, Secrets};
pub use drafting::{CoverLetter, CoverLetterRequest, JobDraft, JobDraftRequest};
pub use error::{HeimdallError, Result};
pub use gateway::{Gateway, Health, Heimdall, HeimdallBuilder, SearchResults};
pub use providers::{ProviderAdapter, ProviderRegistry};
pub use similarity::{Scored, cosine_similarity, rank};

// Re-export all types
pub use types::{
    Cached, Capabilities, Capability, CompletionRequest, CompletionResponse, EmbeddingRequest,
    EmbeddingResponse, Message, ProviderDescriptor, ProviderStatus, Role, Usage,
};
