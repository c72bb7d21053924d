//! Provider adapters and the fallback registry.
//!
//! Every backend implements [`ProviderAdapter`]. The [`ProviderRegistry`]
//! holds them in priority order and walks the chain for each request.

mod http;
mod openai_compat;

pub mod anthropic;
pub mod groq;
pub mod openai;
pub mod registry;
pub mod traits;

pub use anthropic::AnthropicProvider;
pub use groq::GroqProvider;
pub use http::build_client;
pub use openai::OpenAiProvider;
pub use registry::{DEFAULT_PRIORITY, ProviderRegistry};
pub use traits::ProviderAdapter;
