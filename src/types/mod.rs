//! Public types for the Heimdall API.

mod capabilities;
mod embedding;
mod message;
mod provider;
mod response;

pub use capabilities::{Capabilities, Capability};
pub use embedding::{EmbeddingRequest, EmbeddingResponse};
pub use message::{Message, Role};
pub use provider::{Cached, ProviderDescriptor, ProviderStatus};
pub use response::{
    CompletionRequest, CompletionResponse, DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE, Usage,
};
