//! Caching subsystem.
//!
//! - [`ResponseCache`]: fingerprint-keyed cache for completions, embeddings
//!   and structured drafts. Consulted by the gateway before any provider
//!   is asked. See [`response`] module docs for the key format.
//!
//! - [`CacheStore`]: the byte-level backend. [`MemoryStore`] keeps entries
//!   in-process; [`RedisStore`] (feature `redis`) shares them between
//!   processes.
//!
//! - [`keys`]: tag names and the request fields each tag fingerprints.

pub mod keys;
#[cfg(feature = "redis")]
mod redis_store;
pub mod response;
pub mod store;

#[cfg(feature = "redis")]
pub use redis_store::RedisStore;
pub use response::{CacheConfig, ResponseCache, fingerprint};
pub use store::{CacheEntry, CacheStore, MemoryStore};
