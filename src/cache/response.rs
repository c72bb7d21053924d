//! Fingerprint-keyed response cache.
//!
//! [`ResponseCache`] sits in front of the provider registry inside the
//! [`Gateway`](crate::Gateway). A hit bypasses provider selection entirely;
//! a miss falls through to the registry and the result is written back.
//!
//! # Keys
//!
//! ```text
//! <namespace>:<tag>:<first 16 hex chars of sha256(canonical JSON of fields)>
//! ```
//!
//! Canonical JSON sorts object keys recursively, so field order never
//! changes a fingerprint. The same fields always produce the same key,
//! across processes, which makes the keys safe for a shared Redis store.
//!
//! # Failure model
//!
//! The cache never fails a request. Store errors and undecodable payloads
//! read as misses; failed writes are logged and dropped.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use super::store::CacheStore;
use crate::telemetry;

/// Hex characters of the digest kept in a key.
const FINGERPRINT_LEN: usize = 16;

/// Configuration for the response cache.
///
/// ```rust
/// # use heimdall::CacheConfig;
/// # use std::time::Duration;
/// let config = CacheConfig::new()
///     .namespace("ai")
///     .max_entries(10_000)
///     .ttl(Duration::from_secs(3600));
/// ```
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Prefix for every key. Default: "ai".
    pub namespace: String,
    /// Maximum entries for the in-memory store. Default: 10,000.
    pub max_entries: u64,
    /// Time-to-live for cached entries. Default: 1 hour.
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            namespace: "ai".to_string(),
            max_entries: 10_000,
            ttl: Duration::from_secs(3600),
        }
    }
}

impl CacheConfig {
    /// Create a new config with sensible defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the key namespace.
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Set the maximum number of cached entries.
    pub fn max_entries(mut self, n: u64) -> Self {
        self.max_entries = n;
        self
    }

    /// Set the time-to-live for cached entries.
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

/// Response cache over an optional [`CacheStore`].
///
/// Without a store every lookup misses and every write is a no-op.
pub struct ResponseCache {
    config: CacheConfig,
    store: Option<Arc<dyn CacheStore>>,
}

impl ResponseCache {
    /// Create a cache over `store`; `None` disables caching.
    pub fn new(config: CacheConfig, store: Option<Arc<dyn CacheStore>>) -> Self {
        Self { config, store }
    }

    /// A cache with no store.
    pub fn disabled() -> Self {
        Self::new(CacheConfig::default(), None)
    }

    /// Whether a store is attached.
    pub fn is_connected(&self) -> bool {
        self.store.is_some()
    }

    /// Namespace, capacity and TTL in use.
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Deterministic key for `fields` under `tag`.
    pub fn fingerprint(&self, tag: &str, fields: &Value) -> String {
        fingerprint(&self.config.namespace, tag, fields)
    }

    /// Look up a cached value.
    ///
    /// Store errors and undecodable payloads are misses.
    pub async fn get<T: DeserializeOwned>(&self, tag: &'static str, fields: &Value) -> Option<T> {
        let store = self.store.as_ref()?;
        let key = self.fingerprint(tag, fields);

        let bytes = match store.get(&key).await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                metrics::counter!(telemetry::CACHE_MISSES_TOTAL, "operation" => tag).increment(1);
                return None;
            }
            Err(e) => {
                warn!(key = %key, error = %e, "cache read failed");
                Self::record_error("get");
                metrics::counter!(telemetry::CACHE_MISSES_TOTAL, "operation" => tag).increment(1);
                return None;
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(value) => {
                debug!(key = %key, "cache hit");
                metrics::counter!(telemetry::CACHE_HITS_TOTAL, "operation" => tag).increment(1);
                Some(value)
            }
            Err(e) => {
                warn!(key = %key, error = %e, "cached payload undecodable");
                metrics::counter!(telemetry::CACHE_MISSES_TOTAL, "operation" => tag).increment(1);
                None
            }
        }
    }

    /// Store a value; returns whether the write succeeded.
    pub async fn set<T: Serialize>(&self, tag: &str, fields: &Value, value: &T) -> bool {
        let Some(store) = self.store.as_ref() else {
            return false;
        };
        let key = self.fingerprint(tag, fields);

        let payload = match serde_json::to_vec(value) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(key = %key, error = %e, "cache payload unencodable");
                return false;
            }
        };

        match store.set(&key, payload, self.config.ttl).await {
            Ok(()) => true,
            Err(e) => {
                warn!(key = %key, error = %e, "cache write failed");
                Self::record_error("set");
                false
            }
        }
    }

    /// Remove a single entry; returns whether the delete succeeded.
    pub async fn invalidate(&self, tag: &str, fields: &Value) -> bool {
        let Some(store) = self.store.as_ref() else {
            return false;
        };
        let key = self.fingerprint(tag, fields);
        match store.delete(&key).await {
            Ok(()) => true,
            Err(e) => {
                warn!(key = %key, error = %e, "cache delete failed");
                Self::record_error("delete");
                false
            }
        }
    }

    /// Remove every entry under `tag`, or the whole namespace with `None`.
    ///
    /// Returns the number of keys deleted.
    pub async fn clear(&self, tag: Option<&str>) -> usize {
        let Some(store) = self.store.as_ref() else {
            return 0;
        };
        let prefix = match tag {
            Some(tag) => format!("{}:{}:", self.config.namespace, tag),
            None => format!("{}:", self.config.namespace),
        };

        let keys = match store.scan_keys(&prefix).await {
            Ok(keys) => keys,
            Err(e) => {
                warn!(prefix = %prefix, error = %e, "cache scan failed");
                Self::record_error("scan");
                return 0;
            }
        };

        let mut deleted = 0;
        for key in &keys {
            match store.delete(key).await {
                Ok(()) => deleted += 1,
                Err(e) => {
                    warn!(key = %key, error = %e, "cache delete failed");
                    Self::record_error("delete");
                }
            }
        }
        debug!(prefix = %prefix, deleted, "cache cleared");
        deleted
    }

    fn record_error(operation: &'static str) {
        metrics::counter!(telemetry::CACHE_ERRORS_TOTAL, "operation" => operation).increment(1);
    }
}

/// Compute `<namespace>:<tag>:<hash>` for a set of fields.
pub fn fingerprint(namespace: &str, tag: &str, fields: &Value) -> String {
    let mut canonical = String::new();
    write_canonical(fields, &mut canonical);

    let digest = format!("{:x}", Sha256::digest(canonical.as_bytes()));
    format!("{namespace}:{tag}:{}", &digest[..FINGERPRINT_LEN])
}

/// Serialize `value` with object keys sorted at every depth.
fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<_> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            out.push('{');
            for (i, (key, value)) in entries.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&Value::String(key.clone()).to_string());
                out.push(':');
                write_canonical(value, out);
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        scalar => out.push_str(&scalar.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn fingerprint_deterministic() {
        let k1 = fingerprint("ai", "embedding", &json!({"text": "hello", "model": "m"}));
        let k2 = fingerprint("ai", "embedding", &json!({"text": "hello", "model": "m"}));
        assert_eq!(k1, k2);
    }

    #[test]
    fn fingerprint_shape() {
        let key = fingerprint("ai", "completion", &json!({"a": 1}));
        let parts: Vec<_> = key.splitn(3, ':').collect();
        assert_eq!(parts[0], "ai");
        assert_eq!(parts[1], "completion");
        assert_eq!(parts[2].len(), FINGERPRINT_LEN);
        assert!(parts[2].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn fingerprint_ignores_key_order() {
        let a: Value = serde_json::from_str(r#"{"b":{"y":1,"x":2},"a":[1,2]}"#).unwrap();
        let b: Value = serde_json::from_str(r#"{"a":[1,2],"b":{"x":2,"y":1}}"#).unwrap();
        assert_eq!(fingerprint("ai", "t", &a), fingerprint("ai", "t", &b));
    }

    #[test]
    fn fingerprint_differs_on_tag_and_fields() {
        let fields = json!({"text": "hello"});
        assert_ne!(
            fingerprint("ai", "embedding", &fields),
            fingerprint("ai", "completion", &fields)
        );
        assert_ne!(
            fingerprint("ai", "embedding", &fields),
            fingerprint("ai", "embedding", &json!({"text": "world"}))
        );
    }

    #[test]
    fn array_order_matters() {
        assert_ne!(
            fingerprint("ai", "t", &json!([1, 2])),
            fingerprint("ai", "t", &json!([2, 1]))
        );
    }

    #[tokio::test]
    async fn disabled_cache_misses_and_drops_writes() {
        let cache = ResponseCache::disabled();
        let fields = json!({"k": "v"});
        assert!(!cache.is_connected());
        assert!(!cache.set("t", &fields, &"value").await);
        assert_eq!(cache.get::<String>("t", &fields).await, None);
        assert_eq!(cache.clear(None).await, 0);
    }
}
