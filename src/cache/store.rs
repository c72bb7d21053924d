//! Key-value backends behind the response cache.
//!
//! [`CacheStore`] is the seam between [`ResponseCache`](super::ResponseCache)
//! and where bytes actually live. Two implementations ship:
//!
//! - [`MemoryStore`]: per-process moka cache, bounded, per-entry TTL
//! - [`RedisStore`](super::RedisStore): shared across processes (feature `redis`)

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::Expiry;
use moka::future::Cache;

use crate::Result;

/// Async key-value store with per-key expiry.
///
/// Errors are returned, not swallowed; the response cache decides how to
/// degrade.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Fetch raw bytes for `key`, `None` if absent or expired.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Store bytes under `key`, expiring after `ttl`.
    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<()>;

    /// Remove `key` if present.
    async fn delete(&self, key: &str) -> Result<()>;

    /// All live keys starting with `prefix`.
    async fn scan_keys(&self, prefix: &str) -> Result<Vec<String>>;
}

/// A stored payload with its own lifetime.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    key: String,
    payload: Arc<[u8]>,
    ttl: Duration,
    created_at: Instant,
}

impl CacheEntry {
    /// Wrap `payload`, starting its lifetime now.
    pub fn new(key: impl Into<String>, payload: Vec<u8>, ttl: Duration) -> Self {
        Self {
            key: key.into(),
            payload: payload.into(),
            ttl,
            created_at: Instant::now(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Whether the TTL has run out, independent of store eviction.
    pub fn is_expired(&self) -> bool {
        self.created_at.elapsed() >= self.ttl
    }
}

struct EntryExpiry;

impl Expiry<String, CacheEntry> for EntryExpiry {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &CacheEntry,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl())
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &CacheEntry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl())
    }
}

/// In-process store backed by moka.
///
/// Bounded LRU with per-entry TTL. Not shared between processes.
pub struct MemoryStore {
    entries: Cache<String, CacheEntry>,
}

impl MemoryStore {
    /// Create a store holding at most `max_entries` entries.
    pub fn new(max_entries: u64) -> Self {
        let entries = Cache::builder()
            .max_capacity(max_entries)
            .expire_after(EntryExpiry)
            .build();
        Self { entries }
    }
}

#[async_trait]
impl CacheStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self
            .entries
            .get(key)
            .await
            .filter(|e| !e.is_expired())
            .map(|e| e.payload().to_vec()))
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<()> {
        let entry = CacheEntry::new(key, value, ttl);
        self.entries.insert(entry.key().to_string(), entry).await;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.entries.invalidate(key).await;
        Ok(())
    }

    async fn scan_keys(&self, prefix: &str) -> Result<Vec<String>> {
        Ok(self
            .entries
            .iter()
            .filter(|(key, entry)| key.starts_with(prefix) && !entry.is_expired())
            .map(|(key, _)| key.to_string())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_accessors_and_expiry() {
        let entry = CacheEntry::new("ai:t:1", b"payload".to_vec(), Duration::from_secs(60));
        assert_eq!(entry.key(), "ai:t:1");
        assert_eq!(entry.payload(), b"payload");
        assert_eq!(entry.ttl(), Duration::from_secs(60));
        assert!(!entry.is_expired());
        assert!(CacheEntry::new("k", vec![], Duration::ZERO).is_expired());
    }

    #[tokio::test]
    async fn set_then_get() {
        let store = MemoryStore::new(16);
        store
            .set("ai:t:1", b"hello".to_vec(), Duration::from_secs(60))
            .await
            .unwrap();
        assert_eq!(store.get("ai:t:1").await.unwrap(), Some(b"hello".to_vec()));
        assert_eq!(store.get("ai:t:2").await.unwrap(), None);
    }

    #[tokio::test]
    async fn entries_expire_individually() {
        let store = MemoryStore::new(16);
        store
            .set("short", b"a".to_vec(), Duration::from_millis(50))
            .await
            .unwrap();
        store
            .set("long", b"b".to_vec(), Duration::from_secs(60))
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(150)).await;

        assert_eq!(store.get("short").await.unwrap(), None);
        assert_eq!(store.get("long").await.unwrap(), Some(b"b".to_vec()));
    }

    #[tokio::test]
    async fn scan_and_delete() {
        let store = MemoryStore::new(16);
        let ttl = Duration::from_secs(60);
        store.set("ai:a:1", vec![1], ttl).await.unwrap();
        store.set("ai:a:2", vec![2], ttl).await.unwrap();
        store.set("ai:b:1", vec![3], ttl).await.unwrap();

        let mut keys = store.scan_keys("ai:a:").await.unwrap();
        keys.sort();
        assert_eq!(keys, vec!["ai:a:1", "ai:a:2"]);

        store.delete("ai:a:1").await.unwrap();
        assert_eq!(store.get("ai:a:1").await.unwrap(), None);
        assert_eq!(store.scan_keys("ai:a:").await.unwrap(), vec!["ai:a:2"]);
    }
}
