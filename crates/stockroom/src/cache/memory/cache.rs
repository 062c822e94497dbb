//! In-memory cache implementation with LRU eviction.
//!
//! Provides a thread-safe in-memory cache with TTL support using tokio
//! synchronization primitives and an LRU eviction policy.
//!
//! Expiry is measured with `tokio::time::Instant`, so a paused test runtime
//! controls when entries expire.

use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use lru::LruCache;
use tokio::sync::RwLock;
use tokio::time::Instant;

use stockroom_core::cache::{pattern_matches, Cache, CacheError, Result};

/// A single cache entry with optional expiration.
#[derive(Debug, Clone)]
struct CacheEntry {
    value: Vec<u8>,
    expires_at: Option<Instant>,
}

impl CacheEntry {
    /// Creates a new cache entry with optional TTL.
    fn new(value: Vec<u8>, ttl: Option<Duration>) -> Self {
        let expires_at = ttl.map(|d| Instant::now() + d);
        Self { value, expires_at }
    }

    /// Returns true if this entry has expired.
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|exp| now >= exp)
    }
}

/// In-memory cache implementation with LRU eviction.
///
/// Thread-safe cache using `Arc<RwLock<LruCache>>` for concurrent access.
/// Expired entries are dropped lazily when they are read or swept by a
/// pattern deletion. LRU eviction bounds memory once `max_entries` is reached.
#[derive(Debug, Clone)]
pub struct MemoryCache {
    store: Arc<RwLock<LruCache<String, CacheEntry>>>,
}

impl MemoryCache {
    /// Creates a new in-memory cache holding at most `max_entries` entries.
    ///
    /// # Errors
    ///
    /// Returns `CacheError::InvalidConfig` if `max_entries` is 0.
    pub fn new(max_entries: usize) -> Result<Self> {
        let capacity = NonZeroUsize::new(max_entries).ok_or_else(|| {
            CacheError::InvalidConfig("max_entries must be > 0".to_string())
        })?;
        Ok(Self {
            store: Arc::new(RwLock::new(LruCache::new(capacity))),
        })
    }

    /// Number of entries currently held, expired ones included.
    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }
}

#[async_trait]
impl Cache for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        // LRU reads update recency, so even a get needs the write lock.
        let mut store = self.store.write().await;

        match store.get(key) {
            Some(entry) if !entry.is_expired(Instant::now()) => {
                return Ok(Some(entry.value.clone()))
            }
            Some(_) => {}
            None => return Ok(None),
        }

        store.pop(key);
        Ok(None)
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> Result<()> {
        let mut store = self.store.write().await;
        store.put(key.to_string(), CacheEntry::new(value.to_vec(), ttl));
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut store = self.store.write().await;
        store.pop(key);
        Ok(())
    }

    async fn delete_pattern(&self, pattern: &str) -> Result<u64> {
        let now = Instant::now();
        let mut store = self.store.write().await;

        let matching: Vec<(String, bool)> = store
            .iter()
            .filter(|(key, _)| pattern_matches(pattern, key))
            .map(|(key, entry)| (key.clone(), entry.is_expired(now)))
            .collect();

        let mut removed = 0;
        for (key, expired) in matching {
            store.pop(&key);
            if !expired {
                removed += 1;
            }
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockroom_core::cache::{composed_key, scope_pattern, slice_key, slice_pattern};
    use stockroom_core::dashboard::{Scope, Slice};
    use uuid::Uuid;

    /// Default max entries for tests
    const TEST_MAX_ENTRIES: usize = 1000;

    fn cache() -> MemoryCache {
        MemoryCache::new(TEST_MAX_ENTRIES).unwrap()
    }

    #[tokio::test]
    async fn test_set_and_get() {
        let cache = cache();
        let key = "test:key";
        let value = b"test value";

        cache.set(key, value, None).await.unwrap();
        let result = cache.get(key).await.unwrap();

        assert_eq!(result, Some(value.to_vec()));
    }

    #[tokio::test]
    async fn test_get_nonexistent() {
        let cache = cache();
        let result = cache.get("nonexistent:key").await.unwrap();

        assert_eq!(result, None);
    }

    #[tokio::test]
    async fn test_delete() {
        let cache = cache();
        let key = "test:delete";

        cache.set(key, b"to be deleted", None).await.unwrap();
        assert!(cache.get(key).await.unwrap().is_some());

        cache.delete(key).await.unwrap();
        assert!(cache.get(key).await.unwrap().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_ttl_expiration() {
        let cache = cache();
        let key = "test:ttl";

        cache
            .set(key, b"short-lived", Some(Duration::from_secs(60)))
            .await
            .unwrap();

        tokio::time::advance(Duration::from_secs(59)).await;
        assert!(cache.get(key).await.unwrap().is_some());

        tokio::time::advance(Duration::from_secs(2)).await;
        assert!(cache.get(key).await.unwrap().is_none());
        assert_eq!(cache.len().await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_ttl_never_expires() {
        let cache = cache();
        let key = "test:no-ttl";

        cache.set(key, b"persistent", None).await.unwrap();

        tokio::time::advance(Duration::from_secs(86_400)).await;
        assert!(cache.get(key).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_delete_pattern_by_scope() {
        let cache = cache();
        let shop = Scope::Shop(Uuid::new_v4());
        let other = Scope::Shop(Uuid::new_v4());

        let key1 = composed_key(&shop, "default");
        let key2 = slice_key(Slice::Sales, &shop, "period:30d");
        let key3 = composed_key(&other, "default");
        let key4 = composed_key(&Scope::Global, "default");

        for key in [&key1, &key2, &key3, &key4] {
            cache.set(key, b"x", None).await.unwrap();
        }
        cache.set("other:key", b"y", None).await.unwrap();

        let removed = cache.delete_pattern(&scope_pattern(&shop)).await.unwrap();

        assert_eq!(removed, 2);
        assert!(cache.get(&key1).await.unwrap().is_none());
        assert!(cache.get(&key2).await.unwrap().is_none());
        assert!(cache.get(&key3).await.unwrap().is_some());
        assert!(cache.get(&key4).await.unwrap().is_some());
        assert!(cache.get("other:key").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_delete_pattern_no_matches() {
        let cache = cache();
        cache.set("user:123", b"value", None).await.unwrap();

        let removed = cache
            .delete_pattern(&slice_pattern(Slice::Summary))
            .await
            .unwrap();

        assert_eq!(removed, 0);
        assert!(cache.get("user:123").await.unwrap().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_delete_pattern_does_not_count_expired() {
        let cache = cache();
        cache
            .set("dashboard:a", b"1", Some(Duration::from_secs(1)))
            .await
            .unwrap();
        cache.set("dashboard:b", b"2", None).await.unwrap();

        tokio::time::advance(Duration::from_secs(5)).await;

        assert_eq!(cache.delete_pattern("dashboard:*").await.unwrap(), 1);
        assert_eq!(cache.len().await, 0);
    }

    #[tokio::test]
    async fn test_overwrite_value() {
        let cache = cache();
        let key = "test:overwrite";

        cache.set(key, b"first", None).await.unwrap();
        cache.set(key, b"second", None).await.unwrap();

        let result = cache.get(key).await.unwrap();
        assert_eq!(result, Some(b"second".to_vec()));
    }

    #[tokio::test]
    async fn test_lru_eviction() {
        let cache = MemoryCache::new(3).unwrap();

        cache.set("key1", b"value1", None).await.unwrap();
        cache.set("key2", b"value2", None).await.unwrap();
        cache.set("key3", b"value3", None).await.unwrap();

        // Access key1 to make it recently used
        cache.get("key1").await.unwrap();

        // Insert a 4th entry - should evict key2 (least recently used)
        cache.set("key4", b"value4", None).await.unwrap();

        assert!(cache.get("key1").await.unwrap().is_some());
        assert!(cache.get("key2").await.unwrap().is_none());
        assert!(cache.get("key3").await.unwrap().is_some());
        assert!(cache.get("key4").await.unwrap().is_some());
    }

    #[test]
    fn test_zero_max_entries_is_rejected() {
        assert!(matches!(
            MemoryCache::new(0),
            Err(CacheError::InvalidConfig(_))
        ));
    }
}
