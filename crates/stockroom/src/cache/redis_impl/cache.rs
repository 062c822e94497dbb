//! Redis cache implementation.
//!
//! Uses set-based key tracking for pattern deletion without SCAN. Every key
//! written is added to the tracking set of its namespace (`{namespace}:_keys`),
//! and every namespace is recorded in a registry set, so a pattern whose
//! namespace is a wildcard can still find its candidates.
//!
//! `set` and `delete` update the value and its tracking set in one MULTI/EXEC
//! block. Writing an expiring key pushes the expiry of its tracking set out to
//! at least [`TRACKING_TTL`] or the key's own TTL, whichever is longer, so a
//! namespace that stops receiving writes drops its set. While writes continue,
//! keys that expired on their own are pruned by the next `delete_pattern` over
//! their namespace, matching or not.
//!
//! `delete_pattern` is not atomic. A race leaves stale members only, which DEL
//! and SREM treat as no-ops.

use std::time::Duration;

use async_trait::async_trait;
use redis::AsyncCommands;

use stockroom_core::cache::{
    namespace_of, pattern_matches, tracking_key, Cache, Result, NAMESPACE_REGISTRY_KEY,
};

use super::error::map_redis_error;

/// Minimum lifetime of a tracking set after an expiring key is written into it.
pub const TRACKING_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Redis cache backend using connection manager for pooling.
pub struct RedisCache {
    conn: redis::aio::ConnectionManager,
}

impl RedisCache {
    /// Creates a new Redis cache connection.
    ///
    /// # Errors
    ///
    /// Returns `CacheError::Unavailable` if the connection cannot be established.
    pub async fn new(url: &str) -> Result<Self> {
        let client = redis::Client::open(url).map_err(map_redis_error)?;
        let conn = redis::aio::ConnectionManager::new(client)
            .await
            .map_err(map_redis_error)?;
        Ok(Self { conn })
    }

    /// Namespaces whose tracking sets may hold keys matching `pattern`.
    async fn candidate_namespaces(&self, pattern: &str) -> Result<Vec<String>> {
        if let Some(namespace) = namespace_of(pattern) {
            return Ok(vec![namespace.to_string()]);
        }
        let mut conn = self.conn.clone();
        conn.smembers(NAMESPACE_REGISTRY_KEY)
            .await
            .map_err(map_redis_error)
    }

    /// The subset of `keys` that no longer exist.
    async fn expired<'a>(&self, keys: &[&'a String]) -> Result<Vec<&'a String>> {
        if keys.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.conn.clone();
        let mut pipe = redis::pipe();
        for key in keys {
            pipe.exists(*key);
        }
        let present: Vec<bool> = pipe.query_async(&mut conn).await.map_err(map_redis_error)?;

        Ok(keys
            .iter()
            .zip(present)
            .filter(|(_, present)| !present)
            .map(|(key, _)| *key)
            .collect())
    }
}

#[async_trait]
impl Cache for RedisCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let mut conn = self.conn.clone();
        let result: Option<Vec<u8>> = conn.get(key).await.map_err(map_redis_error)?;
        Ok(result)
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> Result<()> {
        let mut conn = self.conn.clone();
        let mut pipe = redis::pipe();
        pipe.atomic();

        match ttl {
            Some(duration) => pipe.set_ex(key, value, duration.as_secs().max(1)).ignore(),
            None => pipe.set(key, value).ignore(),
        };
        if let Some(namespace) = namespace_of(key) {
            let tracking = tracking_key(namespace);
            pipe.sadd(&tracking, key)
                .ignore()
                .sadd(NAMESPACE_REGISTRY_KEY, namespace)
                .ignore();
            if let Some(duration) = ttl {
                let lifetime = duration.max(TRACKING_TTL).as_secs();
                pipe.expire(&tracking, i64::try_from(lifetime).unwrap_or(i64::MAX))
                    .ignore();
            }
        }

        let _: () = pipe.query_async(&mut conn).await.map_err(map_redis_error)?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut conn = self.conn.clone();
        let mut pipe = redis::pipe();
        pipe.atomic().del(key).ignore();

        if let Some(namespace) = namespace_of(key) {
            pipe.srem(tracking_key(namespace), key).ignore();
        }

        let _: () = pipe.query_async(&mut conn).await.map_err(map_redis_error)?;
        Ok(())
    }

    async fn delete_pattern(&self, pattern: &str) -> Result<u64> {
        let mut conn = self.conn.clone();
        let mut removed = 0;

        for namespace in self.candidate_namespaces(pattern).await? {
            let tracking = tracking_key(&namespace);
            let tracked: Vec<String> = conn.smembers(&tracking).await.map_err(map_redis_error)?;

            let (matching, others): (Vec<&String>, Vec<&String>) = tracked
                .iter()
                .partition(|key| pattern_matches(pattern, key));

            if !matching.is_empty() {
                // DEL only counts keys that still existed, so expired entries are not reported.
                let deleted: u64 = conn.del(&matching).await.map_err(map_redis_error)?;
                removed += deleted;
            }

            let mut untracked = matching;
            untracked.extend(self.expired(&others).await?);
            if !untracked.is_empty() {
                conn.srem::<_, _, ()>(&tracking, &untracked)
                    .await
                    .map_err(map_redis_error)?;
            }
        }

        Ok(removed)
    }
}
