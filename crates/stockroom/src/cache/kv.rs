//! Best-effort typed cache used by the dashboard.
//!
//! Wraps a fallible [`Cache`] backend. Reads degrade to misses, writes to
//! no-ops and invalidations to zero removals; the failure is logged and never
//! returned. The dashboard must keep serving from the store when the cache is
//! down.

use std::sync::Arc;
use std::time::Duration;

use serde::{de::DeserializeOwned, Serialize};

use stockroom_core::cache::{deserialize, serialize, Cache};

/// Key probed by [`KeyValueCache::ping`].
const HEALTH_KEY: &str = "_cache:health";

#[derive(Clone)]
pub struct KeyValueCache {
    backend: Arc<dyn Cache>,
}

impl KeyValueCache {
    pub fn new(backend: Arc<dyn Cache>) -> Self {
        Self { backend }
    }

    /// Reads and decodes a value. Missing, expired, unreadable and undecodable
    /// entries all read as `None`.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let bytes = match self.backend.get(key).await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                tracing::trace!(key, "Cache miss");
                return None;
            }
            Err(err) => {
                tracing::warn!(
                    error = %err,
                    transient = err.is_transient(),
                    key,
                    "Cache read failed, treating as miss"
                );
                return None;
            }
        };

        match deserialize(&bytes) {
            Ok(value) => {
                tracing::trace!(key, "Cache hit");
                Some(value)
            }
            Err(err) => {
                tracing::warn!(error = %err, key, "Cached value could not be decoded, treating as miss");
                None
            }
        }
    }

    /// Encodes and stores a value, replacing any previous one.
    ///
    /// Returns whether the write reached the backend.
    pub async fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T, ttl: Duration) -> bool {
        let bytes = match serialize(value) {
            Ok(bytes) => bytes,
            Err(err) => {
                tracing::warn!(error = %err, key, "Failed to encode value for cache");
                return false;
            }
        };

        match self.backend.set(key, &bytes, Some(ttl)).await {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(error = %err, transient = err.is_transient(), key, "Cache write failed");
                false
            }
        }
    }

    /// Removes every entry matching the glob `pattern`.
    ///
    /// Returns the number of live entries removed, zero when the backend failed.
    pub async fn invalidate_pattern(&self, pattern: &str) -> u64 {
        match self.backend.delete_pattern(pattern).await {
            Ok(removed) => {
                tracing::debug!(pattern, removed, "Invalidated cache entries");
                removed
            }
            Err(err) => {
                tracing::warn!(
                    error = %err,
                    transient = err.is_transient(),
                    pattern,
                    "Cache invalidation failed"
                );
                0
            }
        }
    }

    /// Writes, reads back and deletes a probe entry.
    pub async fn ping(&self) -> bool {
        let probe = b"ok";
        let healthy = matches!(
            self.backend.set(HEALTH_KEY, probe, Some(Duration::from_secs(5))).await,
            Ok(())
        ) && matches!(self.backend.get(HEALTH_KEY).await, Ok(Some(ref v)) if v == probe);

        if let Err(err) = self.backend.delete(HEALTH_KEY).await {
            tracing::warn!(error = %err, "Failed to remove cache health probe");
        }
        healthy
    }
}
