use std::time::Duration;

use async_trait::async_trait;

use super::Result;

/// Trait for basic cache operations.
///
/// Backends report failures through [`Result`]; callers that need the
/// best-effort behaviour of the dashboard path wrap a `Cache` and turn
/// errors into misses.
#[async_trait]
pub trait Cache: Send + Sync {
    /// Gets a value from the cache by key. Expired entries read as `None`.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Sets a value in the cache with an optional TTL, replacing any previous value.
    async fn set(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> Result<()>;

    /// Deletes a value from the cache by key.
    async fn delete(&self, key: &str) -> Result<()>;

    /// Deletes all values matching a glob pattern (e.g., "dashboard:summary:*").
    ///
    /// Returns the number of live entries that were removed.
    async fn delete_pattern(&self, pattern: &str) -> Result<u64>;
}
