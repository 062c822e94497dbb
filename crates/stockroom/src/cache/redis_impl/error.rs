//! Classification of Redis failures.

use stockroom_core::cache::CacheError;

/// Sorts a Redis error into unreachable, slow or refused.
pub fn map_redis_error(err: redis::RedisError) -> CacheError {
    if err.is_timeout() {
        CacheError::Timeout(err.to_string())
    } else if err.is_connection_refusal() || err.is_connection_dropped() || err.is_io_error() {
        CacheError::Unavailable(err.to_string())
    } else {
        CacheError::Rejected(err.to_string())
    }
}
