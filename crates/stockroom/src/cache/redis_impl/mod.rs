//! Redis cache backend implementation.
//!
//! Provides a shared cache for multi-instance deployments with TTL and
//! pattern-based deletion.

mod cache;
mod error;

pub use cache::RedisCache;
