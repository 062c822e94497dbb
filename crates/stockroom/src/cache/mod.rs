//! Cache backend implementations.
//!
//! This module provides concrete implementations of the cache trait defined in
//! `stockroom_core::cache`, plus the best-effort [`KeyValueCache`] wrapper the
//! dashboard code talks to. Backends are selected at compile time via feature
//! flags.
//!
//! # Feature Flags
//!
//! - `memory` (default): In-memory LRU cache
//! - `redis`: Redis cache using the redis crate
//!
//! These features are mutually exclusive - only one cache backend can be
//! enabled at a time.

// Compile-time checks for mutual exclusivity
#[cfg(all(feature = "memory", feature = "redis"))]
compile_error!(
    "Features 'memory' and 'redis' are mutually exclusive. \
    Enable only one cache backend at a time."
);

#[cfg(not(any(feature = "memory", feature = "redis")))]
compile_error!(
    "No cache backend selected. Enable 'memory' or 'redis' feature. \
    Example: cargo build -p stockroom --features memory"
);

mod kv;

// The memory backend also backs unit tests under every feature combination.
#[cfg(any(feature = "memory", test))]
pub mod memory;

#[cfg(feature = "redis")]
pub mod redis_impl;

pub use kv::KeyValueCache;

#[cfg(test)]
pub(crate) use kv::testing;

#[cfg(any(feature = "memory", test))]
pub use memory::MemoryCache;

#[cfg(feature = "redis")]
pub use redis_impl::RedisCache;
