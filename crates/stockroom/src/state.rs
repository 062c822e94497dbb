//! Application state with repository-based storage.
//!
//! This module defines the shared application state that is passed to all
//! request handlers. Storage and cache are trait objects whose concrete
//! backends are chosen at compile time via feature flags; everything above
//! them (composer, warmer, handlers) is backend-agnostic.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::broadcast;

use stockroom_core::cache::Cache;
use stockroom_core::retail::generate_seed_data;
use stockroom_core::storage::{RetailStore, ShopRepository};

use crate::cache::KeyValueCache;
use crate::config::Config;
use crate::dashboard::{CacheWarmer, DashboardComposer, StoreFetcher};
use crate::mock_data::seed_store;
use crate::storage::InvalidatingStore;

/// Shared application state.
///
/// This is cloned for each request handler and contains shared resources.
#[derive(Clone)]
pub struct AppState {
    /// Retail store. Writes through it invalidate affected dashboard entries.
    pub store: Arc<dyn RetailStore>,
    /// Best-effort cache shared by the composer, the warmer and admin routes.
    pub cache: KeyValueCache,
    /// Cache-aside dashboard composition.
    pub composer: DashboardComposer,
    /// Background refresh of popular dashboard entries.
    pub warmer: CacheWarmer,
    /// Configuration the state was built from.
    pub config: Arc<Config>,
    /// Shutdown signal sender for background tasks.
    pub shutdown_tx: broadcast::Sender<()>,
}

impl AppState {
    /// Wires the dashboard services on top of a repository and a cache backend.
    fn build<R>(repository: Arc<R>, backend: Arc<dyn Cache>, config: &Config) -> Self
    where
        R: RetailStore + 'static,
    {
        let (shutdown_tx, _) = broadcast::channel(1);

        let cache = KeyValueCache::new(backend);
        let store: Arc<dyn RetailStore> =
            Arc::new(InvalidatingStore::new(repository, cache.clone()));

        let fetcher = Arc::new(StoreFetcher::new(store.clone(), config.trend_estimator()));
        let composer = DashboardComposer::new(fetcher, cache.clone(), config.composer_settings());
        let warmer = CacheWarmer::new(store.clone(), composer.clone(), config.warmer_settings());

        Self {
            store,
            cache,
            composer,
            warmer,
            config: Arc::new(config.clone()),
            shutdown_tx,
        }
    }

    /// Subscribe to shutdown signal.
    pub fn subscribe_shutdown(&self) -> broadcast::Receiver<()> {
        self.shutdown_tx.subscribe()
    }

    /// Signal background tasks to shut down.
    pub fn signal_shutdown(&self) {
        let _ = self.shutdown_tx.send(());
    }
}

/// Seeds demo data into a store that has no shops yet.
///
/// Runs against the raw repository, before the cache-busting wrapper exists,
/// so seeding does not sweep the cache once per record.
async fn seed_if_empty<R>(repository: &R, config: &Config) -> Result<(), anyhow::Error>
where
    R: RetailStore,
{
    if !config.seed_demo_data {
        return Ok(());
    }
    if !repository.list_shops(false).await?.is_empty() {
        tracing::debug!("Store already has shops, skipping demo data");
        return Ok(());
    }
    seed_store(repository, &generate_seed_data(Utc::now().date_naive())).await?;
    Ok(())
}

// ============================================================================
// Factory functions for different backend combinations
// ============================================================================

#[cfg(all(feature = "sqlite", feature = "memory"))]
mod sqlite_memory {
    use super::*;
    use crate::cache::MemoryCache;
    use crate::storage::SqliteRepository;

    impl AppState {
        /// Creates AppState with SQLite storage and in-memory cache.
        pub async fn new(config: &Config) -> Result<Self, anyhow::Error> {
            let sqlite_repo = Arc::new(SqliteRepository::new(&config.sqlite_path).await?);
            seed_if_empty(sqlite_repo.as_ref(), config).await?;
            let memory_cache = Arc::new(MemoryCache::new(config.cache_max_entries)?);

            Ok(Self::build(sqlite_repo, memory_cache, config))
        }
    }
}

#[cfg(all(feature = "sqlite", feature = "redis"))]
mod sqlite_redis {
    use super::*;
    use crate::cache::RedisCache;
    use crate::storage::SqliteRepository;

    impl AppState {
        /// Creates AppState with SQLite storage and Redis cache.
        pub async fn new(config: &Config) -> Result<Self, anyhow::Error> {
            let sqlite_repo = Arc::new(SqliteRepository::new(&config.sqlite_path).await?);
            seed_if_empty(sqlite_repo.as_ref(), config).await?;
            let redis_cache = Arc::new(RedisCache::new(&config.redis_url).await?);

            Ok(Self::build(sqlite_repo, redis_cache, config))
        }
    }
}

#[cfg(all(feature = "inmemory", feature = "memory"))]
mod inmemory_memory {
    use super::*;
    use crate::cache::MemoryCache;
    use crate::storage::InMemoryRepository;

    impl AppState {
        /// Creates AppState with in-memory storage and cache.
        /// Useful for demos without any external dependencies.
        pub async fn new(config: &Config) -> Result<Self, anyhow::Error> {
            let inmemory_repo = Arc::new(InMemoryRepository::new());
            seed_if_empty(inmemory_repo.as_ref(), config).await?;
            let memory_cache = Arc::new(MemoryCache::new(config.cache_max_entries)?);

            Ok(Self::build(inmemory_repo, memory_cache, config))
        }
    }
}

#[cfg(all(feature = "inmemory", feature = "redis"))]
mod inmemory_redis {
    use super::*;
    use crate::cache::RedisCache;
    use crate::storage::InMemoryRepository;

    impl AppState {
        /// Creates AppState with in-memory storage and Redis cache.
        pub async fn new(config: &Config) -> Result<Self, anyhow::Error> {
            let inmemory_repo = Arc::new(InMemoryRepository::new());
            seed_if_empty(inmemory_repo.as_ref(), config).await?;
            let redis_cache = Arc::new(RedisCache::new(&config.redis_url).await?);

            Ok(Self::build(inmemory_repo, redis_cache, config))
        }
    }
}

// ============================================================================
// Test support - provides Default implementation for unit tests
// ============================================================================


#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryRepository;

    fn config(seed: bool) -> Config {
        Config {
            seed_demo_data: seed,
            ..Config::default()
        }
    }

    #[tokio::test]
    async fn test_seed_if_empty_populates_new_store() {
        let repo = InMemoryRepository::new();

        seed_if_empty(&repo, &config(true)).await.unwrap();

        assert!(!repo.list_shops(false).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_seed_if_empty_runs_once() {
        let repo = InMemoryRepository::new();

        seed_if_empty(&repo, &config(true)).await.unwrap();
        let first = repo.list_shops(false).await.unwrap().len();
        seed_if_empty(&repo, &config(true)).await.unwrap();

        assert_eq!(repo.list_shops(false).await.unwrap().len(), first);
    }

    #[tokio::test]
    async fn test_seeding_disabled() {
        let repo = InMemoryRepository::new();

        seed_if_empty(&repo, &config(false)).await.unwrap();

        assert!(repo.list_shops(false).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_shutdown_reaches_subscribers() {
        let state = AppState::default();
        let mut rx = state.subscribe_shutdown();

        state.signal_shutdown();

        assert!(rx.recv().await.is_ok());
    }
}
