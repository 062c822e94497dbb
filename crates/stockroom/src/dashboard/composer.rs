//! Cache-aside composition of the dashboard.
//!
//! `compose` reads the composed entry, and on a miss fans out to every slice
//! fetcher at once, merges what settled and writes the result back. `refresh`
//! is the same computation without the read, used by the warmer.

use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDate, Utc};
use serde::{de::DeserializeOwned, Serialize};

use stockroom_core::cache::{composed_key, slice_key};
use stockroom_core::dashboard::{
    merge_dashboard, AggregateResult, ComposedDashboard, DashboardError, DashboardFilters,
    DashboardQuery, Scope, Slice, SliceResults,
};
use stockroom_core::storage::Result;

use super::fetchers::{settle, AggregationFetcher, SliceQuery};
use crate::cache::KeyValueCache;

/// TTLs and timeouts used by the composer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComposerSettings {
    /// TTL of composed dashboards without a time filter.
    pub default_ttl: Duration,
    /// TTL of composed dashboards narrowed to a time window.
    pub filtered_ttl: Duration,
    /// TTL of single-slice entries.
    pub slice_ttl: Duration,
    /// Upper bound on each slice computation.
    pub fetch_timeout: Duration,
}

impl Default for ComposerSettings {
    fn default() -> Self {
        Self {
            default_ttl: Duration::from_secs(300),
            filtered_ttl: Duration::from_secs(120),
            slice_ttl: Duration::from_secs(600),
            fetch_timeout: Duration::from_millis(5000),
        }
    }
}

impl ComposerSettings {
    /// TTL for a composed dashboard with the given filters.
    pub fn composed_ttl(&self, filters: &DashboardFilters) -> Duration {
        if filters.is_time_scoped() {
            self.filtered_ttl
        } else {
            self.default_ttl
        }
    }
}

/// Builds composed dashboards and single slices through the cache.
#[derive(Clone)]
pub struct DashboardComposer {
    fetcher: Arc<dyn AggregationFetcher>,
    cache: KeyValueCache,
    settings: ComposerSettings,
}

impl DashboardComposer {
    pub fn new(
        fetcher: Arc<dyn AggregationFetcher>,
        cache: KeyValueCache,
        settings: ComposerSettings,
    ) -> Self {
        Self {
            fetcher,
            cache,
            settings,
        }
    }

    pub fn settings(&self) -> &ComposerSettings {
        &self.settings
    }

    /// Serves the dashboard for a request.
    ///
    /// # Errors
    ///
    /// Returns `DashboardError::InvalidFilters` when the query's dates or
    /// period cannot be interpreted. Slice failures are reported inside the
    /// dashboard instead.
    pub async fn compose(
        &self,
        query: &DashboardQuery,
    ) -> std::result::Result<ComposedDashboard, DashboardError> {
        let filters = query.filters()?;
        Ok(self.compose_filtered(query.scope(), &filters).await)
    }

    /// Cache-aside read of the composed dashboard for validated filters.
    pub async fn compose_filtered(
        &self,
        scope: Scope,
        filters: &DashboardFilters,
    ) -> ComposedDashboard {
        let key = composed_key(&scope, &filters.cache_token());
        if let Some(dashboard) = self.cache.get::<ComposedDashboard>(&key).await {
            tracing::debug!(key = %key, "Serving composed dashboard from cache");
            return dashboard;
        }

        let dashboard = self.build(scope, filters, today()).await;
        self.cache
            .set(&key, &dashboard, self.settings.composed_ttl(filters))
            .await;
        dashboard
    }

    /// Recomputes the composed dashboard and overwrites its cache entry.
    pub async fn refresh(&self, scope: Scope, filters: &DashboardFilters) -> ComposedDashboard {
        let key = composed_key(&scope, &filters.cache_token());
        let dashboard = self.build(scope, filters, today()).await;
        self.cache
            .set(&key, &dashboard, self.settings.composed_ttl(filters))
            .await;
        dashboard
    }

    /// Runs all slices concurrently and merges whatever settled.
    async fn build(
        &self,
        scope: Scope,
        filters: &DashboardFilters,
        today: NaiveDate,
    ) -> ComposedDashboard {
        let query = |slice: Slice| SliceQuery::new(scope, filters.window_for(slice, today));
        let timeout = self.settings.fetch_timeout;
        let fetcher = self.fetcher.as_ref();

        let started = tokio::time::Instant::now();
        let (
            summary,
            total_value,
            shop_performance,
            inventory_distribution,
            monthly_sales,
            recent_transfers,
        ) = tokio::join!(
            settle(
                Slice::Summary,
                &scope,
                timeout,
                fetcher.summary(query(Slice::Summary)),
            ),
            settle(
                Slice::TotalValue,
                &scope,
                timeout,
                fetcher.total_value(query(Slice::TotalValue)),
            ),
            settle(
                Slice::ShopPerformance,
                &scope,
                timeout,
                fetcher.shop_performance(query(Slice::ShopPerformance)),
            ),
            settle(
                Slice::Inventory,
                &scope,
                timeout,
                fetcher.inventory_distribution(query(Slice::Inventory)),
            ),
            settle(
                Slice::Sales,
                &scope,
                timeout,
                fetcher.monthly_sales(query(Slice::Sales)),
            ),
            settle(
                Slice::Transfers,
                &scope,
                timeout,
                fetcher.recent_transfers(query(Slice::Transfers)),
            ),
        );

        let dashboard = merge_dashboard(SliceResults {
            summary,
            total_value,
            shop_performance,
            inventory_distribution,
            monthly_sales,
            recent_transfers,
        });
        tracing::debug!(
            scope = %scope,
            filters = %filters.cache_token(),
            failed = dashboard.errors.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Composed dashboard"
        );
        dashboard
    }

    /// Cache-aside read of a single slice, serialized as an [`AggregateResult`].
    ///
    /// Failed slices are returned but never cached.
    pub async fn slice(
        &self,
        slice: Slice,
        scope: Scope,
        filters: &DashboardFilters,
    ) -> std::result::Result<serde_json::Value, DashboardError> {
        self.run_slice(slice, scope, filters, true).await
    }

    /// Recomputes one slice and overwrites its cache entry.
    ///
    /// Returns whether the slice computed successfully. Failures leave the
    /// previous entry in place.
    pub async fn refresh_slice(
        &self,
        slice: Slice,
        scope: Scope,
        filters: &DashboardFilters,
    ) -> std::result::Result<bool, DashboardError> {
        let value = self.run_slice(slice, scope, filters, false).await?;
        Ok(value["success"].as_bool().unwrap_or(false))
    }

    async fn run_slice(
        &self,
        slice: Slice,
        scope: Scope,
        filters: &DashboardFilters,
        read: bool,
    ) -> std::result::Result<serde_json::Value, DashboardError> {
        let key = slice_key(slice, &scope, &filters.cache_token());
        let query = SliceQuery::new(scope, filters.window_for(slice, today()));
        let fetcher = self.fetcher.as_ref();

        match slice {
            Slice::Summary => {
                self.cached_slice(&key, slice, &scope, fetcher.summary(query), read)
                    .await
            }
            Slice::TotalValue => {
                self.cached_slice(&key, slice, &scope, fetcher.total_value(query), read)
                    .await
            }
            Slice::ShopPerformance => {
                self.cached_slice(&key, slice, &scope, fetcher.shop_performance(query), read)
                    .await
            }
            Slice::Inventory => {
                let fut = fetcher.inventory_distribution(query);
                self.cached_slice(&key, slice, &scope, fut, read).await
            }
            Slice::Sales => {
                self.cached_slice(&key, slice, &scope, fetcher.monthly_sales(query), read)
                    .await
            }
            Slice::Transfers => {
                self.cached_slice(&key, slice, &scope, fetcher.recent_transfers(query), read)
                    .await
            }
        }
    }

    /// Reads `key` (when `read` is set), otherwise computes the slice and
    /// caches it if it succeeded.
    async fn cached_slice<T, F>(
        &self,
        key: &str,
        slice: Slice,
        scope: &Scope,
        fut: F,
        read: bool,
    ) -> std::result::Result<serde_json::Value, DashboardError>
    where
        T: Serialize + DeserializeOwned + Default,
        F: std::future::Future<Output = Result<T>>,
    {
        if read {
            if let Some(cached) = self.cache.get::<AggregateResult<T>>(key).await {
                return to_json(&cached);
            }
        }

        let result = settle(slice, scope, self.settings.fetch_timeout, fut).await;
        if result.success {
            self.cache.set(key, &result, self.settings.slice_ttl).await;
        }
        to_json(&result)
    }
}

fn to_json<T: Serialize>(value: &T) -> std::result::Result<serde_json::Value, DashboardError> {
    serde_json::to_value(value).map_err(|e| DashboardError::Serialization(e.to_string()))
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}
