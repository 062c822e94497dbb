//! Background cache warming.
//!
//! Each cycle recomputes the composed dashboard and every configured slice for
//! the global scope and each active shop, writing straight through the cache so
//! that consumer requests mostly hit warm entries. The composed dashboard is
//! warmed unfiltered and once per configured preset. Every target settles on its
//! own: one failure is logged and counted, never propagated.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{interval, Instant, MissedTickBehavior};

use stockroom_core::cache::{composed_key, slice_key};
use stockroom_core::dashboard::{DashboardFilters, Scope, Slice};
use stockroom_core::storage::{PeriodPreset, RetailStore, ShopRepository};

use super::composer::DashboardComposer;

/// Warming schedule and coverage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WarmerSettings {
    /// Time between the starts of two cycles.
    pub interval: Duration,
    /// Presets the composed dashboard and each time-windowed slice are warmed for.
    pub periods: Vec<PeriodPreset>,
    /// Slices warmed individually, in addition to the composed dashboard.
    pub slices: Vec<Slice>,
}

impl Default for WarmerSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(600),
            periods: PeriodPreset::ALL.to_vec(),
            slices: Slice::ALL.to_vec(),
        }
    }
}

/// One cache entry the warmer refreshes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WarmingTarget {
    /// The composed dashboard of a scope, unfiltered or for a preset.
    Composed {
        scope: Scope,
        period: Option<PeriodPreset>,
    },
    /// A single slice, for a preset when the slice is time-windowed.
    Slice {
        slice: Slice,
        scope: Scope,
        period: Option<PeriodPreset>,
    },
}

impl WarmingTarget {
    /// Filters the target is computed with.
    pub fn filters(&self) -> DashboardFilters {
        match self {
            WarmingTarget::Composed {
                period: Some(period),
                ..
            }
            | WarmingTarget::Slice {
                period: Some(period),
                ..
            } => DashboardFilters::Period(*period),
            _ => DashboardFilters::Default,
        }
    }

    /// Cache key the target writes.
    pub fn key(&self) -> String {
        let token = self.filters().cache_token();
        match self {
            WarmingTarget::Composed { scope, .. } => composed_key(scope, &token),
            WarmingTarget::Slice { slice, scope, .. } => slice_key(*slice, scope, &token),
        }
    }
}

/// Lists every target of one cycle, scope by scope.
///
/// Each scope gets its unfiltered composed dashboard and one per period;
/// time-windowed slices are listed once per period and the others once.
pub fn warming_targets(
    scopes: &[Scope],
    slices: &[Slice],
    periods: &[PeriodPreset],
) -> Vec<WarmingTarget> {
    let mut targets = Vec::new();
    for &scope in scopes {
        targets.push(WarmingTarget::Composed {
            scope,
            period: None,
        });
        targets.extend(periods.iter().map(|&period| WarmingTarget::Composed {
            scope,
            period: Some(period),
        }));
        for &slice in slices {
            if slice.is_time_windowed() {
                targets.extend(periods.iter().map(|&period| WarmingTarget::Slice {
                    slice,
                    scope,
                    period: Some(period),
                }));
            } else {
                targets.push(WarmingTarget::Slice {
                    slice,
                    scope,
                    period: None,
                });
            }
        }
    }
    targets
}

/// Outcome of one warming cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WarmReport {
    pub targets: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// One entry per failed target, prefixed with its cache key.
    pub errors: Vec<String>,
    pub duration_ms: u64,
}

/// Periodically refreshes dashboard cache entries.
#[derive(Clone)]
pub struct CacheWarmer {
    store: Arc<dyn RetailStore>,
    composer: DashboardComposer,
    settings: WarmerSettings,
    running: Arc<AtomicBool>,
    cycle: Arc<Mutex<()>>,
}

impl CacheWarmer {
    pub fn new(
        store: Arc<dyn RetailStore>,
        composer: DashboardComposer,
        settings: WarmerSettings,
    ) -> Self {
        Self {
            store,
            composer,
            settings,
            running: Arc::new(AtomicBool::new(false)),
            cycle: Arc::new(Mutex::new(())),
        }
    }

    /// Returns true while the background loop is running.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Global plus every active shop, listed fresh.
    ///
    /// When shops cannot be listed only the global scope is warmed.
    async fn scopes(&self) -> Vec<Scope> {
        let mut scopes = vec![Scope::Global];
        match self.store.list_shops(true).await {
            Ok(shops) => scopes.extend(shops.into_iter().map(|shop| Scope::Shop(shop.id))),
            Err(err) => {
                tracing::warn!(error = %err, "Failed to list shops, warming global scope only");
            }
        }
        scopes
    }

    /// Runs one full warming cycle.
    ///
    /// Waits for a cycle already in progress to finish first.
    pub async fn warm_all(&self) -> WarmReport {
        let _guard = self.cycle.lock().await;
        self.run_cycle().await
    }

    /// Runs a cycle unless one is already in progress.
    async fn try_warm(&self) -> Option<WarmReport> {
        let Ok(_guard) = self.cycle.try_lock() else {
            tracing::debug!("Previous warming cycle still running, skipping tick");
            return None;
        };
        Some(self.run_cycle().await)
    }

    async fn run_cycle(&self) -> WarmReport {
        let started = Instant::now();
        let scopes = self.scopes().await;
        let targets = warming_targets(&scopes, &self.settings.slices, &self.settings.periods);

        let outcomes = join_all(targets.iter().map(|target| self.warm_target(*target))).await;

        let mut report = WarmReport {
            targets: targets.len(),
            ..WarmReport::default()
        };
        for (target, outcome) in targets.iter().zip(outcomes) {
            match outcome {
                Ok(()) => report.succeeded += 1,
                Err(message) => {
                    report.failed += 1;
                    report.errors.push(format!("{}: {}", target.key(), message));
                }
            }
        }
        report.duration_ms = started.elapsed().as_millis() as u64;

        tracing::info!(
            scopes = scopes.len(),
            targets = report.targets,
            succeeded = report.succeeded,
            failed = report.failed,
            duration_ms = report.duration_ms,
            "Cache warming cycle completed"
        );
        report
    }

    async fn warm_target(&self, target: WarmingTarget) -> Result<(), String> {
        let filters = target.filters();
        match target {
            WarmingTarget::Composed { scope, .. } => {
                let dashboard = self.composer.refresh(scope, &filters).await;
                if dashboard.errors.is_empty() {
                    Ok(())
                } else {
                    Err(dashboard.errors.join("; "))
                }
            }
            WarmingTarget::Slice { slice, scope, .. } => {
                match self.composer.refresh_slice(slice, scope, &filters).await {
                    Ok(true) => Ok(()),
                    Ok(false) => Err(format!("{slice} slice failed")),
                    Err(err) => Err(err.to_string()),
                }
            }
        }
    }

    /// Spawns the warming loop.
    ///
    /// The first cycle starts immediately. The loop exits when `shutdown`
    /// fires or its sender is dropped. Returns `None` when the loop is
    /// already running.
    pub fn start(&self, mut shutdown: broadcast::Receiver<()>) -> Option<JoinHandle<()>> {
        if self.running.swap(true, Ordering::SeqCst) {
            tracing::debug!("Cache warmer already running");
            return None;
        }

        let warmer = self.clone();
        Some(tokio::spawn(async move {
            let mut ticker = interval(warmer.settings.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            tracing::info!(
                interval_secs = warmer.settings.interval.as_secs(),
                periods = warmer.settings.periods.len(),
                slices = warmer.settings.slices.len(),
                "Cache warmer started"
            );

            loop {
                tokio::select! {
                    _ = shutdown.recv() => {
                        tracing::info!("Cache warmer shutting down");
                        break;
                    }
                    _ = ticker.tick() => {
                        warmer.try_warm().await;
                    }
                }
            }

            warmer.running.store(false, Ordering::SeqCst);
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockroom_core::cache::Cache;
    use stockroom_core::dashboard::ComposedDashboard;
    use stockroom_core::retail::Shop;

    use super::super::composer::ComposerSettings;
    use super::super::fetchers::testing::ScriptedFetcher;
    use crate::cache::{KeyValueCache, MemoryCache};
    use crate::storage::InMemoryRepository;

    struct Harness {
        warmer: CacheWarmer,
        backend: MemoryCache,
        fetcher: Arc<ScriptedFetcher>,
    }

    async fn harness(fetcher: ScriptedFetcher, shops: Vec<Shop>) -> Harness {
        let repo = InMemoryRepository::new();
        for shop in &shops {
            repo.create_shop(shop).await.unwrap();
        }
        let backend = MemoryCache::new(1000).unwrap();
        let cache = KeyValueCache::new(Arc::new(backend.clone()));
        let fetcher = Arc::new(fetcher);
        let composer = DashboardComposer::new(fetcher.clone(), cache, ComposerSettings::default());
        let warmer = CacheWarmer::new(Arc::new(repo), composer, WarmerSettings::default());
        Harness {
            warmer,
            backend,
            fetcher,
        }
    }

    async fn cached(backend: &MemoryCache, key: &str) -> bool {
        backend.get(key).await.unwrap().is_some()
    }

    #[test]
    fn test_targets_cover_every_period_of_windowed_slices() {
        let targets = warming_targets(&[Scope::Global], &Slice::ALL, &PeriodPreset::ALL);

        // composed x (default + 4 periods) + 4 windowed slices x 4 periods + 2 snapshot slices
        assert_eq!(targets.len(), 5 + 16 + 2);
        assert!(targets.contains(&WarmingTarget::Composed {
            scope: Scope::Global,
            period: Some(PeriodPreset::Last7Days),
        }));
        assert!(targets.contains(&WarmingTarget::Slice {
            slice: Slice::Inventory,
            scope: Scope::Global,
            period: None,
        }));
        assert!(targets.contains(&WarmingTarget::Slice {
            slice: Slice::Sales,
            scope: Scope::Global,
            period: Some(PeriodPreset::YearToDate),
        }));
    }

    #[test]
    fn test_target_keys() {
        let sales = WarmingTarget::Slice {
            slice: Slice::Sales,
            scope: Scope::Global,
            period: Some(PeriodPreset::Last30Days),
        };
        assert_eq!(sales.key(), "dashboard:sales:global:period:30d");
        assert_eq!(
            WarmingTarget::Composed {
                scope: Scope::Global,
                period: None,
            }
            .key(),
            "dashboard:composed:global:default"
        );
        assert_eq!(
            WarmingTarget::Composed {
                scope: Scope::Global,
                period: Some(PeriodPreset::YearToDate),
            }
            .key(),
            "dashboard:composed:global:period:ytd"
        );
    }

    #[tokio::test]
    async fn test_warm_all_populates_global_and_active_shops() {
        let open = Shop::new("Open");
        let closed = Shop::new("Closed").inactive();
        let h = harness(ScriptedFetcher::new(), vec![open.clone(), closed.clone()]).await;

        let report = h.warmer.warm_all().await;

        assert_eq!(report.targets, 2 * 23);
        assert_eq!(report.succeeded, report.targets);
        assert_eq!(report.failed, 0);
        for scope in [Scope::Global, Scope::Shop(open.id)] {
            assert!(cached(&h.backend, &composed_key(&scope, "default")).await);
            assert!(cached(&h.backend, &composed_key(&scope, "period:30d")).await);
            assert!(cached(&h.backend, &slice_key(Slice::Sales, &scope, "period:7d")).await);
            assert!(cached(&h.backend, &slice_key(Slice::Inventory, &scope, "default")).await);
        }
        assert!(!cached(&h.backend, &composed_key(&Scope::Shop(closed.id), "default")).await);
    }

    #[tokio::test]
    async fn test_failing_shop_does_not_stop_others() {
        let s1 = Shop::new("S1");
        let s2 = Shop::new("S2");
        let fetcher = ScriptedFetcher::new().failing_scope(Scope::Shop(s1.id));
        let h = harness(fetcher, vec![s1.clone(), s2.clone()]).await;

        let report = h.warmer.warm_all().await;

        assert_eq!(report.failed, 23);
        assert_eq!(report.errors.len(), 23);
        assert_eq!(report.succeeded, 2 * 23);

        let s2_scope = Scope::Shop(s2.id);
        assert!(cached(&h.backend, &composed_key(&s2_scope, "default")).await);
        assert!(cached(&h.backend, &slice_key(Slice::Summary, &s2_scope, "period:90d")).await);
        assert!(cached(&h.backend, &composed_key(&Scope::Global, "default")).await);
        assert!(
            !cached(
                &h.backend,
                &slice_key(Slice::Summary, &Scope::Shop(s1.id), "period:90d")
            )
            .await
        );
    }

    #[tokio::test]
    async fn test_rewarming_overwrites_same_keys() {
        let h = harness(ScriptedFetcher::new(), vec![Shop::new("Only")]).await;

        let first = h.warmer.warm_all().await;
        let entries = h.backend.len().await;
        let composed_before = h.backend.get(&composed_key(&Scope::Global, "default")).await;

        let second = h.warmer.warm_all().await;

        assert_eq!(first.targets, second.targets);
        assert_eq!(h.backend.len().await, entries);
        assert_eq!(
            h.backend.get(&composed_key(&Scope::Global, "default")).await,
            composed_before
        );
    }

    #[tokio::test]
    async fn test_warmed_dashboard_is_served_without_fetching() {
        let h = harness(ScriptedFetcher::new(), vec![]).await;
        h.warmer.warm_all().await;
        let calls = h.fetcher.calls();

        let cache = KeyValueCache::new(Arc::new(h.backend.clone()));
        let composer =
            DashboardComposer::new(h.fetcher.clone(), cache, ComposerSettings::default());
        let dashboard: ComposedDashboard = composer
            .compose_filtered(Scope::Global, &DashboardFilters::Default)
            .await;

        assert!(dashboard.errors.is_empty());
        assert_eq!(h.fetcher.calls(), calls);
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_is_idempotent_and_stops_on_shutdown() {
        let h = harness(ScriptedFetcher::new(), vec![]).await;
        let (shutdown_tx, _) = broadcast::channel(1);

        let handle = h.warmer.start(shutdown_tx.subscribe()).unwrap();
        assert!(h.warmer.start(shutdown_tx.subscribe()).is_none());
        assert!(h.warmer.is_running());

        // First tick fires immediately.
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(cached(&h.backend, &composed_key(&Scope::Global, "default")).await);

        shutdown_tx.send(()).unwrap();
        handle.await.unwrap();
        assert!(!h.warmer.is_running());
        assert!(h.warmer.start(shutdown_tx.subscribe()).is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cycles_repeat_on_interval() {
        let h = harness(ScriptedFetcher::new(), vec![]).await;
        let (shutdown_tx, _) = broadcast::channel(1);
        let handle = h.warmer.start(shutdown_tx.subscribe()).unwrap();

        tokio::time::sleep(Duration::from_millis(10)).await;
        let after_first = h.fetcher.calls();
        assert!(after_first > 0);

        tokio::time::sleep(Duration::from_secs(600)).await;
        assert_eq!(h.fetcher.calls(), 2 * after_first);

        shutdown_tx.send(()).unwrap();
        handle.await.unwrap();
    }
}
