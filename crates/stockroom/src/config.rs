use std::{env, str::FromStr, sync::Arc, time::Duration};

use stockroom_core::dashboard::{DecorativeTrend, PeriodOverPeriod, Slice, TrendEstimator};
use stockroom_core::storage::PeriodPreset;

use crate::dashboard::{ComposerSettings, WarmerSettings};

/// How summary cards get their trend badge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TrendMode {
    /// Compare against the preceding window of equal length.
    #[default]
    Period,
    /// Random cosmetic badge for demo deployments.
    Decorative,
}

impl FromStr for TrendMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "period" => Ok(TrendMode::Period),
            "decorative" => Ok(TrendMode::Decorative),
            other => Err(format!("unknown trend mode: {other}")),
        }
    }
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of cache entries (default: 10,000)
    pub cache_max_entries: usize,
    /// TTL of unfiltered composed dashboards in seconds (default: 300)
    pub dashboard_ttl_seconds: u64,
    /// TTL of time-filtered composed dashboards in seconds (default: 120)
    pub dashboard_filtered_ttl_seconds: u64,
    /// TTL of single-slice entries in seconds (default: 600)
    pub slice_ttl_seconds: u64,
    /// Per-slice computation timeout in milliseconds (default: 5,000)
    pub fetch_timeout_ms: u64,
    /// Seconds between warming cycles (default: 600)
    pub warm_interval_seconds: u64,
    /// Whether `serve` starts the background warmer (default: true)
    pub warm_enabled: bool,
    /// Presets warmed for time-windowed slices (default: 7d, 30d, 90d, ytd)
    pub warm_periods: Vec<PeriodPreset>,
    /// Trend badge strategy (default: period)
    pub trend_mode: TrendMode,
    /// Path to SQLite database file (default: "stockroom.db")
    /// Note: Only used when the `sqlite` feature is enabled.
    #[allow(dead_code)]
    pub sqlite_path: String,
    /// Redis connection URL (default: "redis://localhost:6379")
    /// Note: Only used when the `redis` feature is enabled.
    #[allow(dead_code)]
    pub redis_url: String,
    /// Seed demo shops and records into an empty store (default: true)
    pub seed_demo_data: bool,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `CACHE_MAX_ENTRIES` - Maximum cache entries (default: 10,000)
    /// - `DASHBOARD_TTL_SECONDS` - Unfiltered dashboard TTL (default: 300)
    /// - `DASHBOARD_FILTERED_TTL_SECONDS` - Filtered dashboard TTL (default: 120)
    /// - `SLICE_TTL_SECONDS` - Single-slice TTL (default: 600)
    /// - `FETCH_TIMEOUT_MS` - Per-slice timeout (default: 5,000)
    /// - `WARM_INTERVAL_SECONDS` - Warming interval (default: 600)
    /// - `WARM_ENABLED` - Run the background warmer (default: true)
    /// - `WARM_PERIODS` - Comma-separated presets (default: "7d,30d,90d,ytd")
    /// - `TREND_MODE` - "period" or "decorative" (default: "period")
    /// - `SQLITE_PATH` - SQLite database path (default: "stockroom.db")
    /// - `REDIS_URL` - Redis connection URL (default: "redis://localhost:6379")
    /// - `SEED_DEMO_DATA` - Seed an empty store with demo data (default: true)
    pub fn from_env() -> Self {
        Self {
            cache_max_entries: env::var("CACHE_MAX_ENTRIES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10_000),
            dashboard_ttl_seconds: env::var("DASHBOARD_TTL_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(300),
            dashboard_filtered_ttl_seconds: env::var("DASHBOARD_FILTERED_TTL_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(120),
            slice_ttl_seconds: env::var("SLICE_TTL_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(600),
            fetch_timeout_ms: env::var("FETCH_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5_000),
            warm_interval_seconds: env::var("WARM_INTERVAL_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(600),
            warm_enabled: env::var("WARM_ENABLED")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
            warm_periods: env::var("WARM_PERIODS")
                .ok()
                .map(|v| parse_periods(&v))
                .filter(|periods| !periods.is_empty())
                .unwrap_or_else(|| PeriodPreset::ALL.to_vec()),
            trend_mode: env::var("TREND_MODE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_default(),
            sqlite_path: env::var("SQLITE_PATH").unwrap_or_else(|_| "stockroom.db".to_string()),
            redis_url: env::var("REDIS_URL")
                .unwrap_or_else(|_| "redis://localhost:6379".to_string()),
            seed_demo_data: env::var("SEED_DEMO_DATA")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
        }
    }

    /// TTLs and timeout for the dashboard composer.
    pub fn composer_settings(&self) -> ComposerSettings {
        ComposerSettings {
            default_ttl: Duration::from_secs(self.dashboard_ttl_seconds),
            filtered_ttl: Duration::from_secs(self.dashboard_filtered_ttl_seconds),
            slice_ttl: Duration::from_secs(self.slice_ttl_seconds),
            fetch_timeout: Duration::from_millis(self.fetch_timeout_ms),
        }
    }

    /// Schedule and coverage for the cache warmer.
    pub fn warmer_settings(&self) -> WarmerSettings {
        WarmerSettings {
            interval: Duration::from_secs(self.warm_interval_seconds.max(1)),
            periods: self.warm_periods.clone(),
            slices: Slice::ALL.to_vec(),
        }
    }

    /// The trend estimator selected by `TREND_MODE`.
    pub fn trend_estimator(&self) -> Arc<dyn TrendEstimator> {
        match self.trend_mode {
            TrendMode::Period => Arc::new(PeriodOverPeriod),
            TrendMode::Decorative => Arc::new(DecorativeTrend::default()),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Parses a comma-separated preset list, skipping unknown entries.
fn parse_periods(value: &str) -> Vec<PeriodPreset> {
    let mut periods = Vec::new();
    for part in value.split(',').filter(|p| !p.trim().is_empty()) {
        match part.parse::<PeriodPreset>() {
            Ok(preset) if !periods.contains(&preset) => periods.push(preset),
            Ok(_) => {}
            Err(err) => tracing::warn!(error = %err, "Ignoring WARM_PERIODS entry"),
        }
    }
    periods
}
