//! Dashboard aggregation services.
//!
//! - `fetchers`: per-slice aggregation against the retail store
//! - `composer`: cache-aside composition of the full dashboard and of single slices
//! - `warmer`: background refresh of the most requested entries

mod composer;
mod fetchers;
mod warmer;

pub use composer::{ComposerSettings, DashboardComposer};
pub use fetchers::StoreFetcher;
pub use warmer::{CacheWarmer, WarmReport, WarmerSettings};
