use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::retail::TransferStatus;

use super::error::FilterError;

/// Partition a dashboard is computed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Scope {
    /// Every shop.
    #[default]
    Global,
    /// A single shop.
    Shop(Uuid),
}

impl Scope {
    /// Builds a scope from an optional shop filter.
    pub fn from_shop(shop_id: Option<Uuid>) -> Self {
        shop_id.map_or(Scope::Global, Scope::Shop)
    }

    /// The shop this scope is restricted to, if any.
    pub fn shop_id(&self) -> Option<Uuid> {
        match self {
            Scope::Global => None,
            Scope::Shop(id) => Some(*id),
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Global => f.write_str("global"),
            Scope::Shop(id) => write!(f, "{}", id),
        }
    }
}

/// One independently fetched and cached part of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slice {
    Summary,
    TotalValue,
    ShopPerformance,
    Inventory,
    Sales,
    Transfers,
}

impl Slice {
    pub const ALL: [Slice; 6] = [
        Slice::Summary,
        Slice::TotalValue,
        Slice::ShopPerformance,
        Slice::Inventory,
        Slice::Sales,
        Slice::Transfers,
    ];

    /// Path segment and cache key segment for the slice.
    pub fn as_str(&self) -> &'static str {
        match self {
            Slice::Summary => "summary",
            Slice::TotalValue => "total-value",
            Slice::ShopPerformance => "shop-performance",
            Slice::Inventory => "inventory",
            Slice::Sales => "sales",
            Slice::Transfers => "transfers",
        }
    }

    /// Name used when reporting a failed slice in a composed dashboard.
    pub fn field_name(&self) -> &'static str {
        match self {
            Slice::Summary => "summaryData",
            Slice::TotalValue => "totalValue",
            Slice::ShopPerformance => "shopPerformance",
            Slice::Inventory => "inventoryDistribution",
            Slice::Sales => "monthlySales",
            Slice::Transfers => "recentTransfers",
        }
    }

    /// Returns true if the slice is computed over a time window.
    ///
    /// Snapshot slices (inventory, total value) ignore date filters.
    pub fn is_time_windowed(&self) -> bool {
        !matches!(self, Slice::TotalValue | Slice::Inventory)
    }
}

impl fmt::Display for Slice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Slice {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Slice::ALL
            .into_iter()
            .find(|slice| slice.as_str() == s)
            .ok_or_else(|| FilterError::UnknownSlice(s.to_string()))
    }
}

/// Outcome of one slice query.
///
/// A failed query carries the slice's fallback value (`T::default()`) so
/// callers always have something renderable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateResult<T> {
    pub success: bool,
    pub data: T,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> AggregateResult<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            message: None,
        }
    }

    /// Returns the data when the query succeeded.
    pub fn into_option(self) -> Option<T> {
        self.success.then_some(self.data)
    }
}

impl<T: Default> AggregateResult<T> {
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: T::default(),
            message: Some(message.into()),
        }
    }
}

/// Display hint for a summary value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueFormat {
    Count,
    Currency,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Up,
    Down,
    Flat,
}

/// Change indicator shown next to a summary value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Trend {
    pub direction: TrendDirection,
    /// Magnitude of the change in percent, always non-negative.
    pub percent: f64,
}

impl Trend {
    pub fn new(direction: TrendDirection, percent: f64) -> Self {
        Self {
            direction,
            percent: percent.abs(),
        }
    }

    /// Builds a trend from a signed percentage change, rounded to one decimal.
    pub fn from_change(change: f64) -> Self {
        let percent = (change.abs() * 10.0).round() / 10.0;
        let direction = if percent == 0.0 {
            TrendDirection::Flat
        } else if change > 0.0 {
            TrendDirection::Up
        } else {
            TrendDirection::Down
        };
        Self { direction, percent }
    }
}

/// A headline metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryItem {
    pub title: String,
    pub value: f64,
    pub format: ValueFormat,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trend: Option<Trend>,
}

impl SummaryItem {
    pub fn new(title: impl Into<String>, value: f64, format: ValueFormat) -> Self {
        Self {
            title: title.into(),
            value,
            format,
            trend: None,
        }
    }

    pub fn with_trend(mut self, trend: Option<Trend>) -> Self {
        self.trend = trend;
        self
    }
}

/// Stock valuation at cost and at retail price.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalValue {
    pub inventory_value: f64,
    pub retail_value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopPerformance {
    pub shop_id: Uuid,
    pub shop_name: String,
    pub revenue: f64,
    pub invoice_count: u64,
    pub inventory_value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryDistribution {
    pub category: String,
    pub item_count: u64,
    pub total_quantity: i64,
    pub total_value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySales {
    /// Calendar month as `YYYY-MM`.
    pub month: String,
    pub revenue: f64,
    pub invoice_count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferSummary {
    pub id: Uuid,
    pub from_shop: String,
    pub to_shop: String,
    pub item_name: String,
    pub quantity: i64,
    pub status: TransferStatus,
    pub created_at: DateTime<Utc>,
}

/// The merged dashboard returned to clients and cached as one value.
///
/// A slice that failed is `None` and has exactly one entry in `errors`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComposedDashboard {
    pub success: bool,
    pub summary_data: Option<Vec<SummaryItem>>,
    pub shop_performance: Option<Vec<ShopPerformance>>,
    pub inventory_distribution: Option<Vec<InventoryDistribution>>,
    pub monthly_sales: Option<Vec<MonthlySales>>,
    pub recent_transfers: Option<Vec<TransferSummary>>,
    #[serde(default)]
    pub errors: Vec<String>,
}
