mod aggregate;
mod error;
mod filters;
mod merge;
mod trend;
mod types;

pub use aggregate::{
    inventory_distribution, monthly_sales, outstanding_total, recent_transfers, revenue_total,
    shop_performance, summarize, total_value, SummaryInput, DEFAULT_TRANSFER_LIMIT,
    TITLE_ACTIVE_SHOPS, TITLE_INVENTORY_ITEMS, TITLE_OUTSTANDING_INVOICES, TITLE_TOTAL_CUSTOMERS,
    TITLE_TOTAL_INVENTORY_VALUE, TITLE_TOTAL_RETAIL_VALUE, TITLE_TOTAL_REVENUE, UNKNOWN_SHOP,
};
pub use error::{DashboardError, FilterError};
pub use filters::{
    DashboardFilters, DashboardQuery, DEFAULT_SALES_MONTHS, DEFAULT_TOKEN, DEFAULT_TRAILING_DAYS,
};
pub use merge::{fold_total_value, merge_dashboard, slice_error, SliceResults};
pub use trend::{DecorativeTrend, FixedTrend, PeriodOverPeriod, TrendEstimator};
pub use types::{
    AggregateResult, ComposedDashboard, InventoryDistribution, MonthlySales, Scope,
    ShopPerformance, Slice, SummaryItem, TotalValue, TransferSummary, Trend, TrendDirection,
    ValueFormat,
};
