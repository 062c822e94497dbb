//! Per-slice aggregation fetchers.
//!
//! Each fetcher runs only the store queries its slice needs and hands the rows
//! to the pure aggregation functions in `stockroom_core::dashboard`. Fetchers
//! return `Err` freely; [`settle`] is what turns a failure or a timeout into
//! the slice's fallback so composition always completes.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;

use stockroom_core::dashboard::{
    inventory_distribution, monthly_sales, recent_transfers, shop_performance, summarize,
    total_value, AggregateResult, InventoryDistribution, MonthlySales, Scope, ShopPerformance,
    Slice, SummaryInput, SummaryItem, TotalValue, TransferSummary, TrendEstimator,
    DEFAULT_SALES_MONTHS, DEFAULT_TRANSFER_LIMIT,
};
use stockroom_core::retail::Shop;
use stockroom_core::storage::{
    CustomerRepository, InventoryRepository, InvoiceFilter, InvoiceRepository, Result, RetailStore,
    ShopRepository, TimeWindow, TransferFilter, TransferRepository,
};

/// What a single slice is computed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SliceQuery {
    pub scope: Scope,
    /// `None` means unbounded in time.
    pub window: Option<TimeWindow>,
}

impl SliceQuery {
    pub fn new(scope: Scope, window: Option<TimeWindow>) -> Self {
        Self { scope, window }
    }
}

/// One async computation per dashboard slice.
#[async_trait]
pub trait AggregationFetcher: Send + Sync {
    /// Headline metrics.
    async fn summary(&self, query: SliceQuery) -> Result<Vec<SummaryItem>>;

    /// Stock valuation at cost and at retail.
    async fn total_value(&self, query: SliceQuery) -> Result<TotalValue>;

    /// Revenue and stock value per shop.
    async fn shop_performance(&self, query: SliceQuery) -> Result<Vec<ShopPerformance>>;

    /// Stock grouped by category.
    async fn inventory_distribution(&self, query: SliceQuery)
        -> Result<Vec<InventoryDistribution>>;

    /// Revenue per calendar month.
    async fn monthly_sales(&self, query: SliceQuery) -> Result<Vec<MonthlySales>>;

    /// Latest stock movements between shops.
    async fn recent_transfers(&self, query: SliceQuery) -> Result<Vec<TransferSummary>>;
}

/// Awaits a slice computation, bounded by `timeout`.
///
/// Errors and timeouts become a failed [`AggregateResult`] carrying the
/// slice's default value; both are logged, neither is returned.
pub async fn settle<T, F>(
    slice: Slice,
    scope: &Scope,
    timeout: Duration,
    fut: F,
) -> AggregateResult<T>
where
    T: Default,
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(timeout, fut).await {
        Ok(Ok(data)) => AggregateResult::ok(data),
        Ok(Err(err)) => {
            tracing::warn!(slice = %slice, scope = %scope, error = %err, "Slice query failed");
            AggregateResult::failed(err.to_string())
        }
        Err(_) => {
            tracing::warn!(
                slice = %slice,
                scope = %scope,
                timeout_ms = timeout.as_millis() as u64,
                "Slice query timed out"
            );
            AggregateResult::failed(format!("timed out after {} ms", timeout.as_millis()))
        }
    }
}

/// [`AggregationFetcher`] backed by the retail repositories.
#[derive(Clone)]
pub struct StoreFetcher {
    store: Arc<dyn RetailStore>,
    trend: Arc<dyn TrendEstimator>,
    transfer_limit: usize,
}

impl StoreFetcher {
    pub fn new(store: Arc<dyn RetailStore>, trend: Arc<dyn TrendEstimator>) -> Self {
        Self {
            store,
            trend,
            transfer_limit: DEFAULT_TRANSFER_LIMIT,
        }
    }

    /// Caps the number of transfers returned by the transfers slice.
    pub fn with_transfer_limit(mut self, limit: usize) -> Self {
        self.transfer_limit = limit;
        self
    }

    /// Shops visible from `scope`: every shop for global, the one shop otherwise.
    ///
    /// An unknown shop yields an empty list.
    async fn shops_in(&self, scope: &Scope, active_only: bool) -> Result<Vec<Shop>> {
        match scope.shop_id() {
            None => self.store.list_shops(active_only).await,
            Some(id) => Ok(self
                .store
                .get_shop(id)
                .await?
                .into_iter()
                .filter(|shop| shop.active || !active_only)
                .collect()),
        }
    }
}

#[async_trait]
impl AggregationFetcher for StoreFetcher {
    async fn summary(&self, query: SliceQuery) -> Result<Vec<SummaryItem>> {
        let shop_id = query.scope.shop_id();
        let current = InvoiceFilter {
            shop_id,
            window: query.window,
        };
        let previous = query.window.map(|window| InvoiceFilter {
            shop_id,
            window: Some(window.previous()),
        });

        let (customers, invoices, shops, items) = tokio::try_join!(
            self.store.count_customers(shop_id),
            self.store.list_invoices(&current),
            self.shops_in(&query.scope, false),
            self.store.list_inventory(shop_id),
        )?;
        let previous_invoices = match previous {
            Some(filter) => Some(self.store.list_invoices(&filter).await?),
            None => None,
        };

        Ok(summarize(
            SummaryInput {
                customers,
                invoices: &invoices,
                previous_invoices: previous_invoices.as_deref(),
                shops: &shops,
                items: &items,
            },
            self.trend.as_ref(),
        ))
    }

    async fn total_value(&self, query: SliceQuery) -> Result<TotalValue> {
        let items = self.store.list_inventory(query.scope.shop_id()).await?;
        Ok(total_value(&items))
    }

    async fn shop_performance(&self, query: SliceQuery) -> Result<Vec<ShopPerformance>> {
        let shop_id = query.scope.shop_id();
        let filter = InvoiceFilter {
            shop_id,
            window: query.window,
        };

        let (shops, invoices, items) = tokio::try_join!(
            self.shops_in(&query.scope, true),
            self.store.list_invoices(&filter),
            self.store.list_inventory(shop_id),
        )?;

        Ok(shop_performance(&shops, &invoices, &items))
    }

    async fn inventory_distribution(
        &self,
        query: SliceQuery,
    ) -> Result<Vec<InventoryDistribution>> {
        let items = self.store.list_inventory(query.scope.shop_id()).await?;
        Ok(inventory_distribution(&items))
    }

    async fn monthly_sales(&self, query: SliceQuery) -> Result<Vec<MonthlySales>> {
        let window = query.window.unwrap_or_else(|| {
            TimeWindow::trailing_months(Utc::now().date_naive(), DEFAULT_SALES_MONTHS)
        });
        let invoices = self
            .store
            .list_invoices(&InvoiceFilter {
                shop_id: query.scope.shop_id(),
                window: Some(window),
            })
            .await?;

        Ok(monthly_sales(&invoices, &window))
    }

    async fn recent_transfers(&self, query: SliceQuery) -> Result<Vec<TransferSummary>> {
        let filter = TransferFilter {
            shop_id: query.scope.shop_id(),
            window: query.window,
            limit: Some(self.transfer_limit),
        };

        // Names are resolved against every shop: the other side of a transfer
        // may be outside the scope.
        let (transfers, shops) = tokio::try_join!(
            self.store.list_transfers(&filter),
            self.store.list_shops(false),
        )?;

        Ok(recent_transfers(&transfers, &shops, self.transfer_limit))
    }
}
