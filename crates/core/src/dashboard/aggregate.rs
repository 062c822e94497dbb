//! Pure aggregation functions behind each dashboard slice.
//!
//! Every function takes already-loaded records and returns the slice payload.
//! Loading, timeouts and caching belong to the server.

use std::collections::{BTreeMap, HashMap};

use chrono::Datelike;
use uuid::Uuid;

use crate::retail::{InventoryItem, Invoice, InvoiceStatus, Shop, Transfer};
use crate::storage::TimeWindow;

use super::trend::TrendEstimator;
use super::types::{
    InventoryDistribution, MonthlySales, ShopPerformance, SummaryItem, TotalValue,
    TransferSummary, ValueFormat,
};

pub const TITLE_TOTAL_CUSTOMERS: &str = "Total Customers";
pub const TITLE_OUTSTANDING_INVOICES: &str = "Outstanding Invoices";
pub const TITLE_TOTAL_REVENUE: &str = "Total Revenue";
pub const TITLE_ACTIVE_SHOPS: &str = "Active Shops";
pub const TITLE_INVENTORY_ITEMS: &str = "Inventory Items";
pub const TITLE_TOTAL_INVENTORY_VALUE: &str = "Total Inventory Value";
pub const TITLE_TOTAL_RETAIL_VALUE: &str = "Total Retail Value";

/// Number of transfers shown when the caller does not ask for a limit.
pub const DEFAULT_TRANSFER_LIMIT: usize = 10;

/// Label used when a transfer references a shop that no longer exists.
pub const UNKNOWN_SHOP: &str = "Unknown shop";

/// Records the summary slice is computed from.
#[derive(Debug, Clone, Copy)]
pub struct SummaryInput<'a> {
    pub customers: u64,
    /// Invoices inside the requested window (all invoices when unbounded).
    pub invoices: &'a [Invoice],
    /// Invoices of the preceding window, when the request had one.
    pub previous_invoices: Option<&'a [Invoice]>,
    pub shops: &'a [Shop],
    pub items: &'a [InventoryItem],
}

/// Sum of balances still to be collected.
///
/// # Examples
///
/// ```
/// use uuid::Uuid;
/// use stockroom_core::dashboard::outstanding_total;
/// use stockroom_core::retail::Invoice;
///
/// let shop = Uuid::new_v4();
/// let invoices = vec![
///     Invoice::new(shop, "INV-1", 100.0),
///     Invoice::new(shop, "INV-2", 200.0),
///     Invoice::new(shop, "INV-3", 50.0).paid(),
/// ];
/// assert_eq!(outstanding_total(&invoices), 300.0);
/// ```
pub fn outstanding_total(invoices: &[Invoice]) -> f64 {
    invoices.iter().map(Invoice::outstanding_balance).sum()
}

/// Sum of revenue, excluding cancelled invoices.
pub fn revenue_total(invoices: &[Invoice]) -> f64 {
    invoices.iter().map(Invoice::revenue).sum()
}

/// Builds the headline metrics.
///
/// The two valuation items are emitted as zero placeholders; the composer
/// fills them from the total value slice.
pub fn summarize(input: SummaryInput<'_>, trend: &dyn TrendEstimator) -> Vec<SummaryItem> {
    let outstanding = outstanding_total(input.invoices);
    let revenue = revenue_total(input.invoices);
    let previous_outstanding = input.previous_invoices.map(outstanding_total);
    let previous_revenue = input.previous_invoices.map(revenue_total);

    let active_shops = input.shops.iter().filter(|shop| shop.active).count() as f64;
    let units: i64 = input.items.iter().map(|item| item.quantity.max(0)).sum();

    vec![
        SummaryItem::new(
            TITLE_TOTAL_CUSTOMERS,
            input.customers as f64,
            ValueFormat::Count,
        )
        .with_trend(trend.estimate(input.customers as f64, None)),
        SummaryItem::new(TITLE_OUTSTANDING_INVOICES, outstanding, ValueFormat::Currency)
            .with_trend(trend.estimate(outstanding, previous_outstanding)),
        SummaryItem::new(TITLE_TOTAL_REVENUE, revenue, ValueFormat::Currency)
            .with_trend(trend.estimate(revenue, previous_revenue)),
        SummaryItem::new(TITLE_ACTIVE_SHOPS, active_shops, ValueFormat::Count),
        SummaryItem::new(TITLE_INVENTORY_ITEMS, units as f64, ValueFormat::Count),
        SummaryItem::new(TITLE_TOTAL_INVENTORY_VALUE, 0.0, ValueFormat::Currency),
        SummaryItem::new(TITLE_TOTAL_RETAIL_VALUE, 0.0, ValueFormat::Currency),
    ]
}

/// Values the stock at cost and at retail.
pub fn total_value(items: &[InventoryItem]) -> TotalValue {
    items.iter().fold(TotalValue::default(), |acc, item| TotalValue {
        inventory_value: acc.inventory_value + item.cost_value(),
        retail_value: acc.retail_value + item.retail_value(),
    })
}

/// Per-shop revenue, invoice count and stock value, highest revenue first.
///
/// Every given shop appears, even without invoices. Ties are broken by name.
pub fn shop_performance(
    shops: &[Shop],
    invoices: &[Invoice],
    items: &[InventoryItem],
) -> Vec<ShopPerformance> {
    let mut revenue: HashMap<Uuid, (f64, u64)> = HashMap::new();
    for invoice in invoices
        .iter()
        .filter(|invoice| invoice.status != InvoiceStatus::Cancelled)
    {
        let entry = revenue.entry(invoice.shop_id).or_default();
        entry.0 += invoice.revenue();
        entry.1 += 1;
    }

    let mut stock: HashMap<Uuid, f64> = HashMap::new();
    for item in items {
        *stock.entry(item.shop_id).or_default() += item.cost_value();
    }

    let mut rows: Vec<ShopPerformance> = shops
        .iter()
        .map(|shop| {
            let (revenue, invoice_count) = revenue.get(&shop.id).copied().unwrap_or_default();
            ShopPerformance {
                shop_id: shop.id,
                shop_name: shop.name.clone(),
                revenue,
                invoice_count,
                inventory_value: stock.get(&shop.id).copied().unwrap_or_default(),
            }
        })
        .collect();

    rows.sort_by(|a, b| {
        b.revenue
            .total_cmp(&a.revenue)
            .then_with(|| a.shop_name.cmp(&b.shop_name))
    });
    rows
}

/// Stock grouped by category, most valuable category first.
pub fn inventory_distribution(items: &[InventoryItem]) -> Vec<InventoryDistribution> {
    let mut groups: BTreeMap<&str, InventoryDistribution> = BTreeMap::new();
    for item in items {
        let group = groups
            .entry(item.category.as_str())
            .or_insert_with(|| InventoryDistribution {
                category: item.category.clone(),
                item_count: 0,
                total_quantity: 0,
                total_value: 0.0,
            });
        group.item_count += 1;
        group.total_quantity += item.quantity.max(0);
        group.total_value += item.cost_value();
    }

    let mut rows: Vec<InventoryDistribution> = groups.into_values().collect();
    rows.sort_by(|a, b| {
        b.total_value
            .total_cmp(&a.total_value)
            .then_with(|| a.category.cmp(&b.category))
    });
    rows
}

/// Revenue per calendar month of the window, oldest first.
///
/// Months without sales are present with zero revenue.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use stockroom_core::dashboard::monthly_sales;
/// use stockroom_core::storage::TimeWindow;
///
/// let window = TimeWindow::from_dates(
///     NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
///     NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
/// )
/// .unwrap();
///
/// let months: Vec<String> = monthly_sales(&[], &window).into_iter().map(|m| m.month).collect();
/// assert_eq!(months, vec!["2024-01", "2024-02", "2024-03"]);
/// ```
pub fn monthly_sales(invoices: &[Invoice], window: &TimeWindow) -> Vec<MonthlySales> {
    let mut buckets: BTreeMap<(i32, u32), (f64, u64)> = window
        .months()
        .into_iter()
        .map(|month| (month, (0.0, 0)))
        .collect();

    for invoice in invoices.iter().filter(|invoice| {
        invoice.status != InvoiceStatus::Cancelled && window.contains(invoice.issued_at)
    }) {
        let key = (invoice.issued_at.year(), invoice.issued_at.month());
        if let Some(bucket) = buckets.get_mut(&key) {
            bucket.0 += invoice.revenue();
            bucket.1 += 1;
        }
    }

    buckets
        .into_iter()
        .map(|((year, month), (revenue, invoice_count))| MonthlySales {
            month: format!("{:04}-{:02}", year, month),
            revenue,
            invoice_count,
        })
        .collect()
}

/// The most recent transfers with shop names resolved, newest first.
pub fn recent_transfers(
    transfers: &[Transfer],
    shops: &[Shop],
    limit: usize,
) -> Vec<TransferSummary> {
    let names: HashMap<Uuid, &str> = shops
        .iter()
        .map(|shop| (shop.id, shop.name.as_str()))
        .collect();
    let name_of = |id: Uuid| names.get(&id).copied().unwrap_or(UNKNOWN_SHOP).to_string();

    let mut sorted: Vec<&Transfer> = transfers.iter().collect();
    sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    sorted
        .into_iter()
        .take(limit)
        .map(|transfer| TransferSummary {
            id: transfer.id,
            from_shop: name_of(transfer.from_shop_id),
            to_shop: name_of(transfer.to_shop_id),
            item_name: transfer.item_name.clone(),
            quantity: transfer.quantity,
            status: transfer.status,
            created_at: transfer.created_at,
        })
        .collect()
}
