//! Merging per-slice results into a composed dashboard.
//!
//! This is part of the Functional Core: the composer gathers the settled
//! slice results and hands them here. A failed slice never fails the merge.

use super::aggregate::{TITLE_TOTAL_INVENTORY_VALUE, TITLE_TOTAL_RETAIL_VALUE};
use super::types::{
    AggregateResult, ComposedDashboard, InventoryDistribution, MonthlySales, ShopPerformance,
    Slice, SummaryItem, TotalValue, TransferSummary, ValueFormat,
};

/// Message used when a failed slice did not say why.
const UNAVAILABLE: &str = "unavailable";

/// Settled results of every slice of one composition.
#[derive(Debug, Clone, PartialEq)]
pub struct SliceResults {
    pub summary: AggregateResult<Vec<SummaryItem>>,
    pub total_value: AggregateResult<TotalValue>,
    pub shop_performance: AggregateResult<Vec<ShopPerformance>>,
    pub inventory_distribution: AggregateResult<Vec<InventoryDistribution>>,
    pub monthly_sales: AggregateResult<Vec<MonthlySales>>,
    pub recent_transfers: AggregateResult<Vec<TransferSummary>>,
}

/// Writes the stock valuation into the summary items.
///
/// Items titled "Total Inventory Value" and "Total Retail Value" are updated in
/// place; missing ones are appended.
pub fn fold_total_value(summary: &mut Vec<SummaryItem>, total: &TotalValue) {
    for (title, value) in [
        (TITLE_TOTAL_INVENTORY_VALUE, total.inventory_value),
        (TITLE_TOTAL_RETAIL_VALUE, total.retail_value),
    ] {
        match summary.iter_mut().find(|item| item.title == title) {
            Some(item) => item.value = value,
            None => summary.push(SummaryItem::new(title, value, ValueFormat::Currency)),
        }
    }
}

/// Formats the error entry for a failed slice.
pub fn slice_error(slice: Slice, message: Option<&str>) -> String {
    format!("{}: {}", slice.field_name(), message.unwrap_or(UNAVAILABLE))
}

/// Merges settled slice results into one dashboard.
///
/// The dashboard is successful even when slices failed; each failed slice is
/// `None` and contributes exactly one entry to `errors`. A failed total value
/// slice leaves the summary placeholders untouched.
pub fn merge_dashboard(results: SliceResults) -> ComposedDashboard {
    let mut errors = Vec::new();

    let total_value = take(Slice::TotalValue, results.total_value, &mut errors);
    let summary_data = take(Slice::Summary, results.summary, &mut errors).map(|mut summary| {
        if let Some(total) = &total_value {
            fold_total_value(&mut summary, total);
        }
        summary
    });

    ComposedDashboard {
        success: true,
        summary_data,
        shop_performance: take(Slice::ShopPerformance, results.shop_performance, &mut errors),
        inventory_distribution: take(
            Slice::Inventory,
            results.inventory_distribution,
            &mut errors,
        ),
        monthly_sales: take(Slice::Sales, results.monthly_sales, &mut errors),
        recent_transfers: take(Slice::Transfers, results.recent_transfers, &mut errors),
        errors,
    }
}

fn take<T>(slice: Slice, result: AggregateResult<T>, errors: &mut Vec<String>) -> Option<T> {
    if result.success {
        Some(result.data)
    } else {
        errors.push(slice_error(slice, result.message.as_deref()));
        None
    }
}
