//! Dashboard request filters and the time windows they resolve to.
//!
//! Filters come in three shapes: none at all, a named period preset, or an
//! explicit (possibly one-sided) date range. Each shape renders to a stable
//! token that becomes the last segment of the cache key, so two requests share
//! a cache entry exactly when they resolve to the same token.

use chrono::{Datelike, NaiveDate};
use serde::Deserialize;
use uuid::Uuid;

use crate::serde::{deserialize_optional_date, deserialize_optional_string, deserialize_optional_uuid};
use crate::storage::{DateRangeError, PeriodPreset, TimeWindow};

use super::error::FilterError;
use super::types::{Scope, Slice};

/// Trailing window used by shop performance and transfers when no range is given.
pub const DEFAULT_TRAILING_DAYS: u32 = 30;

/// Number of calendar months shown by the sales trend when no range is given.
pub const DEFAULT_SALES_MONTHS: u32 = 6;

/// Token used for requests without any time filter.
pub const DEFAULT_TOKEN: &str = "default";

/// Calendar years a requested date may fall in.
const SUPPORTED_YEARS: std::ops::RangeInclusive<i32> = 1..=9999;

/// Raw query parameters accepted by the dashboard endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardQuery {
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub end_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub period: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_uuid")]
    pub shop_id: Option<Uuid>,
}

impl DashboardQuery {
    /// The partition the request targets.
    pub fn scope(&self) -> Scope {
        Scope::from_shop(self.shop_id)
    }

    /// Validates the time filters.
    ///
    /// An explicit date takes precedence over `period`.
    pub fn filters(&self) -> Result<DashboardFilters, FilterError> {
        if self.start_date.is_some() || self.end_date.is_some() {
            return DashboardFilters::range(self.start_date, self.end_date);
        }
        match &self.period {
            Some(period) => Ok(DashboardFilters::Period(period.parse()?)),
            None => Ok(DashboardFilters::Default),
        }
    }
}

/// Validated time filters of a dashboard request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum DashboardFilters {
    /// No time filter; every slice uses its own default window.
    #[default]
    Default,
    /// A named period relative to today.
    Period(PeriodPreset),
    /// An explicit date range. At least one side is set.
    Range {
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    },
}

impl DashboardFilters {
    /// Builds range filters, rejecting a start after the end and dates
    /// outside years 1 through 9999.
    ///
    /// Returns [`DashboardFilters::Default`] when neither side is given.
    pub fn range(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<Self, FilterError> {
        if let Some(date) = [start, end]
            .into_iter()
            .flatten()
            .find(|date| !SUPPORTED_YEARS.contains(&date.year()))
        {
            return Err(DateRangeError::OutOfRange(date).into());
        }
        match (start, end) {
            (None, None) => Ok(DashboardFilters::Default),
            (Some(s), Some(e)) if s > e => Err(DateRangeError::InvalidRange.into()),
            _ => Ok(DashboardFilters::Range { start, end }),
        }
    }

    /// Stable token identifying these filters inside a cache key.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use stockroom_core::dashboard::DashboardFilters;
    /// use stockroom_core::storage::PeriodPreset;
    ///
    /// let start = NaiveDate::from_ymd_opt(2024, 1, 1);
    /// let end = NaiveDate::from_ymd_opt(2024, 1, 31);
    ///
    /// assert_eq!(DashboardFilters::Default.cache_token(), "default");
    /// assert_eq!(DashboardFilters::Period(PeriodPreset::YearToDate).cache_token(), "period:ytd");
    /// assert_eq!(
    ///     DashboardFilters::range(start, end).unwrap().cache_token(),
    ///     "2024-01-01:2024-01-31"
    /// );
    /// assert_eq!(DashboardFilters::range(start, None).unwrap().cache_token(), "2024-01-01:_");
    /// ```
    pub fn cache_token(&self) -> String {
        match self {
            DashboardFilters::Default => DEFAULT_TOKEN.to_string(),
            DashboardFilters::Period(preset) => format!("period:{}", preset),
            DashboardFilters::Range { start, end } => {
                let side = |date: &Option<NaiveDate>| {
                    date.map_or_else(|| "_".to_string(), |d| d.format("%Y-%m-%d").to_string())
                };
                format!("{}:{}", side(start), side(end))
            }
        }
    }

    /// Returns true if the request narrowed the dashboard to a time window.
    pub fn is_time_scoped(&self) -> bool {
        !matches!(self, DashboardFilters::Default)
    }

    /// The window the request asked for, if any.
    ///
    /// A range with only a start runs through today; a range with only an end
    /// covers the trailing default window ending on that day.
    pub fn window(&self, today: NaiveDate) -> Option<TimeWindow> {
        match *self {
            DashboardFilters::Default => None,
            DashboardFilters::Period(preset) => Some(preset.window(today)),
            DashboardFilters::Range {
                start: Some(start),
                end: Some(end),
            } => TimeWindow::from_dates(start, end).ok(),
            DashboardFilters::Range {
                start: Some(start),
                end: None,
            } => TimeWindow::from_dates(start, today.max(start)).ok(),
            DashboardFilters::Range {
                start: None,
                end: Some(end),
            } => Some(TimeWindow::trailing_days(end, DEFAULT_TRAILING_DAYS)),
            DashboardFilters::Range {
                start: None,
                end: None,
            } => None,
        }
    }

    /// The window a given slice is computed over.
    ///
    /// `None` means the slice is unbounded in time: an all-time summary or a
    /// current inventory snapshot.
    pub fn window_for(&self, slice: Slice, today: NaiveDate) -> Option<TimeWindow> {
        if !slice.is_time_windowed() {
            return None;
        }
        if let Some(window) = self.window(today) {
            return Some(window);
        }
        match slice {
            Slice::ShopPerformance | Slice::Transfers => {
                Some(TimeWindow::trailing_days(today, DEFAULT_TRAILING_DAYS))
            }
            Slice::Sales => Some(TimeWindow::trailing_months(today, DEFAULT_SALES_MONTHS)),
            Slice::Summary | Slice::TotalValue | Slice::Inventory => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn query(json: &str) -> DashboardQuery {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_query_deserializes_camel_case() {
        let q = query(
            r#"{"startDate":"2024-01-01","endDate":"2024-01-31T00:00:00.000Z","shopId":"550e8400-e29b-41d4-a716-446655440000"}"#,
        );
        assert_eq!(q.start_date, Some(date(2024, 1, 1)));
        assert_eq!(q.end_date, Some(date(2024, 1, 31)));
        assert!(matches!(q.scope(), Scope::Shop(_)));
    }

    #[test]
    fn test_empty_params_mean_defaults() {
        let q = query(r#"{"startDate":"","endDate":"","period":"","shopId":""}"#);
        assert_eq!(q.scope(), Scope::Global);
        assert_eq!(q.filters().unwrap(), DashboardFilters::Default);
    }

    #[test]
    fn test_inverted_range_is_rejected() {
        let q = DashboardQuery {
            start_date: Some(date(2024, 2, 1)),
            end_date: Some(date(2024, 1, 1)),
            ..Default::default()
        };
        assert_eq!(
            q.filters(),
            Err(FilterError::DateRange(DateRangeError::InvalidRange))
        );
    }

    #[test]
    fn test_far_out_dates_are_rejected() {
        let q = query(r#"{"endDate":"-262143-01-01"}"#);
        assert!(matches!(
            q.filters(),
            Err(FilterError::DateRange(DateRangeError::OutOfRange(_)))
        ));

        let q = query(r#"{"startDate":"-262143-01-01","endDate":"2024-01-01"}"#);
        assert!(matches!(
            q.filters(),
            Err(FilterError::DateRange(DateRangeError::OutOfRange(_)))
        ));

        assert!(DashboardFilters::range(Some(date(10000, 1, 1)), None).is_err());
        assert!(DashboardFilters::range(Some(date(1, 1, 1)), Some(date(9999, 12, 31))).is_ok());
    }

    #[test]
    fn test_earliest_supported_end_date_resolves_windows() {
        let filters = DashboardFilters::range(None, Some(date(1, 1, 1))).unwrap();
        let today = date(2024, 3, 15);

        let window = filters.window_for(Slice::Sales, today).unwrap();
        assert_eq!(window.end_date(), date(1, 1, 1));
        assert!(window.previous().start <= window.start);
    }

    #[test]
    fn test_unknown_period_is_rejected() {
        let q = DashboardQuery {
            period: Some("fortnight".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            q.filters(),
            Err(FilterError::DateRange(DateRangeError::UnknownPeriod(_)))
        ));
    }

    #[test]
    fn test_dates_take_precedence_over_period() {
        let q = DashboardQuery {
            start_date: Some(date(2024, 1, 1)),
            period: Some("7d".to_string()),
            ..Default::default()
        };
        assert_eq!(q.filters().unwrap().cache_token(), "2024-01-01:_");
    }

    #[test]
    fn test_time_scoped() {
        assert!(!DashboardFilters::Default.is_time_scoped());
        assert!(DashboardFilters::Period(PeriodPreset::Last7Days).is_time_scoped());
        assert!(DashboardFilters::range(None, Some(date(2024, 1, 1)))
            .unwrap()
            .is_time_scoped());
    }

    #[test]
    fn test_one_sided_windows() {
        let today = date(2024, 3, 15);

        let from_start = DashboardFilters::range(Some(date(2024, 3, 1)), None)
            .unwrap()
            .window(today)
            .unwrap();
        assert_eq!(from_start.start_date(), date(2024, 3, 1));
        assert_eq!(from_start.end_date(), today);

        let until_end = DashboardFilters::range(None, Some(date(2024, 2, 29)))
            .unwrap()
            .window(today)
            .unwrap();
        assert_eq!(until_end.end_date(), date(2024, 2, 29));
        assert_eq!(until_end.start_date(), date(2024, 1, 31));
    }

    #[test]
    fn test_default_windows_per_slice() {
        let today = date(2024, 3, 15);
        let filters = DashboardFilters::Default;

        let performance = filters.window_for(Slice::ShopPerformance, today).unwrap();
        assert_eq!(performance.start_date(), date(2024, 2, 15));
        assert_eq!(performance.end_date(), today);

        let sales = filters.window_for(Slice::Sales, today).unwrap();
        assert_eq!(sales.start_date(), date(2023, 10, 1));
        assert_eq!(sales.end_date(), date(2024, 3, 31));

        assert_eq!(filters.window_for(Slice::Summary, today), None);
        assert_eq!(filters.window_for(Slice::Inventory, today), None);
    }

    #[test]
    fn test_explicit_window_skips_snapshot_slices() {
        let today = date(2024, 3, 15);
        let filters = DashboardFilters::Period(PeriodPreset::Last7Days);

        assert_eq!(filters.window_for(Slice::TotalValue, today), None);
        let summary = filters.window_for(Slice::Summary, today).unwrap();
        assert_eq!(summary.start_date(), date(2024, 3, 9));
    }
}
