use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Days, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::DateRangeError;

/// A time window with an inclusive start and an inclusive end.
///
/// Windows built from calendar dates run from `00:00:00.000` on the first day
/// through `23:59:59.999` on the last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    /// Creates a new window, validating that start <= end.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, DateRangeError> {
        if start > end {
            return Err(DateRangeError::InvalidRange);
        }
        Ok(Self { start, end })
    }

    /// Creates a window covering whole days from `start` through `end`.
    pub fn from_dates(start: NaiveDate, end: NaiveDate) -> Result<Self, DateRangeError> {
        if start > end {
            return Err(DateRangeError::InvalidRange);
        }
        Ok(Self {
            start: start_of_day(start),
            end: end_of_day(end),
        })
    }

    /// The trailing `days` days ending with (and including) `today`.
    ///
    /// The start clamps to the earliest representable day.
    pub fn trailing_days(today: NaiveDate, days: u32) -> Self {
        let span = Days::new(u64::from(days.max(1)) - 1);
        Self {
            start: start_of_day(today.checked_sub_days(span).unwrap_or(NaiveDate::MIN)),
            end: end_of_day(today),
        }
    }

    /// The trailing `months` calendar months ending with the month of `today`.
    ///
    /// Both ends snap to month boundaries, so `trailing_months(2024-03-15, 3)`
    /// spans 2024-01-01 through 2024-03-31.
    pub fn trailing_months(today: NaiveDate, months: u32) -> Self {
        let (mut year, mut month) = (today.year(), today.month());
        for _ in 1..months.max(1) {
            (year, month) = previous_month(year, month);
        }
        let first = first_of_month(year, month);
        let last = last_of_month(today.year(), today.month());
        Self {
            start: start_of_day(first),
            end: end_of_day(last),
        }
    }

    /// Returns true if the timestamp falls inside the window.
    pub fn contains(&self, timestamp: DateTime<Utc>) -> bool {
        self.start <= timestamp && timestamp <= self.end
    }

    /// The window of equal length that ends immediately before this one.
    ///
    /// Used for period-over-period comparisons. Both ends clamp to the
    /// earliest representable instant.
    pub fn previous(&self) -> Self {
        let length = self.end - self.start;
        let end = self
            .start
            .checked_sub_signed(Duration::milliseconds(1))
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        Self {
            start: end.checked_sub_signed(length).unwrap_or(DateTime::<Utc>::MIN_UTC),
            end,
        }
    }

    /// First calendar day of the window.
    pub fn start_date(&self) -> NaiveDate {
        self.start.date_naive()
    }

    /// Last calendar day of the window.
    pub fn end_date(&self) -> NaiveDate {
        self.end.date_naive()
    }

    /// Every `(year, month)` pair the window touches, oldest first.
    pub fn months(&self) -> Vec<(i32, u32)> {
        let (end_year, end_month) = (self.end.year(), self.end.month());
        let (mut year, mut month) = (self.start.year(), self.start.month());
        let mut months = Vec::new();
        while (year, month) <= (end_year, end_month) {
            months.push((year, month));
            (year, month) = next_month(year, month);
        }
        months
    }
}

/// Returns midnight UTC at the start of the given day.
pub fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// Returns `23:59:59.999` UTC on the given day.
pub fn end_of_day(date: NaiveDate) -> DateTime<Utc> {
    // 23:59:59.999 always exists, so this cannot fail.
    let time = NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or(NaiveTime::MIN);
    date.and_time(time).and_utc()
}

fn first_of_month(year: i32, month: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(NaiveDate::MIN)
}

fn last_of_month(year: i32, month: u32) -> NaiveDate {
    let (next_year, next_month) = next_month(year, month);
    first_of_month(next_year, next_month)
        .pred_opt()
        .unwrap_or(NaiveDate::MIN)
}

fn next_month(year: i32, month: u32) -> (i32, u32) {
    if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    }
}

fn previous_month(year: i32, month: u32) -> (i32, u32) {
    if month == 1 {
        (year - 1, 12)
    } else {
        (year, month - 1)
    }
}

/// Named reporting periods offered by the dashboard and pre-warmed by the warmer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PeriodPreset {
    #[serde(rename = "7d")]
    Last7Days,
    #[serde(rename = "30d")]
    Last30Days,
    #[serde(rename = "90d")]
    Last90Days,
    #[serde(rename = "ytd")]
    YearToDate,
}

impl PeriodPreset {
    /// All presets in display order.
    pub const ALL: [PeriodPreset; 4] = [
        PeriodPreset::Last7Days,
        PeriodPreset::Last30Days,
        PeriodPreset::Last90Days,
        PeriodPreset::YearToDate,
    ];

    /// Short token used in query strings and cache keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            PeriodPreset::Last7Days => "7d",
            PeriodPreset::Last30Days => "30d",
            PeriodPreset::Last90Days => "90d",
            PeriodPreset::YearToDate => "ytd",
        }
    }

    /// Resolves the preset relative to `today`.
    pub fn window(&self, today: NaiveDate) -> TimeWindow {
        match self {
            PeriodPreset::Last7Days => TimeWindow::trailing_days(today, 7),
            PeriodPreset::Last30Days => TimeWindow::trailing_days(today, 30),
            PeriodPreset::Last90Days => TimeWindow::trailing_days(today, 90),
            PeriodPreset::YearToDate => TimeWindow {
                start: start_of_day(first_of_month(today.year(), 1)),
                end: end_of_day(today),
            },
        }
    }
}

impl fmt::Display for PeriodPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PeriodPreset {
    type Err = DateRangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "7d" => Ok(PeriodPreset::Last7Days),
            "30d" => Ok(PeriodPreset::Last30Days),
            "90d" => Ok(PeriodPreset::Last90Days),
            "ytd" => Ok(PeriodPreset::YearToDate),
            other => Err(DateRangeError::UnknownPeriod(other.to_string())),
        }
    }
}

/// Filter for invoice queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InvoiceFilter {
    /// Restrict to one shop.
    pub shop_id: Option<Uuid>,
    /// Restrict to invoices issued inside the window.
    pub window: Option<TimeWindow>,
}

impl InvoiceFilter {
    /// Returns true if the invoice passes the filter.
    pub fn matches(&self, shop_id: Uuid, issued_at: DateTime<Utc>) -> bool {
        self.shop_id.is_none_or(|id| id == shop_id)
            && self.window.is_none_or(|w| w.contains(issued_at))
    }
}

/// Filter for transfer queries. Results are ordered newest first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransferFilter {
    /// Restrict to transfers sent from or received by one shop.
    pub shop_id: Option<Uuid>,
    /// Restrict to transfers created inside the window.
    pub window: Option<TimeWindow>,
    /// Maximum number of transfers to return.
    pub limit: Option<usize>,
}
