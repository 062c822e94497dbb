//! Trend estimation for summary metrics.
//!
//! Estimators are injected into the summary aggregation so that the pure
//! aggregation stays deterministic under test.

use rand::Rng;

use super::types::{Trend, TrendDirection};

/// Produces the change indicator for a summary metric.
pub trait TrendEstimator: Send + Sync {
    /// Estimates the trend of `current` given the value of the same metric in
    /// the preceding period, when one is known.
    fn estimate(&self, current: f64, previous: Option<f64>) -> Option<Trend>;
}

/// Compares a metric against the equal-length window immediately before it.
///
/// Yields no trend when there is no previous value or the previous value is
/// zero while the current one is not.
///
/// # Examples
///
/// ```
/// use stockroom_core::dashboard::{PeriodOverPeriod, TrendDirection, TrendEstimator};
///
/// let trend = PeriodOverPeriod.estimate(150.0, Some(100.0)).unwrap();
/// assert_eq!(trend.direction, TrendDirection::Up);
/// assert_eq!(trend.percent, 50.0);
///
/// assert!(PeriodOverPeriod.estimate(150.0, None).is_none());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct PeriodOverPeriod;

impl TrendEstimator for PeriodOverPeriod {
    fn estimate(&self, current: f64, previous: Option<f64>) -> Option<Trend> {
        let previous = previous?;
        if previous == 0.0 {
            return (current == 0.0).then(|| Trend::new(TrendDirection::Flat, 0.0));
        }
        Some(Trend::from_change((current - previous) / previous.abs() * 100.0))
    }
}

/// Always returns the same trend.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedTrend(pub Option<Trend>);

impl TrendEstimator for FixedTrend {
    fn estimate(&self, _current: f64, _previous: Option<f64>) -> Option<Trend> {
        self.0
    }
}

/// Random cosmetic trend for demo deployments.
///
/// The result carries no information about the data and is for presentation
/// only.
#[derive(Debug, Clone, Copy)]
pub struct DecorativeTrend {
    /// Largest percentage that may be shown.
    pub max_percent: f64,
}

impl Default for DecorativeTrend {
    fn default() -> Self {
        Self { max_percent: 15.0 }
    }
}

impl TrendEstimator for DecorativeTrend {
    fn estimate(&self, _current: f64, _previous: Option<f64>) -> Option<Trend> {
        let mut rng = rand::rng();
        let change = rng.random_range(0.0..=self.max_percent.max(0.0));
        let signed = if rng.random_bool(0.5) { change } else { -change };
        Some(Trend::from_change(signed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period_over_period_down() {
        let trend = PeriodOverPeriod.estimate(75.0, Some(100.0)).unwrap();
        assert_eq!(trend.direction, TrendDirection::Down);
        assert_eq!(trend.percent, 25.0);
    }

    #[test]
    fn test_period_over_period_zero_baseline() {
        assert_eq!(
            PeriodOverPeriod.estimate(0.0, Some(0.0)),
            Some(Trend::new(TrendDirection::Flat, 0.0))
        );
        assert_eq!(PeriodOverPeriod.estimate(10.0, Some(0.0)), None);
    }

    #[test]
    fn test_fixed_trend_ignores_input() {
        let fixed = FixedTrend(Some(Trend::new(TrendDirection::Up, 3.0)));
        assert_eq!(fixed.estimate(1.0, None), fixed.estimate(99.0, Some(1.0)));
        assert_eq!(FixedTrend(None).estimate(1.0, Some(2.0)), None);
    }

    #[test]
    fn test_decorative_trend_stays_in_bounds() {
        let estimator = DecorativeTrend { max_percent: 5.0 };
        for _ in 0..100 {
            let trend = estimator.estimate(0.0, None).unwrap();
            assert!(trend.percent <= 5.0);
            assert!(trend.percent >= 0.0);
        }
    }
}
