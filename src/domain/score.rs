//! Composite macro score aggregation.
//!
//! Each indicator is resampled to month-end, standardized with a trailing
//! rolling z-score (population statistics, window inclusive of the current
//! observation) and combined with fixed polarity. The equity index is first
//! reduced to its 6-month momentum. Per date the composite is the mean of
//! the polarity-adjusted z-scores that are defined that date (skip-mean);
//! dates where none is defined are dropped entirely.

use std::collections::BTreeMap;

use crate::domain::series::{SeriesPoint, TimeSeries};

/// Trailing observations used for z-score standardization.
pub const ZSCORE_WINDOW: usize = 36;

/// Lookback, in months, of the equity momentum transform.
pub const EQUITY_MOMENTUM_MONTHS: usize = 6;

/// The macro indicator inputs the composite score is built from.
///
/// `activity`, `output_growth`, `term_spread` and the equity momentum enter
/// with positive polarity; `unemployment_change` and `credit_spread` with
/// negative polarity. `equity_index` is a price level, not a rate of change.
#[derive(Debug, Clone, Default)]
pub struct MacroIndicators {
    pub activity: TimeSeries,
    pub output_growth: TimeSeries,
    pub unemployment_change: TimeSeries,
    pub term_spread: TimeSeries,
    pub credit_spread: TimeSeries,
    pub equity_index: TimeSeries,
}

pub fn composite_score(indicators: &MacroIndicators, window: usize) -> TimeSeries {
    let equity_momentum = indicators
        .equity_index
        .resample_month_end()
        .pct_change(EQUITY_MOMENTUM_MONTHS);

    let standardized: [(TimeSeries, f64); 6] = [
        (standardize(&indicators.activity, window), 1.0),
        (standardize(&indicators.output_growth, window), 1.0),
        (standardize(&indicators.unemployment_change, window), -1.0),
        (standardize(&indicators.term_spread, window), 1.0),
        (standardize(&indicators.credit_spread, window), -1.0),
        (equity_momentum.rolling_zscore(window), 1.0),
    ];

    let mut sums: BTreeMap<chrono::NaiveDate, (f64, usize)> = BTreeMap::new();
    for (series, polarity) in &standardized {
        for point in series.points.iter().filter(|p| p.valid) {
            let entry = sums.entry(point.date).or_insert((0.0, 0));
            entry.0 += polarity * point.value;
            entry.1 += 1;
        }
    }

    let points = sums
        .into_iter()
        .map(|(date, (sum, count))| SeriesPoint {
            date,
            valid: true,
            value: sum / count as f64,
        })
        .collect();
    TimeSeries { points }
}

fn standardize(series: &TimeSeries, window: usize) -> TimeSeries {
    series.resample_month_end().rolling_zscore(window)
}
