//! Backtest engine: stage sequencing for one run.
//!
//! Stages run in strict dependency order — score, regimes, weights,
//! returns, leverage, costs, equity, summary — each consuming the previous
//! stage's complete output plus immutable configuration. The weight matrix
//! is shifted forward one position before joining with returns: a regime
//! observed with data through month t weights the portfolio from month
//! t+1, never its own month.

use chrono::NaiveDate;

use crate::domain::costs::cost_series;
use crate::domain::leverage::{leverage_series, LeverageConfig};
use crate::domain::matrix::{align_rows, monthly_return_matrix, AssetMatrix};
use crate::domain::metrics::{EquityPoint, PerformanceSummary};
use crate::domain::regime::{classify_series, RegimePoint};
use crate::domain::score::{composite_score, MacroIndicators, ZSCORE_WINDOW};
use crate::domain::series::{SeriesPoint, TimeSeries};
use crate::domain::weights::{map_weights, RegimeWeights};

#[derive(Debug, Clone, Default)]
pub struct BacktestConfig {
    pub universe: Vec<String>,
    pub weight_map: RegimeWeights,
    pub transaction_cost_bp: f64,
    pub leverage: LeverageConfig,
}

#[derive(Debug, Clone)]
pub struct BacktestResult {
    pub score: TimeSeries,
    pub regimes: Vec<RegimePoint>,
    /// Weights as mapped from each date's regime, before the forward shift.
    pub weights: AssetMatrix,
    /// Shifted weights restricted to the traded date index.
    pub traded_weights: AssetMatrix,
    pub unlevered_returns: TimeSeries,
    pub leverage: TimeSeries,
    pub levered_returns: TimeSeries,
    pub costs: TimeSeries,
    pub equity: Vec<EquityPoint>,
    pub summary: PerformanceSummary,
}

pub fn run_backtest(
    indicators: &MacroIndicators,
    prices: &[(String, TimeSeries)],
    config: &BacktestConfig,
) -> BacktestResult {
    let score = composite_score(indicators, ZSCORE_WINDOW);
    let regimes = classify_series(&score);
    let weights = map_weights(&regimes, &config.weight_map, &config.universe);

    let returns = monthly_return_matrix(prices, &config.universe);
    let (traded_weights, returns) = align_rows(&weights.shift_forward(), &returns);

    let dates: Vec<NaiveDate> = traded_weights.rows.iter().map(|row| row.date).collect();
    let unlevered: Vec<f64> = traded_weights
        .rows
        .iter()
        .zip(&returns.rows)
        .map(|(weight_row, return_row)| portfolio_return(&weight_row.values, &return_row.values))
        .collect();

    let leverage = if config.leverage.enabled {
        leverage_series(&unlevered, &config.leverage)
    } else {
        vec![1.0; unlevered.len()]
    };
    let levered: Vec<f64> = unlevered
        .iter()
        .zip(&leverage)
        .map(|(r, l)| r * l)
        .collect();

    let costs = cost_series(&traded_weights, config.transaction_cost_bp);
    let equity = build_equity_curve(&dates, &levered, &costs);
    let summary = PerformanceSummary::compute(&equity);

    BacktestResult {
        score,
        regimes,
        weights,
        traded_weights,
        unlevered_returns: dated(&dates, &unlevered),
        leverage: dated(&dates, &leverage),
        levered_returns: dated(&dates, &levered),
        costs: dated(&dates, &costs),
        equity,
        summary,
    }
}

/// Σ weight × return over the universe. Assets with no return observation
/// that month (NaN) contribute nothing.
fn portfolio_return(weights: &[f64], returns: &[f64]) -> f64 {
    weights
        .iter()
        .zip(returns)
        .map(|(w, r)| w * r)
        .filter(|product| product.is_finite())
        .sum()
}

/// Cumulative product of (1 + levered + cost), no base-value row: the first
/// curve value already reflects the first period.
pub fn build_equity_curve(dates: &[NaiveDate], levered: &[f64], costs: &[f64]) -> Vec<EquityPoint> {
    let mut equity = 1.0;
    dates
        .iter()
        .zip(levered.iter().zip(costs))
        .map(|(&date, (r, c))| {
            equity *= 1.0 + r + c;
            EquityPoint { date, equity }
        })
        .collect()
}

fn dated(dates: &[NaiveDate], values: &[f64]) -> TimeSeries {
    TimeSeries {
        points: dates
            .iter()
            .zip(values)
            .map(|(&date, &value)| SeriesPoint {
                date,
                valid: true,
                value,
            })
            .collect(),
    }
}
