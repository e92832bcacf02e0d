//! Performance metrics over the monthly equity curve.

use chrono::NaiveDate;

const MONTHS_PER_YEAR: f64 = 12.0;
const DAYS_PER_YEAR: f64 = 365.25;
const MIN_VOL: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EquityPoint {
    pub date: NaiveDate,
    pub equity: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerformanceSummary {
    pub cagr: f64,
    pub vol: f64,
    pub sharpe: f64,
    pub max_drawdown: f64,
    pub calmar: f64,
}

impl PerformanceSummary {
    pub fn zero() -> Self {
        PerformanceSummary {
            cagr: 0.0,
            vol: 0.0,
            sharpe: 0.0,
            max_drawdown: 0.0,
            calmar: 0.0,
        }
    }

    /// Name → value pairs in reporting order.
    pub fn named_metrics(&self) -> [(&'static str, f64); 5] {
        [
            ("CAGR", self.cagr),
            ("Vol", self.vol),
            ("Sharpe", self.sharpe),
            ("MDD", self.max_drawdown),
            ("Calmar", self.calmar),
        ]
    }

    /// Reduce an equity curve to scalar metrics. Curves with fewer than
    /// 2 points (no derivable period return) give the all-zero summary.
    pub fn compute(curve: &[EquityPoint]) -> Self {
        if curve.len() < 2 {
            return Self::zero();
        }

        let returns: Vec<f64> = curve
            .windows(2)
            .map(|pair| {
                if pair[0].equity != 0.0 {
                    pair[1].equity / pair[0].equity - 1.0
                } else {
                    0.0
                }
            })
            .collect();
        if returns.is_empty() {
            return Self::zero();
        }

        let first = &curve[0];
        let last = &curve[curve.len() - 1];
        let years = (last.date - first.date).num_days() as f64 / DAYS_PER_YEAR;
        let cagr = if years > 0.0 && first.equity > 0.0 {
            (last.equity / first.equity).powf(1.0 / years) - 1.0
        } else {
            0.0
        };

        let mean = returns.iter().sum::<f64>() / returns.len() as f64;
        let vol = annualized_vol(&returns);
        let sharpe = if vol > MIN_VOL {
            mean * MONTHS_PER_YEAR / vol
        } else {
            0.0
        };

        let max_drawdown = compute_max_drawdown(curve);
        let calmar = if max_drawdown < 0.0 {
            mean * MONTHS_PER_YEAR / max_drawdown.abs()
        } else {
            0.0
        };

        PerformanceSummary {
            cagr,
            vol,
            sharpe,
            max_drawdown,
            calmar,
        }
    }
}

/// Annualized volatility of monthly returns: population standard
/// deviation × √12. NaN for an empty slice.
pub fn annualized_vol(monthly_returns: &[f64]) -> f64 {
    if monthly_returns.is_empty() {
        return f64::NAN;
    }
    let n = monthly_returns.len() as f64;
    let mean = monthly_returns.iter().sum::<f64>() / n;
    let variance = monthly_returns
        .iter()
        .map(|r| {
            let d = r - mean;
            d * d
        })
        .sum::<f64>()
        / n;
    variance.sqrt() * MONTHS_PER_YEAR.sqrt()
}

/// Minimum of equity / running-peak − 1; always ≤ 0.
fn compute_max_drawdown(curve: &[EquityPoint]) -> f64 {
    let mut peak = f64::MIN;
    let mut max_dd = 0.0f64;
    for point in curve {
        if point.equity > peak {
            peak = point.equity;
        }
        if peak > 0.0 {
            let dd = point.equity / peak - 1.0;
            if dd < max_dd {
                max_dd = dd;
            }
        }
    }
    max_dd
}
