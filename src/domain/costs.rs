//! Turnover-based transaction cost model.

use crate::domain::matrix::AssetMatrix;

/// Per-date return drag from rebalancing, as a non-positive series aligned
/// with the weight rows. Turnover is the L1 distance between consecutive
/// weight rows; the first date has no prior row and costs nothing. A rate
/// of 0 bp (or less) costs nothing everywhere.
///
/// Costs are charged on unlevered weight turnover; the leverage multiplier
/// does not scale them.
pub fn cost_series(weights: &AssetMatrix, cost_bp: f64) -> Vec<f64> {
    if weights.is_empty() || cost_bp <= 0.0 {
        return vec![0.0; weights.rows.len()];
    }
    let rate = cost_bp / 10_000.0;
    let mut costs = Vec::with_capacity(weights.rows.len());
    for (i, row) in weights.rows.iter().enumerate() {
        if i == 0 {
            costs.push(0.0);
            continue;
        }
        let turnover: f64 = row
            .values
            .iter()
            .zip(&weights.rows[i - 1].values)
            .map(|(current, previous)| (current - previous).abs())
            .sum();
        costs.push(-turnover * rate);
    }
    costs
}
