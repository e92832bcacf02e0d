//! Regime → target weight mapping.

use std::collections::BTreeMap;

use crate::domain::matrix::{AssetMatrix, MatrixRow};
use crate::domain::regime::{Regime, RegimePoint};

/// Raw per-regime allocations, keyed by regime label then asset.
pub type RegimeWeights = BTreeMap<Regime, BTreeMap<String, f64>>;

/// Map each labeled date to a normalized weight row over the universe.
///
/// Universe assets missing from the regime's allocation get 0; configured
/// assets outside the universe are ignored. Rows with a positive raw sum
/// are renormalized to 1; a regime with no configured allocation leaves
/// the all-zero row in place (silent de-risking, not an error).
pub fn map_weights(
    regimes: &[RegimePoint],
    weight_map: &RegimeWeights,
    universe: &[String],
) -> AssetMatrix {
    let rows = regimes
        .iter()
        .map(|point| {
            let mut values = vec![0.0; universe.len()];
            if let Some(allocation) = weight_map.get(&point.regime) {
                for (i, asset) in universe.iter().enumerate() {
                    if let Some(&weight) = allocation.get(asset) {
                        values[i] = weight;
                    }
                }
            }
            let sum: f64 = values.iter().sum();
            if sum > 0.0 {
                for value in &mut values {
                    *value /= sum;
                }
            }
            MatrixRow {
                date: point.date,
                values,
            }
        })
        .collect();

    AssetMatrix {
        assets: universe.to_vec(),
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use proptest::prelude::*;

    fn point(month: u32, regime: Regime) -> RegimePoint {
        RegimePoint {
            date: NaiveDate::from_ymd_opt(2024, month, 28).unwrap(),
            score: 0.0,
            delta: 0.0,
            regime,
        }
    }

    fn allocation(entries: &[(&str, f64)]) -> BTreeMap<String, f64> {
        entries
            .iter()
            .map(|(asset, weight)| (asset.to_string(), *weight))
            .collect()
    }

    fn universe() -> Vec<String> {
        vec!["SPY".into(), "TLT".into(), "GLD".into()]
    }

    #[test]
    fn rows_are_renormalized() {
        let mut weight_map = RegimeWeights::new();
        weight_map.insert(
            Regime::Expansion,
            allocation(&[("SPY", 3.0), ("TLT", 1.0)]),
        );
        let matrix = map_weights(&[point(1, Regime::Expansion)], &weight_map, &universe());
        assert_eq!(matrix.rows[0].values, vec![0.75, 0.25, 0.0]);
    }

    #[test]
    fn unmapped_regime_yields_all_zero_row() {
        let mut weight_map = RegimeWeights::new();
        weight_map.insert(Regime::Expansion, allocation(&[("SPY", 1.0)]));
        let matrix = map_weights(&[point(1, Regime::Recession)], &weight_map, &universe());
        assert_eq!(matrix.rows[0].values, vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn assets_outside_universe_are_ignored() {
        let mut weight_map = RegimeWeights::new();
        weight_map.insert(
            Regime::Recovery,
            allocation(&[("SPY", 1.0), ("BTC", 9.0)]),
        );
        let matrix = map_weights(&[point(1, Regime::Recovery)], &weight_map, &universe());
        assert_eq!(matrix.assets, universe());
        assert_eq!(matrix.rows[0].values, vec![1.0, 0.0, 0.0]);
    }

    #[test]
    fn one_row_per_labeled_date() {
        let mut weight_map = RegimeWeights::new();
        weight_map.insert(Regime::Expansion, allocation(&[("SPY", 1.0)]));
        weight_map.insert(Regime::Recession, allocation(&[("TLT", 1.0)]));
        let regimes = vec![
            point(1, Regime::Expansion),
            point(2, Regime::Recession),
            point(3, Regime::Slowdown),
        ];
        let matrix = map_weights(&regimes, &weight_map, &universe());
        assert_eq!(matrix.rows.len(), 3);
        assert_eq!(matrix.rows[0].values, vec![1.0, 0.0, 0.0]);
        assert_eq!(matrix.rows[1].values, vec![0.0, 1.0, 0.0]);
        assert_eq!(matrix.rows[2].values, vec![0.0, 0.0, 0.0]);
    }

    proptest! {
        #[test]
        fn row_sums_are_one_or_zero(raw in proptest::collection::vec(0.0f64..10.0, 3)) {
            let mut weight_map = RegimeWeights::new();
            weight_map.insert(
                Regime::Expansion,
                allocation(&[("SPY", raw[0]), ("TLT", raw[1]), ("GLD", raw[2])]),
            );
            let matrix = map_weights(&[point(1, Regime::Expansion)], &weight_map, &universe());
            let sum: f64 = matrix.rows[0].values.iter().sum();
            prop_assert!((sum - 1.0).abs() < 1e-9 || sum == 0.0);
        }
    }
}
