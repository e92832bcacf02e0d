//! Per-date, per-asset value matrices (prices, returns, weights).
//!
//! Columns follow the asset universe order. Return matrices use `NaN` for
//! per-asset months with no observation; weight matrices never hold `NaN`.

use chrono::NaiveDate;

use crate::domain::series::TimeSeries;

#[derive(Debug, Clone, PartialEq)]
pub struct MatrixRow {
    pub date: NaiveDate,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssetMatrix {
    pub assets: Vec<String>,
    pub rows: Vec<MatrixRow>,
}

impl AssetMatrix {
    pub fn empty(assets: Vec<String>) -> Self {
        AssetMatrix {
            assets,
            rows: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Shift values one position forward in the matrix's own date index:
    /// the row observed at position i is re-stamped with the date at
    /// position i+1, and the last row's values fall off. This is the
    /// look-ahead guard between regime observation and portfolio
    /// application.
    pub fn shift_forward(&self) -> AssetMatrix {
        let rows = self
            .rows
            .windows(2)
            .map(|pair| MatrixRow {
                date: pair[1].date,
                values: pair[0].values.clone(),
            })
            .collect();
        AssetMatrix {
            assets: self.assets.clone(),
            rows,
        }
    }

    fn row_at(&self, date: NaiveDate) -> Option<&MatrixRow> {
        self.rows
            .binary_search_by_key(&date, |row| row.date)
            .ok()
            .map(|i| &self.rows[i])
    }
}

/// Monthly simple returns per asset from raw price series, resampled to
/// month-end with last-observation semantics. Rows cover the union of
/// dates where at least one asset has a return; other assets get `NaN`.
pub fn monthly_return_matrix(prices: &[(String, TimeSeries)], universe: &[String]) -> AssetMatrix {
    let mut columns: Vec<TimeSeries> = Vec::with_capacity(universe.len());
    for asset in universe {
        let series = prices
            .iter()
            .find(|(name, _)| name == asset)
            .map(|(_, series)| series.resample_month_end().pct_change(1))
            .unwrap_or_default();
        columns.push(series);
    }

    let mut dates: Vec<NaiveDate> = columns
        .iter()
        .flat_map(|series| series.points.iter().filter(|p| p.valid).map(|p| p.date))
        .collect();
    dates.sort();
    dates.dedup();

    let rows = dates
        .into_iter()
        .map(|date| {
            let values = columns
                .iter()
                .map(|series| {
                    series
                        .points
                        .iter()
                        .find(|p| p.date == date && p.valid)
                        .map(|p| p.value)
                        .unwrap_or(f64::NAN)
                })
                .collect();
            MatrixRow { date, values }
        })
        .collect();

    AssetMatrix {
        assets: universe.to_vec(),
        rows,
    }
}

/// Restrict two matrices to their common date index (inner join); dates
/// present in only one are dropped.
pub fn align_rows(left: &AssetMatrix, right: &AssetMatrix) -> (AssetMatrix, AssetMatrix) {
    let mut left_rows = Vec::new();
    let mut right_rows = Vec::new();
    for row in &left.rows {
        if let Some(other) = right.row_at(row.date) {
            left_rows.push(row.clone());
            right_rows.push(other.clone());
        }
    }
    (
        AssetMatrix {
            assets: left.assets.clone(),
            rows: left_rows,
        },
        AssetMatrix {
            assets: right.assets.clone(),
            rows: right_rows,
        },
    )
}
