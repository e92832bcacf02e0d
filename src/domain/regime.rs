//! Regime labels and classification.
//!
//! A regime is a pure function of the composite score and its 3-period
//! positional change: no memory across dates beyond the lag baked into
//! the delta.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;

use crate::domain::series::TimeSeries;

/// Number of observations the score delta looks back over.
pub const DELTA_PERIODS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Regime {
    Expansion,
    Slowdown,
    Recovery,
    Recession,
}

impl Regime {
    pub const ALL: [Regime; 4] = [
        Regime::Expansion,
        Regime::Slowdown,
        Regime::Recovery,
        Regime::Recession,
    ];
}

impl fmt::Display for Regime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Regime::Expansion => "expansion",
            Regime::Slowdown => "slowdown",
            Regime::Recovery => "recovery",
            Regime::Recession => "recession",
        };
        write!(f, "{}", label)
    }
}

impl FromStr for Regime {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "expansion" => Ok(Regime::Expansion),
            "slowdown" => Ok(Regime::Slowdown),
            "recovery" => Ok(Regime::Recovery),
            "recession" => Ok(Regime::Recession),
            other => Err(format!("unknown regime label: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RegimePoint {
    pub date: NaiveDate,
    pub score: f64,
    pub delta: f64,
    pub regime: Regime,
}

/// Decision table over score level and trailing change.
pub fn classify(score: f64, delta: f64) -> Regime {
    match (score > 0.0, delta > 0.0) {
        (true, true) => Regime::Expansion,
        (true, false) => Regime::Slowdown,
        (false, true) => Regime::Recovery,
        (false, false) => Regime::Recession,
    }
}

/// Label every score date where both the score and its 3-period positional
/// delta are defined. Earlier dates are dropped, never raised on.
pub fn classify_series(score: &TimeSeries) -> Vec<RegimePoint> {
    let deltas = score.diff(DELTA_PERIODS);
    score
        .points
        .iter()
        .zip(&deltas.points)
        .filter(|(s, d)| s.valid && d.valid)
        .map(|(s, d)| RegimePoint {
            date: s.date,
            score: s.value,
            delta: d.value,
            regime: classify(s.value, d.value),
        })
        .collect()
}
