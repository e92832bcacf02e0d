//! Volatility-targeting leverage overlay.
//!
//! Leverage at position i is decided from the strictly-prior return slice
//! `[max(0, i - lookback), i)` — the current period never informs its own
//! multiplier — and is applied contemporaneously, modeling a decision made
//! at the start of the period and held through it.

use crate::domain::metrics::annualized_vol;

pub const DEFAULT_TARGET_VOL: f64 = 0.12;
pub const DEFAULT_LOOKBACK_MONTHS: usize = 12;
pub const DEFAULT_L_MIN: f64 = 0.8;
pub const DEFAULT_L_MAX: f64 = 1.5;

/// Realized vol below this is treated as undefined to avoid division
/// blow-up in near-zero-vol stretches.
const MIN_REALIZED_VOL: f64 = 1e-6;

#[derive(Debug, Clone, PartialEq)]
pub struct LeverageConfig {
    pub enabled: bool,
    pub target_vol: f64,
    pub lookback_months: usize,
    pub l_min: f64,
    pub l_max: f64,
}

impl Default for LeverageConfig {
    fn default() -> Self {
        LeverageConfig {
            enabled: false,
            target_vol: DEFAULT_TARGET_VOL,
            lookback_months: DEFAULT_LOOKBACK_MONTHS,
            l_min: DEFAULT_L_MIN,
            l_max: DEFAULT_L_MAX,
        }
    }
}

/// One multiplier per return observation. The first is 1.0 unconditionally
/// (no history); positions whose trailing window has fewer than 2
/// observations, or whose realized vol is undefined or ~zero, also get
/// 1.0; everything else is target/realized clamped to [l_min, l_max].
pub fn leverage_series(returns: &[f64], config: &LeverageConfig) -> Vec<f64> {
    let mut series = Vec::with_capacity(returns.len());
    for i in 0..returns.len() {
        if i == 0 {
            series.push(1.0);
            continue;
        }
        let start = i.saturating_sub(config.lookback_months);
        let window = &returns[start..i];
        if window.len() < 2 {
            series.push(1.0);
            continue;
        }
        let vol = annualized_vol(window);
        if !vol.is_finite() || vol < MIN_REALIZED_VOL {
            series.push(1.0);
        } else {
            // floor first, then cap: l_max wins over an inverted l_min,
            // and no bound ordering can panic the core
            let raw = config.target_vol / vol;
            series.push(raw.max(config.l_min).min(config.l_max));
        }
    }
    series
}
