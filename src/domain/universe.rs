//! Asset universe parsing and data-availability validation.

use std::collections::HashSet;

use crate::domain::error::MacrotraderError;
use crate::ports::data_port::DataPort;

/// A year of monthly closes: the least history worth backtesting on.
pub const MIN_PRICE_OBSERVATIONS: usize = 13;

#[derive(Debug, Clone)]
pub struct Universe {
    pub assets: Vec<String>,
}

impl Universe {
    pub fn count(&self) -> usize {
        self.assets.len()
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum UniverseError {
    #[error("empty token in asset list")]
    EmptyToken,

    #[error("duplicate asset: {0}")]
    DuplicateAsset(String),
}

/// Parse a comma-separated asset list: trim, uppercase, reject empties and
/// duplicates. Order is preserved and fixes the weight-matrix columns.
pub fn parse_assets(input: &str) -> Result<Vec<String>, UniverseError> {
    let mut assets = Vec::new();
    let mut seen = HashSet::new();

    for token in input.split(',') {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(UniverseError::EmptyToken);
        }
        let asset = trimmed.to_uppercase();
        if seen.contains(&asset) {
            return Err(UniverseError::DuplicateAsset(asset));
        }
        seen.insert(asset.clone());
        assets.push(asset);
    }

    Ok(assets)
}

pub struct UniverseValidationResult {
    pub universe: Universe,
    pub skipped: Vec<SkippedAsset>,
}

#[derive(Debug, Clone)]
pub struct SkippedAsset {
    pub asset: String,
    pub reason: SkipReason,
}

#[derive(Debug, Clone)]
pub enum SkipReason {
    NoData,
    InsufficientObservations { observations: usize },
}

/// Check each asset has price data worth backtesting on; warn and skip the
/// ones that don't. Only a fully empty universe is an error.
pub fn validate_universe(
    data_port: &dyn DataPort,
    assets: Vec<String>,
) -> Result<UniverseValidationResult, MacrotraderError> {
    let mut valid_assets = Vec::new();
    let mut skipped = Vec::new();

    for asset in assets {
        let prices = match data_port.fetch_prices(&asset) {
            Ok(series) => series,
            Err(e) => {
                eprintln!("Warning: skipping {} ({})", asset, e);
                skipped.push(SkippedAsset {
                    asset: asset.clone(),
                    reason: SkipReason::NoData,
                });
                continue;
            }
        };

        if prices.is_empty() {
            eprintln!("Warning: skipping {} (no data found)", asset);
            skipped.push(SkippedAsset {
                asset: asset.clone(),
                reason: SkipReason::NoData,
            });
            continue;
        }

        let monthly = prices.resample_month_end();
        if monthly.len() < MIN_PRICE_OBSERVATIONS {
            eprintln!(
                "Warning: skipping {} (only {} monthly observations, minimum {} required)",
                asset,
                monthly.len(),
                MIN_PRICE_OBSERVATIONS
            );
            skipped.push(SkippedAsset {
                asset: asset.clone(),
                reason: SkipReason::InsufficientObservations {
                    observations: monthly.len(),
                },
            });
            continue;
        }

        eprintln!("  {}: {} monthly observations [OK]", asset, monthly.len());
        valid_assets.push(asset);
    }

    if valid_assets.is_empty() {
        return Err(MacrotraderError::InsufficientData {
            name: "all assets".to_string(),
            observations: 0,
            minimum: MIN_PRICE_OBSERVATIONS,
        });
    }

    if !skipped.is_empty() {
        eprintln!(
            "Backtesting {} of {} assets",
            valid_assets.len(),
            valid_assets.len() + skipped.len()
        );
    }

    Ok(UniverseValidationResult {
        universe: Universe {
            assets: valid_assets,
        },
        skipped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_assets_basic() {
        let result = parse_assets("SPY,TLT,GLD").unwrap();
        assert_eq!(result, vec!["SPY", "TLT", "GLD"]);
    }

    #[test]
    fn parse_assets_with_whitespace() {
        let result = parse_assets("  SPY , TLT ,GLD  ").unwrap();
        assert_eq!(result, vec!["SPY", "TLT", "GLD"]);
    }

    #[test]
    fn parse_assets_uppercases() {
        let result = parse_assets("spy,tlt").unwrap();
        assert_eq!(result, vec!["SPY", "TLT"]);
    }

    #[test]
    fn parse_assets_single() {
        let result = parse_assets("SPY").unwrap();
        assert_eq!(result, vec!["SPY"]);
    }

    #[test]
    fn parse_assets_empty_token() {
        let result = parse_assets("SPY,,TLT");
        assert!(matches!(result, Err(UniverseError::EmptyToken)));
    }

    #[test]
    fn parse_assets_duplicate() {
        let result = parse_assets("SPY,TLT,spy");
        assert!(matches!(result, Err(UniverseError::DuplicateAsset(s)) if s == "SPY"));
    }

    #[test]
    fn universe_count() {
        let universe = Universe {
            assets: vec!["SPY".to_string(), "TLT".to_string()],
        };
        assert_eq!(universe.count(), 2);
    }
}
