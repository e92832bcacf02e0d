//! Configuration validation.
//!
//! All checks run at the loader boundary, before a backtest starts; the
//! core itself accepts any well-typed configuration and degrades
//! gracefully instead of raising.

use crate::domain::error::MacrotraderError;
use crate::domain::leverage;
use crate::domain::regime::Regime;
use crate::domain::universe::parse_assets;
use crate::ports::config_port::ConfigPort;

pub const WEIGHTS_SECTION_PREFIX: &str = "weights.";

pub fn validate_backtest_config(config: &dyn ConfigPort) -> Result<(), MacrotraderError> {
    validate_data_dir(config)?;
    validate_universe_list(config)?;
    validate_transaction_cost(config)?;
    validate_leverage(config)?;
    validate_weight_sections(config)?;
    Ok(())
}

fn validate_data_dir(config: &dyn ConfigPort) -> Result<(), MacrotraderError> {
    match config.get_string("data", "data_dir") {
        Some(s) if !s.trim().is_empty() => Ok(()),
        _ => Err(MacrotraderError::ConfigMissing {
            section: "data".to_string(),
            key: "data_dir".to_string(),
        }),
    }
}

fn validate_universe_list(config: &dyn ConfigPort) -> Result<(), MacrotraderError> {
    let raw = config
        .get_string("backtest", "universe")
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| MacrotraderError::ConfigMissing {
            section: "backtest".to_string(),
            key: "universe".to_string(),
        })?;
    parse_assets(&raw).map_err(|e| MacrotraderError::ConfigInvalid {
        section: "backtest".to_string(),
        key: "universe".to_string(),
        reason: e.to_string(),
    })?;
    Ok(())
}

fn validate_transaction_cost(config: &dyn ConfigPort) -> Result<(), MacrotraderError> {
    let value = config.get_double("backtest", "transaction_cost_bp", 0.0);
    if value < 0.0 {
        return Err(MacrotraderError::ConfigInvalid {
            section: "backtest".to_string(),
            key: "transaction_cost_bp".to_string(),
            reason: "transaction_cost_bp must be non-negative".to_string(),
        });
    }
    Ok(())
}

fn validate_leverage(config: &dyn ConfigPort) -> Result<(), MacrotraderError> {
    if !config.get_bool("leverage", "use", false) {
        return Ok(());
    }

    let target_vol = config.get_double("leverage", "target_vol", leverage::DEFAULT_TARGET_VOL);
    if target_vol <= 0.0 {
        return Err(MacrotraderError::ConfigInvalid {
            section: "leverage".to_string(),
            key: "target_vol".to_string(),
            reason: "target_vol must be positive".to_string(),
        });
    }

    let lookback = config.get_int(
        "leverage",
        "lookback_months",
        leverage::DEFAULT_LOOKBACK_MONTHS as i64,
    );
    if lookback < 2 {
        return Err(MacrotraderError::ConfigInvalid {
            section: "leverage".to_string(),
            key: "lookback_months".to_string(),
            reason: "lookback_months must be at least 2".to_string(),
        });
    }

    let l_min = config.get_double("leverage", "l_min", leverage::DEFAULT_L_MIN);
    let l_max = config.get_double("leverage", "l_max", leverage::DEFAULT_L_MAX);
    if l_min <= 0.0 {
        return Err(MacrotraderError::ConfigInvalid {
            section: "leverage".to_string(),
            key: "l_min".to_string(),
            reason: "l_min must be positive".to_string(),
        });
    }
    if l_min > l_max {
        return Err(MacrotraderError::ConfigInvalid {
            section: "leverage".to_string(),
            key: "l_min".to_string(),
            reason: "l_min must not exceed l_max".to_string(),
        });
    }
    Ok(())
}

fn validate_weight_sections(config: &dyn ConfigPort) -> Result<(), MacrotraderError> {
    let mut found = false;
    for section in config.sections() {
        let Some(label) = section.strip_prefix(WEIGHTS_SECTION_PREFIX) else {
            continue;
        };
        found = true;
        label
            .parse::<Regime>()
            .map_err(|reason| MacrotraderError::ConfigInvalid {
                section: section.clone(),
                key: label.to_string(),
                reason,
            })?;
        for key in config.get_keys(&section) {
            let value = config.get_double(&section, &key, f64::NAN);
            if !value.is_finite() || value < 0.0 {
                return Err(MacrotraderError::ConfigInvalid {
                    section: section.clone(),
                    key,
                    reason: "raw weight must be a non-negative number".to_string(),
                });
            }
        }
    }
    if !found {
        return Err(MacrotraderError::ConfigMissing {
            section: "weights.<regime>".to_string(),
            key: "at least one regime allocation".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::file_config_adapter::FileConfigAdapter;

    const VALID: &str = r#"
[data]
data_dir = ./data

[backtest]
universe = SPY,TLT,GLD
transaction_cost_bp = 5

[leverage]
use = true
target_vol = 0.12
lookback_months = 12
l_min = 0.8
l_max = 1.5

[weights.expansion]
SPY = 0.7
GLD = 0.3

[weights.recession]
TLT = 1.0
"#;

    fn adapter(content: &str) -> FileConfigAdapter {
        FileConfigAdapter::from_string(content).unwrap()
    }

    #[test]
    fn valid_config_passes() {
        assert!(validate_backtest_config(&adapter(VALID)).is_ok());
    }

    #[test]
    fn missing_data_dir_fails() {
        let content = VALID.replace("data_dir = ./data", "");
        let result = validate_backtest_config(&adapter(&content));
        assert!(matches!(
            result,
            Err(MacrotraderError::ConfigMissing { section, .. }) if section == "data"
        ));
    }

    #[test]
    fn missing_universe_fails() {
        let content = VALID.replace("universe = SPY,TLT,GLD", "");
        let result = validate_backtest_config(&adapter(&content));
        assert!(matches!(
            result,
            Err(MacrotraderError::ConfigMissing { key, .. }) if key == "universe"
        ));
    }

    #[test]
    fn duplicate_universe_asset_fails() {
        let content = VALID.replace("universe = SPY,TLT,GLD", "universe = SPY,SPY");
        assert!(validate_backtest_config(&adapter(&content)).is_err());
    }

    #[test]
    fn negative_cost_fails() {
        let content = VALID.replace("transaction_cost_bp = 5", "transaction_cost_bp = -1");
        assert!(validate_backtest_config(&adapter(&content)).is_err());
    }

    #[test]
    fn inverted_leverage_bounds_fail() {
        let content = VALID.replace("l_min = 0.8", "l_min = 2.0");
        assert!(validate_backtest_config(&adapter(&content)).is_err());
    }

    #[test]
    fn disabled_leverage_skips_bound_checks() {
        let content = VALID
            .replace("use = true", "use = false")
            .replace("l_min = 0.8", "l_min = 2.0");
        assert!(validate_backtest_config(&adapter(&content)).is_ok());
    }

    #[test]
    fn unknown_regime_section_fails() {
        let content = format!("{}\n[weights.boom]\nSPY = 1.0\n", VALID);
        assert!(validate_backtest_config(&adapter(&content)).is_err());
    }

    #[test]
    fn negative_raw_weight_fails() {
        let content = VALID.replace("TLT = 1.0", "TLT = -1.0");
        assert!(validate_backtest_config(&adapter(&content)).is_err());
    }

    #[test]
    fn missing_weight_sections_fail() {
        let content = r#"
[data]
data_dir = ./data

[backtest]
universe = SPY
"#;
        assert!(validate_backtest_config(&adapter(content)).is_err());
    }
}
