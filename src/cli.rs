//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::text_report_adapter::TextReportAdapter;
use crate::domain::backtest::{run_backtest, BacktestConfig};
use crate::domain::config_validation::{validate_backtest_config, WEIGHTS_SECTION_PREFIX};
use crate::domain::error::MacrotraderError;
use crate::domain::leverage::{self, LeverageConfig};
use crate::domain::regime::Regime;
use crate::domain::score::MacroIndicators;
use crate::domain::series::TimeSeries;
use crate::domain::universe::{parse_assets, validate_universe};
use crate::domain::weights::RegimeWeights;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

/// Default CSV file names per indicator role, overridable via
/// `[data] <role>_file = <name>`.
pub const INDICATOR_FILES: [(&str, &str); 6] = [
    ("activity", "PMI"),
    ("output_growth", "INDPRO_yoy"),
    ("unemployment_change", "UNRATE_chg3m"),
    ("term_spread", "TERM_10y_2y"),
    ("credit_spread", "CreditSpread"),
    ("equity_index", "SP500"),
];

#[derive(Parser, Debug)]
#[command(name = "macrotrader", about = "Macro regime portfolio backtester")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a backtest
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long)]
        dry_run: bool,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// List price series available in the data directory
    ListAssets {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Show the data range of each universe asset
    Info {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Backtest {
            config,
            output,
            dry_run,
        } => {
            if dry_run {
                run_dry_run(&config)
            } else {
                run_backtest_command(&config, output.as_ref())
            }
        }
        Command::Validate { config } => run_validate(&config),
        Command::ListAssets { config } => run_list_assets(&config),
        Command::Info { config } => run_info(&config),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = MacrotraderError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

/// Assemble the immutable backtest configuration from a validated config
/// source.
pub fn build_backtest_config(adapter: &dyn ConfigPort) -> Result<BacktestConfig, MacrotraderError> {
    let raw_universe =
        adapter
            .get_string("backtest", "universe")
            .ok_or_else(|| MacrotraderError::ConfigMissing {
                section: "backtest".into(),
                key: "universe".into(),
            })?;
    let universe = parse_assets(&raw_universe).map_err(|e| MacrotraderError::ConfigInvalid {
        section: "backtest".into(),
        key: "universe".into(),
        reason: e.to_string(),
    })?;

    Ok(BacktestConfig {
        universe,
        weight_map: build_weight_map(adapter)?,
        transaction_cost_bp: adapter.get_double("backtest", "transaction_cost_bp", 0.0),
        leverage: build_leverage_config(adapter),
    })
}

pub fn build_leverage_config(adapter: &dyn ConfigPort) -> LeverageConfig {
    LeverageConfig {
        enabled: adapter.get_bool("leverage", "use", false),
        target_vol: adapter.get_double("leverage", "target_vol", leverage::DEFAULT_TARGET_VOL),
        lookback_months: adapter.get_int(
            "leverage",
            "lookback_months",
            leverage::DEFAULT_LOOKBACK_MONTHS as i64,
        ) as usize,
        l_min: adapter.get_double("leverage", "l_min", leverage::DEFAULT_L_MIN),
        l_max: adapter.get_double("leverage", "l_max", leverage::DEFAULT_L_MAX),
    }
}

/// Collect `[weights.<regime>]` sections into the regime → asset → raw
/// weight map. Asset keys are uppercased to match the universe spelling.
pub fn build_weight_map(adapter: &dyn ConfigPort) -> Result<RegimeWeights, MacrotraderError> {
    let mut weight_map = RegimeWeights::new();
    for section in adapter.sections() {
        let Some(label) = section.strip_prefix(WEIGHTS_SECTION_PREFIX) else {
            continue;
        };
        let regime =
            Regime::from_str(label).map_err(|reason| MacrotraderError::ConfigInvalid {
                section: section.clone(),
                key: label.to_string(),
                reason,
            })?;
        let allocation = weight_map.entry(regime).or_default();
        for key in adapter.get_keys(&section) {
            let value = adapter.get_double(&section, &key, 0.0);
            allocation.insert(key.to_uppercase(), value);
        }
    }
    Ok(weight_map)
}

fn resolve_indicator_file(adapter: &dyn ConfigPort, role: &str, default: &str) -> String {
    adapter
        .get_string("data", &format!("{}_file", role))
        .unwrap_or_else(|| default.to_string())
}

pub fn load_indicators(
    data_port: &dyn DataPort,
    adapter: &dyn ConfigPort,
) -> Result<MacroIndicators, MacrotraderError> {
    let mut series: Vec<TimeSeries> = Vec::with_capacity(INDICATOR_FILES.len());
    for (role, default) in INDICATOR_FILES {
        let file = resolve_indicator_file(adapter, role, default);
        eprintln!("Loading indicator {} from {}.csv", role, file);
        series.push(data_port.fetch_indicator(&file)?);
    }
    let mut iter = series.into_iter();
    Ok(MacroIndicators {
        activity: iter.next().unwrap_or_default(),
        output_growth: iter.next().unwrap_or_default(),
        unemployment_change: iter.next().unwrap_or_default(),
        term_spread: iter.next().unwrap_or_default(),
        credit_spread: iter.next().unwrap_or_default(),
        equity_index: iter.next().unwrap_or_default(),
    })
}

fn data_dir(adapter: &dyn ConfigPort) -> Result<PathBuf, MacrotraderError> {
    adapter
        .get_string("data", "data_dir")
        .map(PathBuf::from)
        .ok_or_else(|| MacrotraderError::ConfigMissing {
            section: "data".into(),
            key: "data_dir".into(),
        })
}

fn run_backtest_command(config_path: &PathBuf, output_path: Option<&PathBuf>) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_backtest_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    let mut config = match build_backtest_config(&adapter) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let dir = match data_dir(&adapter) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    let data_port = CsvAdapter::new(dir);

    eprintln!("Validating {} assets...", config.universe.len());
    let validation = match validate_universe(&data_port, config.universe.clone()) {
        Ok(v) => v,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    config.universe = validation.universe.assets;

    let indicators = match load_indicators(&data_port, &adapter) {
        Ok(i) => i,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let mut prices = Vec::with_capacity(config.universe.len());
    for asset in &config.universe {
        match data_port.fetch_prices(asset) {
            Ok(series) => prices.push((asset.clone(), series)),
            Err(e) => {
                eprintln!("error: {e}");
                return (&e).into();
            }
        }
    }

    eprintln!("Running backtest...");
    let result = run_backtest(&indicators, &prices, &config);

    println!("Labeled months: {}", result.regimes.len());
    println!("Traded months:  {}", result.equity.len());
    for (name, value) in result.summary.named_metrics() {
        println!("{:<8} {:>10.4}", name, value);
    }

    if let Some(output) = output_path {
        let report = TextReportAdapter::new();
        if let Err(e) = report.write(&result, &output.display().to_string()) {
            eprintln!("error: {e}");
            return (&e).into();
        }
        eprintln!("Report written to {}", output.display());
    }

    ExitCode::SUCCESS
}

fn run_dry_run(config_path: &PathBuf) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    if let Err(e) = validate_backtest_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }
    let config = match build_backtest_config(&adapter) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    println!("Universe: {}", config.universe.join(","));
    println!("Transaction cost: {} bp", config.transaction_cost_bp);
    println!(
        "Leverage: {}",
        if config.leverage.enabled {
            format!(
                "target_vol={} lookback={} bounds=[{},{}]",
                config.leverage.target_vol,
                config.leverage.lookback_months,
                config.leverage.l_min,
                config.leverage.l_max
            )
        } else {
            "disabled".to_string()
        }
    );
    for (regime, allocation) in &config.weight_map {
        let entries: Vec<String> = allocation
            .iter()
            .map(|(asset, weight)| format!("{}={}", asset, weight))
            .collect();
        println!("Weights[{}]: {}", regime, entries.join(" "));
    }
    println!("Dry run OK");
    ExitCode::SUCCESS
}

fn run_validate(config_path: &PathBuf) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    match validate_backtest_config(&adapter) {
        Ok(()) => {
            println!("Config OK");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn run_list_assets(config_path: &PathBuf) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    let dir = match data_dir(&adapter) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    match CsvAdapter::new(dir).list_assets() {
        Ok(assets) => {
            for asset in assets {
                println!("{}", asset);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn run_info(config_path: &PathBuf) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    let config = match build_backtest_config(&adapter) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    let dir = match data_dir(&adapter) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    let data_port = CsvAdapter::new(dir);

    for asset in &config.universe {
        match data_port.fetch_prices(asset) {
            Ok(series) if !series.is_empty() => {
                let first = series.points.first().map(|p| p.date);
                let last = series.points.last().map(|p| p.date);
                println!(
                    "{}: {} observations, {} to {}",
                    asset,
                    series.len(),
                    first.map(|d| d.to_string()).unwrap_or_default(),
                    last.map(|d| d.to_string()).unwrap_or_default()
                );
            }
            Ok(_) => println!("{}: no data", asset),
            Err(e) => println!("{}: {}", asset, e),
        }
    }
    ExitCode::SUCCESS
}
