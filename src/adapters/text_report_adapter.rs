//! Plain-text report adapter implementing ReportPort.
//!
//! Writes a human-readable summary to the output path and the equity
//! curve as CSV next to it (`<output>.equity.csv`).

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::fs;

use crate::domain::backtest::BacktestResult;
use crate::domain::error::MacrotraderError;
use crate::domain::regime::Regime;
use crate::ports::report_port::ReportPort;

pub struct TextReportAdapter;

impl TextReportAdapter {
    pub fn new() -> Self {
        TextReportAdapter
    }

    fn render(&self, result: &BacktestResult) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "macrotrader backtest report");
        let _ = writeln!(out, "===========================");

        if let (Some(first), Some(last)) = (result.equity.first(), result.equity.last()) {
            let _ = writeln!(out, "Period: {} to {}", first.date, last.date);
            let _ = writeln!(out, "Months: {}", result.equity.len());
            let _ = writeln!(out, "Final equity: {:.4}", last.equity);
        } else {
            let _ = writeln!(out, "Period: (no traded dates)");
        }

        let _ = writeln!(out, "\nPerformance");
        let _ = writeln!(out, "-----------");
        for (name, value) in result.summary.named_metrics() {
            let _ = writeln!(out, "{:<8} {:>10.4}", name, value);
        }

        let _ = writeln!(out, "\nRegime occupancy");
        let _ = writeln!(out, "----------------");
        let mut counts: BTreeMap<Regime, usize> = BTreeMap::new();
        for point in &result.regimes {
            *counts.entry(point.regime).or_insert(0) += 1;
        }
        for regime in Regime::ALL {
            let _ = writeln!(
                out,
                "{:<10} {:>5}",
                regime.to_string(),
                counts.get(&regime).copied().unwrap_or(0)
            );
        }

        if let Some(last) = result.regimes.last() {
            let _ = writeln!(
                out,
                "\nLatest regime: {} (score {:.3}, delta {:.3}) at {}",
                last.regime, last.score, last.delta, last.date
            );
        }

        out
    }

    fn render_equity_csv(&self, result: &BacktestResult) -> String {
        let mut out = String::from("date,equity,levered_return,cost,leverage\n");
        for (i, point) in result.equity.iter().enumerate() {
            let _ = writeln!(
                out,
                "{},{},{},{},{}",
                point.date,
                point.equity,
                result.levered_returns.points[i].value,
                result.costs.points[i].value,
                result.leverage.points[i].value
            );
        }
        out
    }
}

impl Default for TextReportAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportPort for TextReportAdapter {
    fn write(&self, result: &BacktestResult, output_path: &str) -> Result<(), MacrotraderError> {
        fs::write(output_path, self.render(result))?;
        fs::write(
            format!("{}.equity.csv", output_path),
            self.render_equity_csv(result),
        )?;
        Ok(())
    }
}
