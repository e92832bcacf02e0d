#![allow(dead_code)]

use chrono::NaiveDate;
use macrotrader::domain::error::MacrotraderError;
use macrotrader::domain::series::TimeSeries;
use macrotrader::ports::data_port::DataPort;
use std::collections::HashMap;

pub struct MockDataPort {
    pub indicators: HashMap<String, TimeSeries>,
    pub prices: HashMap<String, TimeSeries>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            indicators: HashMap::new(),
            prices: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_indicator(mut self, name: &str, series: TimeSeries) -> Self {
        self.indicators.insert(name.to_string(), series);
        self
    }

    pub fn with_prices(mut self, asset: &str, series: TimeSeries) -> Self {
        self.prices.insert(asset.to_string(), series);
        self
    }

    pub fn with_error(mut self, name: &str, reason: &str) -> Self {
        self.errors.insert(name.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_indicator(&self, name: &str) -> Result<TimeSeries, MacrotraderError> {
        if let Some(reason) = self.errors.get(name) {
            return Err(MacrotraderError::Data {
                reason: reason.clone(),
            });
        }
        self.indicators
            .get(name)
            .cloned()
            .ok_or_else(|| MacrotraderError::NoData {
                name: name.to_string(),
            })
    }

    fn fetch_prices(&self, asset: &str) -> Result<TimeSeries, MacrotraderError> {
        if let Some(reason) = self.errors.get(asset) {
            return Err(MacrotraderError::Data {
                reason: reason.clone(),
            });
        }
        self.prices
            .get(asset)
            .cloned()
            .ok_or_else(|| MacrotraderError::NoData {
                name: asset.to_string(),
            })
    }

    fn list_assets(&self) -> Result<Vec<String>, MacrotraderError> {
        let mut assets: Vec<String> = self.prices.keys().cloned().collect();
        assets.sort();
        Ok(assets)
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// A series of one observation per month starting at `start`.
pub fn monthly_series(start: NaiveDate, values: &[f64]) -> TimeSeries {
    TimeSeries::from_observations(
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| (start + chrono::Months::new(i as u32), v))
            .collect(),
    )
}

/// An oscillating indicator long enough to clear the 36-month z-window.
pub fn oscillating_indicator(months: usize) -> Vec<f64> {
    (0..months).map(|i| 50.0 + 5.0 * (i as f64 * 0.7).sin()).collect()
}

/// A gently trending price path with some wobble.
pub fn trending_prices(months: usize, start: f64, drift: f64) -> Vec<f64> {
    (0..months)
        .scan(start, |price, i| {
            *price *= 1.0 + drift + 0.01 * (i as f64 * 1.3).sin();
            Some(*price)
        })
        .collect()
}
