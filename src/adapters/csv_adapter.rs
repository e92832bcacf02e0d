//! CSV file data adapter.
//!
//! Indicators live at `<name>.csv` and prices at `<asset>.csv` under a
//! base directory, with a `date` column in `YYYY-MM-DD` format. Indicator
//! files use their first non-date column; price files prefer an `AdjClose`
//! column and fall back to the last column. Blank value cells are gaps and
//! are skipped, leaving the date undefined in the series.

use crate::domain::error::MacrotraderError;
use crate::domain::series::TimeSeries;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

pub const PRICE_COLUMN: &str = "AdjClose";

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, name: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", name))
    }

    fn read_series(&self, name: &str, prefer_column: Option<&str>) -> Result<TimeSeries, MacrotraderError> {
        let path = self.csv_path(name);
        let content = fs::read_to_string(&path).map_err(|e| MacrotraderError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut reader = csv::Reader::from_reader(content.as_bytes());
        let headers = reader
            .headers()
            .map_err(|e| MacrotraderError::Data {
                reason: format!("CSV header error in {}: {}", path.display(), e),
            })?
            .clone();

        let date_index = headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case("date"))
            .ok_or_else(|| MacrotraderError::Data {
                reason: format!("missing date column in {}", path.display()),
            })?;
        let value_index = select_value_column(&headers, date_index, prefer_column).ok_or_else(
            || MacrotraderError::Data {
                reason: format!("no value column in {}", path.display()),
            },
        )?;

        let mut observations = Vec::new();
        for result in reader.records() {
            let record = result.map_err(|e| MacrotraderError::Data {
                reason: format!("CSV parse error in {}: {}", path.display(), e),
            })?;

            let date_str = record.get(date_index).unwrap_or("");
            let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|e| {
                MacrotraderError::Data {
                    reason: format!("invalid date {:?} in {}: {}", date_str, path.display(), e),
                }
            })?;

            let raw = record.get(value_index).unwrap_or("").trim();
            if raw.is_empty() {
                continue; // gap: the date stays undefined
            }
            let value: f64 = raw.parse().map_err(|e| MacrotraderError::Data {
                reason: format!("invalid value {:?} in {}: {}", raw, path.display(), e),
            })?;
            observations.push((date, value));
        }

        Ok(TimeSeries::from_observations(observations))
    }
}

fn select_value_column(
    headers: &csv::StringRecord,
    date_index: usize,
    prefer_column: Option<&str>,
) -> Option<usize> {
    if let Some(name) = prefer_column {
        if let Some(i) = headers.iter().position(|h| h.eq_ignore_ascii_case(name)) {
            return Some(i);
        }
        // preferred column absent: fall back to the last non-date column
        return (0..headers.len()).rev().find(|&i| i != date_index);
    }
    (0..headers.len()).find(|&i| i != date_index)
}

impl DataPort for CsvAdapter {
    fn fetch_indicator(&self, name: &str) -> Result<TimeSeries, MacrotraderError> {
        self.read_series(name, None)
    }

    fn fetch_prices(&self, asset: &str) -> Result<TimeSeries, MacrotraderError> {
        self.read_series(asset, Some(PRICE_COLUMN))
    }

    fn list_assets(&self) -> Result<Vec<String>, MacrotraderError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| MacrotraderError::Data {
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let mut assets = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| MacrotraderError::Data {
                reason: format!("directory entry error: {}", e),
            })?;
            let name = entry.file_name();
            let name_str = name.to_string_lossy();
            if let Some(stem) = name_str.strip_suffix(".csv") {
                assets.push(stem.to_string());
            }
        }

        assets.sort();
        Ok(assets)
    }
}
