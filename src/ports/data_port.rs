//! Data access port trait.

use crate::domain::error::MacrotraderError;
use crate::domain::series::TimeSeries;

pub trait DataPort {
    /// Fetch a named macro indicator series.
    fn fetch_indicator(&self, name: &str) -> Result<TimeSeries, MacrotraderError>;

    /// Fetch the price series for one asset.
    fn fetch_prices(&self, asset: &str) -> Result<TimeSeries, MacrotraderError>;

    /// List the assets the port can serve prices for.
    fn list_assets(&self) -> Result<Vec<String>, MacrotraderError>;
}
