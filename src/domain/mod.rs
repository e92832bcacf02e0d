//! Core domain types and logic.

pub mod backtest;
pub mod config_validation;
pub mod costs;
pub mod error;
pub mod leverage;
pub mod matrix;
pub mod metrics;
pub mod regime;
pub mod score;
pub mod series;
pub mod universe;
pub mod weights;
