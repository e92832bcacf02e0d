//! Error types for the loader/adapter/CLI boundary.
//!
//! Nothing inside the backtest core raises: degenerate inputs flow through
//! as undefined markers, empty matrices and all-zero summaries. Errors
//! exist only where data and configuration enter the system.

/// Top-level error type for macrotrader.
#[derive(Debug, thiserror::Error)]
pub enum MacrotraderError {
    #[error("data error: {reason}")]
    Data { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("no data for {name}")]
    NoData { name: String },

    #[error("insufficient data for {name}: have {observations} observations, need {minimum}")]
    InsufficientData {
        name: String,
        observations: usize,
        minimum: usize,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&MacrotraderError> for std::process::ExitCode {
    fn from(err: &MacrotraderError) -> Self {
        let code: u8 = match err {
            MacrotraderError::Io(_) => 1,
            MacrotraderError::ConfigParse { .. }
            | MacrotraderError::ConfigMissing { .. }
            | MacrotraderError::ConfigInvalid { .. } => 2,
            MacrotraderError::Data { .. } => 3,
            MacrotraderError::NoData { .. } | MacrotraderError::InsufficientData { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
