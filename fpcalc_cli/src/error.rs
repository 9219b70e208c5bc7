use std::path::PathBuf;

use fpcalc_core::CalcError;
use thiserror::Error;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid input bundle: {0}")]
    Input(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Failed to start async runtime: {0}")]
    Runtime(#[source] std::io::Error),

    #[error("HTTP client setup failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Calc(#[from] CalcError),
}

impl CliError {
    /// Process exit code: 2 for user-correctable input, 1 otherwise
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Input(_) | CliError::Config(_) => 2,
            CliError::Calc(
                CalcError::InvalidInput { .. }
                | CalcError::UnknownKey { .. }
                | CalcError::MissingPeriodData { .. },
            ) => 2,
            _ => 1,
        }
    }
}
