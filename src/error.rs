use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::NumericBase;

#[derive(Error, Debug)]
pub enum GasRendererError {
    #[error("Invalid {base} number: {value:?}")]
    InvalidNumericFormat { value: String, base: NumericBase },

    #[error("Missing conversion rate for {from} -> {to}")]
    MissingConversionRate { from: String, to: String },

    #[error("No gas price available: transaction has none and estimates are loading")]
    MissingGasPrice,

    #[error("Missing basic estimate: {0}")]
    MissingEstimate(&'static str),

    #[error("Gas limit out of range: {0}")]
    GasLimitOverflow(String),

    #[error("Invalid snapshot: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl GasRendererError {
    pub fn invalid_numeric(value: impl Into<String>, base: NumericBase) -> Self {
        GasRendererError::InvalidNumericFormat {
            value: value.into(),
            base,
        }
    }

    /// Flattens an `anyhow` chain from config loading into `ConfigError`.
    pub fn config(err: anyhow::Error) -> Self {
        GasRendererError::ConfigError(format!("{err:#}"))
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            GasRendererError::InvalidNumericFormat { .. } => "INVALID_NUMERIC_FORMAT",
            GasRendererError::MissingConversionRate { .. } => "MISSING_CONVERSION_RATE",
            GasRendererError::MissingGasPrice => "MISSING_GAS_PRICE",
            GasRendererError::MissingEstimate(_) => "MISSING_ESTIMATE",
            GasRendererError::GasLimitOverflow(_) => "GAS_LIMIT_OVERFLOW",
            GasRendererError::Json(_) => "INVALID_SNAPSHOT",
            GasRendererError::Io(_) => "IO_ERROR",
            GasRendererError::ConfigError(_) => "CONFIG_ERROR",
        }
    }
}

pub type Result<T, E = GasRendererError> = std::result::Result<T, E>;

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub error_code: String,
    pub timestamp: chrono::DateTime<Utc>,
}

impl From<&GasRendererError> for ErrorResponse {
    fn from(err: &GasRendererError) -> Self {
        let error_code = err.error_code();

        tracing::error!(
            error = ?err,
            error_code = error_code,
            "Rendering failed"
        );

        ErrorResponse {
            success: false,
            error: err.to_string(),
            error_code: error_code.to_string(),
            timestamp: Utc::now(),
        }
    }
}
