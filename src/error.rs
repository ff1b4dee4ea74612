// src/error.rs

use thiserror::Error;

/// Errors raised while loading case data or configuring a planning run.
///
/// The allocation arithmetic itself cannot fail for valid inputs, so every
/// variant here originates from malformed input tables or options.
#[derive(Error, Debug)]
pub enum PlannerError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("table '{table}' is missing required column '{column}'")]
    MissingColumn { table: String, column: String },

    #[error("table '{table}', row {row}, column '{column}': invalid value '{value}'")]
    InvalidValue {
        table: String,
        row: usize,
        column: String,
        value: String,
    },

    #[error("unsupported file format: {0} (expected .csv or .xlsx)")]
    UnsupportedFormat(String),

    #[error("failed to read workbook: {0}")]
    Excel(String),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl PlannerError {
    pub fn config(message: impl Into<String>) -> Self {
        PlannerError::Configuration(message.into())
    }
}

pub type PlannerResult<T> = Result<T, PlannerError>;
