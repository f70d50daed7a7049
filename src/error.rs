//! Error types for the salinisation screening service.
//!
//! `SalinityError` covers failures that halt a whole run (schema, config,
//! I/O). `InvalidValue` is the per-sample rejection reason: a bad cell never
//! aborts the run, it only removes that row from the assessment.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SalinityError {
    /// One or more required columns are absent from the input table.
    #[error("Missing required columns: {missing:?}")]
    Schema { missing: Vec<String> },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Why a single measurement was refused.
#[derive(Error, Debug, Clone, PartialEq, serde::Serialize)]
pub enum InvalidValue {
    #[error("value is missing")]
    Missing,
    #[error("value is not a number")]
    NotNumeric,
    #[error("value is not finite")]
    NonFinite,
    #[error("value is negative")]
    Negative,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_error_lists_missing_columns() {
        let err = SalinityError::Schema {
            missing: vec!["HCO3".to_string()],
        };
        assert_eq!(err.to_string(), "Missing required columns: [\"HCO3\"]");
    }

    #[test]
    fn test_invalid_value_messages_are_readable() {
        assert_eq!(InvalidValue::Negative.to_string(), "value is negative");
        assert_eq!(InvalidValue::Missing.to_string(), "value is missing");
    }
}
