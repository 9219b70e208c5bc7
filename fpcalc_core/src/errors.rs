//! # Error Types
//!
//! Structured error types for fpcalc_core. Every failure carries enough
//! context for a front end to point the user at the offending field or
//! table row without parsing a message string.
//!
//! ## Taxonomy
//!
//! | Variant               | Meaning                                          |
//! |-----------------------|--------------------------------------------------|
//! | `InvalidInput`        | A value violates a domain constraint             |
//! | `UnknownKey`          | A categorical key has no table entry             |
//! | `MissingPeriodData`   | No override and no period record for the type    |
//! | `SiteDataUnavailable` | External SDS lookup failed (recoverable)         |
//! | `TableData`           | Reference data is malformed or incomplete        |
//!
//! ## Example
//!
//! ```rust
//! use fpcalc_core::errors::{CalcError, CalcResult};
//!
//! fn validate_height(height_ft: f64) -> CalcResult<()> {
//!     if height_ft <= 0.0 {
//!         return Err(CalcError::invalid_input(
//!             "height_ft",
//!             height_ft.to_string(),
//!             "Structure height must be positive",
//!         ));
//!     }
//!     Ok(())
//! }
//!
//! assert!(validate_height(-1.0).is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for fpcalc_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for Fp calculations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// An input value is invalid (out of range, non-positive, not finite)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A categorical key (structure type, resisting system, component) has no table entry
    #[error("Unknown key in {table} table: '{key}'")]
    UnknownKey { table: String, key: String },

    /// Period estimation requested with neither an override nor a period record
    #[error("No period data for structure type '{structure_type}' and no Ta override given")]
    MissingPeriodData { structure_type: String },

    /// The external site acceleration lookup failed
    #[error("Site data unavailable: {reason}")]
    SiteDataUnavailable { reason: String },

    /// Reference table data is malformed, duplicated, or incomplete
    #[error("Table data error in {table}: {reason}")]
    TableData { table: String, reason: String },

    /// JSON/TOML serialization or deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Generic internal error (report rendering and the like)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl CalcError {
    /// Create an InvalidInput error
    pub fn invalid_input(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        CalcError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create an UnknownKey error
    pub fn unknown_key(table: impl Into<String>, key: impl Into<String>) -> Self {
        CalcError::UnknownKey {
            table: table.into(),
            key: key.into(),
        }
    }

    /// Create a MissingPeriodData error
    pub fn missing_period_data(structure_type: impl Into<String>) -> Self {
        CalcError::MissingPeriodData {
            structure_type: structure_type.into(),
        }
    }

    /// Create a SiteDataUnavailable error
    pub fn site_data_unavailable(reason: impl Into<String>) -> Self {
        CalcError::SiteDataUnavailable {
            reason: reason.into(),
        }
    }

    /// Create a TableData error
    pub fn table_data(table: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::TableData {
            table: table.into(),
            reason: reason.into(),
        }
    }

    /// Check if this is a recoverable error.
    ///
    /// Only a failed site lookup qualifies: the caller can fall back to a
    /// manually entered SDS. Everything else needs the user to fix an input.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, CalcError::SiteDataUnavailable { .. })
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::UnknownKey { .. } => "UNKNOWN_KEY",
            CalcError::MissingPeriodData { .. } => "MISSING_PERIOD_DATA",
            CalcError::SiteDataUnavailable { .. } => "SITE_DATA_UNAVAILABLE",
            CalcError::TableData { .. } => "TABLE_DATA",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
            CalcError::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}

impl From<serde_json::Error> for CalcError {
    fn from(e: serde_json::Error) -> Self {
        CalcError::SerializationError {
            reason: e.to_string(),
        }
    }
}

/// Reject non-finite or non-positive values.
pub(crate) fn require_positive(field: &str, value: f64) -> CalcResult<f64> {
    if !value.is_finite() || value <= 0.0 {
        return Err(CalcError::invalid_input(
            field,
            value.to_string(),
            "Must be a positive finite number",
        ));
    }
    Ok(value)
}

/// Reject non-finite or negative values.
pub(crate) fn require_non_negative(field: &str, value: f64) -> CalcResult<f64> {
    if !value.is_finite() || value < 0.0 {
        return Err(CalcError::invalid_input(
            field,
            value.to_string(),
            "Must be a non-negative finite number",
        ));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = CalcError::invalid_input("height_ft", "-5", "Structure height must be positive");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"type\":\"InvalidInput\""));
        let roundtrip: CalcError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(CalcError::unknown_key("period", "x").error_code(), "UNKNOWN_KEY");
        assert_eq!(
            CalcError::missing_period_data("steel").error_code(),
            "MISSING_PERIOD_DATA"
        );
        assert_eq!(
            CalcError::site_data_unavailable("timeout").error_code(),
            "SITE_DATA_UNAVAILABLE"
        );
    }

    #[test]
    fn test_only_site_errors_are_recoverable() {
        assert!(CalcError::site_data_unavailable("offline").is_recoverable());
        assert!(!CalcError::invalid_input("sds", "0", "zero").is_recoverable());
        assert!(!CalcError::unknown_key("component", "widget").is_recoverable());
        assert!(!CalcError::missing_period_data("x").is_recoverable());
    }

    #[test]
    fn test_require_positive() {
        assert_eq!(require_positive("r", 8.0).unwrap(), 8.0);
        assert!(require_positive("r", 0.0).is_err());
        assert!(require_positive("r", -1.0).is_err());
        assert!(require_positive("r", f64::NAN).is_err());
        assert!(require_positive("r", f64::INFINITY).is_err());
    }

    #[test]
    fn test_require_non_negative() {
        assert_eq!(require_non_negative("wp", 0.0).unwrap(), 0.0);
        assert!(require_non_negative("wp", -0.1).is_err());
    }
}
