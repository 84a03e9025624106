//! # Error Types
//!
//! Structured error types for flange_core.
//!
//! Expected engineering outcomes (a bolt pattern that does not fit, a plate
//! that is too thin, a placeholder fastener grade) are never errors: they are
//! reported as data on the result records. `CalcError` is reserved for input
//! that cannot be interpreted at all, such as an unparseable bolt size or a
//! malformed job file.
//!
//! ## Example
//!
//! ```rust
//! use flange_core::errors::{CalcError, CalcResult};
//!
//! fn validate_dn(dn: f64) -> CalcResult<()> {
//!     if dn <= 0.0 {
//!         return Err(CalcError::invalid_input("nominal_size", dn.to_string(), "DN must be positive"));
//!     }
//!     Ok(())
//! }
//! assert!(validate_dn(-1.0).is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for flange_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for engine operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// An input value is invalid (out of range, wrong format, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A required field is missing
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// Thread designation could not be parsed or is not cataloged
    #[error("Unknown bolt size: {designation}")]
    UnknownBoltSize { designation: String },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Job file could not be read or parsed
    #[error("Config error in '{source_name}': {reason}")]
    ConfigError { source_name: String, reason: String },
}

impl CalcError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a MissingField error
    pub fn missing_field(field: impl Into<String>) -> Self {
        CalcError::MissingField {
            field: field.into(),
        }
    }

    /// Create an UnknownBoltSize error
    pub fn unknown_bolt_size(designation: impl Into<String>) -> Self {
        CalcError::UnknownBoltSize {
            designation: designation.into(),
        }
    }

    /// Create a ConfigError
    pub fn config_error(source_name: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::ConfigError {
            source_name: source_name.into(),
            reason: reason.into(),
        }
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::MissingField { .. } => "MISSING_FIELD",
            CalcError::UnknownBoltSize { .. } => "UNKNOWN_BOLT_SIZE",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
            CalcError::ConfigError { .. } => "CONFIG_ERROR",
        }
    }
}

impl From<serde_json::Error> for CalcError {
    fn from(err: serde_json::Error) -> Self {
        CalcError::SerializationError {
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = CalcError::invalid_input("nominal_size", "-50", "DN must be positive");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"type\":\"InvalidInput\""));
        let roundtrip: CalcError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(CalcError::missing_field("bolt_circle_mm").error_code(), "MISSING_FIELD");
        assert_eq!(CalcError::unknown_bolt_size("M17").error_code(), "UNKNOWN_BOLT_SIZE");
        assert_eq!(CalcError::config_error("job.toml", "bad").error_code(), "CONFIG_ERROR");
    }

    #[test]
    fn test_error_display() {
        let error = CalcError::unknown_bolt_size("M17");
        assert_eq!(error.to_string(), "Unknown bolt size: M17");
    }
}
