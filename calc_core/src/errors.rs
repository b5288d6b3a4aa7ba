//! # Error Types
//!
//! Structured error types for calc_core. Most user-facing failures in a
//! calculator never reach this type: malformed input is reported as "no
//! result yet" (`Option::None`) and undefined arithmetic puts the keypad into
//! its `Undefined` display state. `CalcError` covers what is left: programming
//! errors such as unknown unit symbols, invalid estimator inputs, and storage
//! failures.
//!
//! ## Example
//!
//! ```rust
//! use calc_core::errors::{CalcError, CalcResult};
//!
//! fn validate_area(area_m2: f64) -> CalcResult<()> {
//!     if area_m2 <= 0.0 {
//!         return Err(CalcError::invalid_input(
//!             "area_m2",
//!             area_m2.to_string(),
//!             "Area must be positive",
//!         ));
//!     }
//!     Ok(())
//! }
//!
//! assert!(validate_area(-1.0).is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for calc_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for calculator operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// An input value is invalid (out of range, not finite, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// Unit symbol is not part of the quantity kind's table
    #[error("Unknown unit '{symbol}' for {kind}")]
    UnknownUnit { symbol: String, kind: String },

    /// The operation has no defined result (division by zero, log of a negative, ...)
    #[error("Undefined result: {operation} - {reason}")]
    Undefined { operation: String, reason: String },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// Store file is locked by another process
    #[error("File locked: '{path}' is locked by {locked_by} since {locked_at}")]
    FileLocked {
        path: String,
        locked_by: String,
        locked_at: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Schema version mismatch
    #[error("Version mismatch: file version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },

    /// Generic internal error (should be rare)
    #[error("Internal error: {message}")]
    Internal { message: String },
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

    /// Create an UnknownUnit error
    pub fn unknown_unit(symbol: impl Into<String>, kind: impl Into<String>) -> Self {
        CalcError::UnknownUnit {
            symbol: symbol.into(),
            kind: kind.into(),
        }
    }

    /// Create an Undefined error
    pub fn undefined(operation: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::Undefined {
            operation: operation.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileLocked error
    pub fn file_locked(path: impl Into<String>, locked_by: impl Into<String>, locked_at: impl Into<String>) -> Self {
        CalcError::FileLocked {
            path: path.into(),
            locked_by: locked_by.into(),
            locked_at: locked_at.into(),
        }
    }

    /// Check if this is a recoverable error (e.g., can retry)
    pub fn is_recoverable(&self) -> bool {
        matches!(self, CalcError::FileLocked { .. })
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::UnknownUnit { .. } => "UNKNOWN_UNIT",
            CalcError::Undefined { .. } => "UNDEFINED",
            CalcError::FileError { .. } => "FILE_ERROR",
            CalcError::FileLocked { .. } => "FILE_LOCKED",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
            CalcError::VersionMismatch { .. } => "VERSION_MISMATCH",
            CalcError::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}

impl From<serde_json::Error> for CalcError {
    fn from(e: serde_json::Error) -> Self {
        CalcError::SerializationError { reason: e.to_string() }
    }
}
