//! # Error Types
//!
//! Structured error types for bracing_core.
//!
//! The calculation functions (row resolution, line and tab aggregation,
//! report assembly) never return errors: missing catalog entries and
//! degenerate numbers collapse to "NA"/zero results instead. Errors only
//! come from the editing boundary (custom bracing library, project
//! structure edits) and from file I/O.
//!
//! ## Example
//!
//! ```rust
//! use bracing_core::errors::{BracingError, BracingResult};
//!
//! fn validate_name(name: &str) -> BracingResult<()> {
//!     if name.trim().is_empty() {
//!         return Err(BracingError::missing_field("name"));
//!     }
//!     Ok(())
//! }
//!
//! assert!(validate_name("  ").is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for bracing_core operations
pub type BracingResult<T> = Result<T, BracingError>;

/// Structured error type for editing and I/O operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum BracingError {
    /// An input value is invalid (unparseable key, mismatched tables, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A required field is missing or blank
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// An entry with this name already exists
    #[error("Duplicate {kind}: '{name}' already exists")]
    DuplicateName { kind: String, name: String },

    /// A keyed entry does not exist
    #[error("{kind} not found: {key}")]
    NotFound { kind: String, key: String },

    /// A structural edit would break a project invariant
    #[error("Constraint violated: {reason}")]
    ConstraintViolation { reason: String },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
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
}

impl BracingError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        BracingError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a MissingField error
    pub fn missing_field(field: impl Into<String>) -> Self {
        BracingError::MissingField {
            field: field.into(),
        }
    }

    /// Create a DuplicateName error
    pub fn duplicate_name(kind: impl Into<String>, name: impl Into<String>) -> Self {
        BracingError::DuplicateName {
            kind: kind.into(),
            name: name.into(),
        }
    }

    /// Create a NotFound error
    pub fn not_found(kind: impl Into<String>, key: impl Into<String>) -> Self {
        BracingError::NotFound {
            kind: kind.into(),
            key: key.into(),
        }
    }

    /// Create a ConstraintViolation error
    pub fn constraint(reason: impl Into<String>) -> Self {
        BracingError::ConstraintViolation {
            reason: reason.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        BracingError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            BracingError::InvalidInput { .. } => "INVALID_INPUT",
            BracingError::MissingField { .. } => "MISSING_FIELD",
            BracingError::DuplicateName { .. } => "DUPLICATE_NAME",
            BracingError::NotFound { .. } => "NOT_FOUND",
            BracingError::ConstraintViolation { .. } => "CONSTRAINT_VIOLATION",
            BracingError::FileError { .. } => "FILE_ERROR",
            BracingError::SerializationError { .. } => "SERIALIZATION_ERROR",
            BracingError::VersionMismatch { .. } => "VERSION_MISMATCH",
        }
    }
}

impl From<serde_json::Error> for BracingError {
    fn from(e: serde_json::Error) -> Self {
        BracingError::SerializationError {
            reason: e.to_string(),
        }
    }
}
