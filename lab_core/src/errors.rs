//! # Error Types
//!
//! Structured error types for lab_core. Unparsable user text (set count,
//! sample age) never ends up here: those inputs fall back to documented
//! defaults. Errors are reserved for bad addressing, missing required
//! metadata, configuration and transport failures.
//!
//! ## Example
//!
//! ```rust
//! use lab_core::errors::{LabError, LabResult};
//!
//! fn require_client(client: &str) -> LabResult<()> {
//!     if client.trim().is_empty() {
//!         return Err(LabError::missing_field("client"));
//!     }
//!     Ok(())
//! }
//!
//! assert!(require_client("").is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for lab_core operations
pub type LabResult<T> = Result<T, LabError>;

/// Structured error type for form operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum LabError {
    /// An input value is invalid
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A required field is empty
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// A set or sample index does not address an existing record
    #[error("Index out of range: {collection}[{index}] (len {len})")]
    IndexOutOfRange {
        collection: String,
        index: usize,
        len: usize,
    },

    /// JSON serialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Configuration value rejected
    #[error("Invalid configuration '{key}': {reason}")]
    InvalidConfig { key: String, reason: String },

    /// Submission could not be delivered
    #[error("Submission failed: {reason}")]
    TransportFailed { reason: String },
}

impl LabError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        LabError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a MissingField error
    pub fn missing_field(field: impl Into<String>) -> Self {
        LabError::MissingField {
            field: field.into(),
        }
    }

    /// Create an IndexOutOfRange error
    pub fn index_out_of_range(collection: impl Into<String>, index: usize, len: usize) -> Self {
        LabError::IndexOutOfRange {
            collection: collection.into(),
            index,
            len,
        }
    }

    /// Create an InvalidConfig error
    pub fn invalid_config(key: impl Into<String>, reason: impl Into<String>) -> Self {
        LabError::InvalidConfig {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Create a TransportFailed error
    pub fn transport_failed(reason: impl Into<String>) -> Self {
        LabError::TransportFailed {
            reason: reason.into(),
        }
    }

    /// Check if the user can simply try again.
    ///
    /// Nothing is retried automatically.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, LabError::TransportFailed { .. })
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            LabError::InvalidInput { .. } => "INVALID_INPUT",
            LabError::MissingField { .. } => "MISSING_FIELD",
            LabError::IndexOutOfRange { .. } => "INDEX_OUT_OF_RANGE",
            LabError::SerializationError { .. } => "SERIALIZATION_ERROR",
            LabError::InvalidConfig { .. } => "INVALID_CONFIG",
            LabError::TransportFailed { .. } => "TRANSPORT_FAILED",
        }
    }
}

impl From<serde_json::Error> for LabError {
    fn from(err: serde_json::Error) -> Self {
        LabError::SerializationError {
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = LabError::index_out_of_range("sets", 4, 2);
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"type\":\"IndexOutOfRange\""));
        let roundtrip: LabError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(LabError::missing_field("client").error_code(), "MISSING_FIELD");
        assert_eq!(LabError::invalid_config("webhook_url", "empty").error_code(), "INVALID_CONFIG");
        assert_eq!(LabError::transport_failed("timeout").error_code(), "TRANSPORT_FAILED");
    }

    #[test]
    fn test_only_transport_is_recoverable() {
        assert!(LabError::transport_failed("503").is_recoverable());
        assert!(!LabError::missing_field("project").is_recoverable());
        assert!(!LabError::index_out_of_range("samples", 1, 1).is_recoverable());
    }

    #[test]
    fn test_display() {
        let err = LabError::index_out_of_range("sets", 3, 2);
        assert_eq!(err.to_string(), "Index out of range: sets[3] (len 2)");
    }
}
