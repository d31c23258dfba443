//! Error types for the parking engine
//!
//! This module defines all error types that can occur while validating input,
//! persisting records, and delivering notifications.
//!
//! # Error Categories
//!
//! - **Validation errors**: missing or malformed required input, rejected at
//!   the boundary with a field-level message
//! - **Conflict errors**: duplicate unique key (tenant plate number)
//! - **Configuration errors**: required external configuration absent
//!   (e.g. the daily-report destination phone)
//! - **Delivery errors**: the notification sink rejected a message; only
//!   surfaced for explicit user-triggered sends, never for the
//!   fire-and-forget receipt path
//! - **File/CSV errors**: entry-log import failures in the CLI

use thiserror::Error;

/// Main error type for the parking engine
///
/// Each variant carries enough context to produce a useful message at the
/// boundary where it is reported.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParkingError {
    /// A required input field is missing or malformed
    ///
    /// Reported synchronously at the boundary with a 4xx-equivalent status.
    #[error("Validation failed for '{field}': {message}")]
    Validation {
        /// The offending field
        field: String,
        /// What was wrong with it
        message: String,
    },

    /// A unique key already exists (e.g. registering a duplicate plate)
    ///
    /// Surfaced distinctly from generic validation; the existing record is
    /// left unchanged.
    #[error("Plate number {plate} is already registered")]
    Conflict {
        /// The duplicated plate number
        plate: String,
    },

    /// Required external configuration is absent
    ///
    /// A server-side failure: the operation cannot proceed until the
    /// deployment provides the named setting.
    #[error("Missing configuration: {key}")]
    Configuration {
        /// The configuration key that was not set
        key: String,
    },

    /// The notification sink rejected or failed to deliver a message
    ///
    /// Propagated only for explicit user-triggered sends; the receipt path
    /// logs and discards it instead.
    #[error("Notification delivery failed: {message}")]
    Delivery {
        /// Description of the sink failure
        message: String,
    },

    /// File not found at the specified path
    ///
    /// Fatal for the CLI: processing cannot start.
    #[error("File not found: {path}")]
    FileNotFound {
        /// The path that was not found
        path: String,
    },

    /// I/O error occurred while reading the entry log
    #[error("I/O error: {message}")]
    Io {
        /// Description of the I/O error
        message: String,
    },

    /// CSV parsing error occurred
    ///
    /// Recoverable: the malformed record is skipped and processing continues
    /// with the next record.
    #[error("CSV parse error{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    Parse {
        /// Line number where the error occurred (if available)
        line: Option<u64>,
        /// Description of the parsing error
        message: String,
    },
}

// Conversion from io::Error to ParkingError
impl From<std::io::Error> for ParkingError {
    fn from(error: std::io::Error) -> Self {
        ParkingError::Io {
            message: error.to_string(),
        }
    }
}

// Conversion from csv::Error to ParkingError
impl From<csv::Error> for ParkingError {
    fn from(error: csv::Error) -> Self {
        // Extract line number if available
        let line = error.position().map(|pos| pos.line());

        ParkingError::Parse {
            line,
            message: error.to_string(),
        }
    }
}

// Helper functions for creating common errors

impl ParkingError {
    /// Create a Validation error for a missing required field
    pub fn missing_field(field: &str) -> Self {
        ParkingError::Validation {
            field: field.to_string(),
            message: "required field is missing".to_string(),
        }
    }

    /// Create a Validation error with a custom message
    pub fn invalid_field(field: &str, message: &str) -> Self {
        ParkingError::Validation {
            field: field.to_string(),
            message: message.to_string(),
        }
    }

    /// Create a Conflict error for a duplicate plate number
    pub fn duplicate_plate(plate: &str) -> Self {
        ParkingError::Conflict {
            plate: plate.to_string(),
        }
    }

    /// Create a Configuration error for a missing setting
    pub fn not_configured(key: &str) -> Self {
        ParkingError::Configuration {
            key: key.to_string(),
        }
    }

    /// Create a Delivery error
    pub fn delivery(message: &str) -> Self {
        ParkingError::Delivery {
            message: message.to_string(),
        }
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::validation(
        ParkingError::missing_field("amount_paid"),
        "Validation failed for 'amount_paid': required field is missing"
    )]
    #[case::conflict(
        ParkingError::duplicate_plate("KDA 456B"),
        "Plate number KDA 456B is already registered"
    )]
    #[case::configuration(
        ParkingError::not_configured("MANAGER_PHONE"),
        "Missing configuration: MANAGER_PHONE"
    )]
    #[case::delivery(
        ParkingError::delivery("gateway timeout"),
        "Notification delivery failed: gateway timeout"
    )]
    #[case::file_not_found(
        ParkingError::FileNotFound { path: "log.csv".to_string() },
        "File not found: log.csv"
    )]
    #[case::parse_with_line(
        ParkingError::Parse { line: Some(7), message: "invalid field".to_string() },
        "CSV parse error at line 7: invalid field"
    )]
    #[case::parse_without_line(
        ParkingError::Parse { line: None, message: "invalid field".to_string() },
        "CSV parse error: invalid field"
    )]
    fn test_error_display(#[case] error: ParkingError, #[case] expected: &str) {
        assert_eq!(error.to_string(), expected);
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error =
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "Permission denied");
        let error: ParkingError = io_error.into();
        assert!(matches!(error, ParkingError::Io { .. }));
        assert_eq!(error.to_string(), "I/O error: Permission denied");
    }
}
