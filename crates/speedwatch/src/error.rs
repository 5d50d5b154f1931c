//! Error types for speedwatch.
//!
//! This module defines all error types used throughout the speedwatch crate.
//! The store-facing variants map onto four classes: day-not-found, corrupt
//! day file, I/O failure, and validation failure. Errors propagate to the
//! caller; nothing here logs or terminates the process.

use std::path::PathBuf;

use chrono::NaiveDate;
use thiserror::Error;

/// The main error type for speedwatch operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Store Errors ===
    /// No day file exists for the requested date.
    #[error("no records for {date}")]
    DayNotFound {
        /// The date that was queried.
        date: NaiveDate,
    },

    /// A day file could not be opened or created.
    #[error("failed to open day file at {path}: {source}")]
    DayFileOpen {
        /// Path to the day file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A day file does not contain a well-formed JSON array of records.
    #[error("corrupt day file at {path}: {source}")]
    DayFileCorrupt {
        /// Path to the day file.
        path: PathBuf,
        /// The decode error.
        #[source]
        source: serde_json::Error,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Request Errors ===
    /// A record or query failed domain validation before reaching the store.
    #[error("validation failed: {message}")]
    Validation {
        /// Description of the rejected input.
        message: String,
    },

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed outside a day file.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for speedwatch operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a new validation error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Check if this error means the queried day has no records on disk.
    #[must_use]
    pub fn is_day_not_found(&self) -> bool {
        matches!(self, Self::DayNotFound { .. })
    }

    /// Check if this error is a rejected input rather than a storage fault.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// Check if this error is a store integrity fault (non-retryable).
    #[must_use]
    pub fn is_corrupt(&self) -> bool {
        matches!(self, Self::DayFileCorrupt { .. })
    }
}
