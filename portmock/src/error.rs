//! Error types for the portmock library.
//!
//! This module provides the error hierarchy for configuration, startup and
//! server failures, using `thiserror` for ergonomic error handling.
//! Request-level input problems are not errors of this kind; they are
//! reported as [`crate::validation::ValidationError`] values.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for operations that may fail with a portmock error.
///
/// # Examples
///
/// ```
/// use portmock::{Error, Result};
///
/// fn example_operation() -> Result<u16> {
///     Ok(8080)
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the portmock library.
#[derive(Debug, Error)]
pub enum Error {
    /// An invalid port number was provided.
    #[error("invalid port {value}: {reason}")]
    InvalidPort {
        /// The invalid port value.
        value: u16,
        /// The reason the port is invalid.
        reason: String,
    },

    /// An invalid port range was specified.
    #[error("invalid port range {min}-{max}: {reason}")]
    InvalidPortRange {
        /// The minimum port in the range.
        min: u16,
        /// The maximum port in the range.
        max: u16,
        /// The reason the range is invalid.
        reason: String,
    },

    /// A configuration file could not be parsed.
    #[error("configuration error: {0}")]
    Configuration(#[from] serde_yaml::Error),

    /// A configuration file does not exist or cannot be read.
    #[error("failed to load config data [{}]: {reason}", path.display())]
    ConfigNotFound {
        /// The path that was tried.
        path: PathBuf,
        /// The underlying reason.
        reason: String,
    },

    /// A configuration value failed validation.
    #[error("validation error for '{field}': {message}")]
    Validation {
        /// The field that failed validation.
        field: String,
        /// A description of the validation failure.
        message: String,
    },

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The HTTP server failed.
    #[error("server error: {reason}")]
    Server {
        /// What went wrong.
        reason: String,
    },
}

impl From<crate::port::InvalidPortError> for Error {
    fn from(err: crate::port::InvalidPortError) -> Self {
        Self::InvalidPort {
            value: err.value,
            reason: err.reason,
        }
    }
}

impl From<crate::port::InvalidPortRangeError> for Error {
    fn from(err: crate::port::InvalidPortRangeError) -> Self {
        Self::InvalidPortRange {
            min: err.min.value(),
            max: err.max.value(),
            reason: err.reason,
        }
    }
}

impl Error {
    /// Check if the error came from loading or validating configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use portmock::Error;
    ///
    /// let err = Error::Validation {
    ///     field: "minPort".into(),
    ///     message: "must be <= maxPort".into(),
    /// };
    /// assert!(err.is_configuration());
    /// ```
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::Configuration(_)
                | Self::ConfigNotFound { .. }
                | Self::Validation { .. }
                | Self::InvalidPort { .. }
                | Self::InvalidPortRange { .. }
        )
    }
}
