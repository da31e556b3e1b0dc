//! Configuration validation.
//!
//! Turns a merged [`Config`] into [`Settings`], filling in defaults and
//! rejecting inconsistent values. Nothing is clamped.

use std::path::PathBuf;

use crate::config::schema::{
    Config, Settings, DEFAULT_MAX_PORT, DEFAULT_MAX_TIMEOUT, DEFAULT_MIN_PORT,
    DEFAULT_MIN_TIMEOUT, DEFAULT_SERVER_PORT, DEFAULT_TIMEOUT,
};
use crate::error::{Error, Result};
use crate::port::{Port, PortRange};
use crate::validation::TimeoutBounds;

/// Validates configuration.
///
/// # Examples
///
/// ```
/// use portmock::config::{Config, ConfigValidator};
///
/// let settings = ConfigValidator::resolve(&Config::default(), None).unwrap();
/// assert_eq!(settings.server_port.value(), 7999);
/// assert_eq!(settings.timeout, 20);
/// ```
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate a configuration without resolving it.
    ///
    /// # Errors
    ///
    /// Returns validation errors for invalid configurations.
    pub fn validate(config: &Config) -> Result<()> {
        Self::resolve(config, None).map(|_| ())
    }

    /// Fill in defaults and validate.
    ///
    /// # Errors
    ///
    /// Returns an error if a port is 0, `minPort > maxPort`,
    /// `minTimeout` is 0, `minTimeout > maxTimeout`, or the startup
    /// `timeout` lies outside the timeout bounds.
    pub fn resolve(config: &Config, source: Option<PathBuf>) -> Result<Settings> {
        let server_port = Self::port("port", config.port.unwrap_or(DEFAULT_SERVER_PORT))?;
        let min_port = Self::port("minPort", config.min_port.unwrap_or(DEFAULT_MIN_PORT))?;
        let max_port = Self::port("maxPort", config.max_port.unwrap_or(DEFAULT_MAX_PORT))?;

        let ports = PortRange::new(min_port, max_port).map_err(|_| Error::Validation {
            field: "minPort".into(),
            message: format!("minPort {min_port} must be <= maxPort {max_port}"),
        })?;

        let timeouts = Self::timeout_bounds(config)?;

        let timeout = config.timeout.unwrap_or(DEFAULT_TIMEOUT);
        if !timeouts.contains(timeout) {
            return Err(Error::Validation {
                field: "timeout".into(),
                message: format!(
                    "timeout {timeout} must lie within [{}, {}]",
                    timeouts.min(),
                    timeouts.max()
                ),
            });
        }

        Ok(Settings {
            server_port,
            ports,
            timeouts,
            timeout,
            log_file: config
                .log_file_name
                .clone()
                .filter(|path| !path.as_os_str().is_empty()),
            debug: config.debug.unwrap_or(false),
            source,
        })
    }

    fn port(field: &str, value: u16) -> Result<Port> {
        Port::try_from(value).map_err(|_| Error::Validation {
            field: field.into(),
            message: format!("Invalid port number: {value}"),
        })
    }

    fn timeout_bounds(config: &Config) -> Result<TimeoutBounds> {
        let min = config.min_timeout.unwrap_or(DEFAULT_MIN_TIMEOUT);
        let max = config.max_timeout.unwrap_or(DEFAULT_MAX_TIMEOUT);

        if min == 0 {
            return Err(Error::Validation {
                field: "minTimeout".into(),
                message: "Must be > 0".into(),
            });
        }

        if min > max {
            return Err(Error::Validation {
                field: "minTimeout".into(),
                message: format!("minTimeout {min} must be <= maxTimeout {max}"),
            });
        }

        Ok(TimeoutBounds::new(min, max))
    }
}
