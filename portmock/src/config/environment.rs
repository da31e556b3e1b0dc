//! Environment variable handling for configuration overrides.
//!
//! `PORTMOCK_*` variables override values from the configuration file.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::config::schema::Config;
use crate::error::{Error, Result};

/// Handles environment variable overrides for configuration.
///
/// | variable | field |
/// |---|---|
/// | `PORTMOCK_PORT` | `port` |
/// | `PORTMOCK_MIN_PORT` | `minPort` |
/// | `PORTMOCK_MAX_PORT` | `maxPort` |
/// | `PORTMOCK_MIN_TIMEOUT` | `minTimeout` |
/// | `PORTMOCK_MAX_TIMEOUT` | `maxTimeout` |
/// | `PORTMOCK_TIMEOUT` | `timeout` |
/// | `PORTMOCK_LOG_FILE` | `logFileName` |
/// | `PORTMOCK_DEBUG` | `debug` |
pub struct EnvironmentConfig;

impl EnvironmentConfig {
    /// Apply environment variable overrides to config.
    ///
    /// # Errors
    ///
    /// Returns an error if any variable holds an unparsable value.
    pub fn apply_overrides(config: &mut Config) -> Result<()> {
        if let Some(port) = Self::parse_var("PORTMOCK_PORT")? {
            config.port = Some(port);
        }

        if let Some(min) = Self::parse_var("PORTMOCK_MIN_PORT")? {
            config.min_port = Some(min);
        }

        if let Some(max) = Self::parse_var("PORTMOCK_MAX_PORT")? {
            config.max_port = Some(max);
        }

        if let Some(min) = Self::parse_var("PORTMOCK_MIN_TIMEOUT")? {
            config.min_timeout = Some(min);
        }

        if let Some(max) = Self::parse_var("PORTMOCK_MAX_TIMEOUT")? {
            config.max_timeout = Some(max);
        }

        if let Some(timeout) = Self::parse_var("PORTMOCK_TIMEOUT")? {
            config.timeout = Some(timeout);
        }

        if let Ok(path) = env::var("PORTMOCK_LOG_FILE") {
            if !path.trim().is_empty() {
                config.log_file_name = Some(PathBuf::from(path));
            }
        }

        if let Ok(val) = env::var("PORTMOCK_DEBUG") {
            config.debug = Some(Self::parse_bool("PORTMOCK_DEBUG", &val)?);
        }

        Ok(())
    }

    fn parse_var<T: FromStr>(name: &str) -> Result<Option<T>> {
        match env::var(name) {
            Ok(raw) => raw.trim().parse().map(Some).map_err(|_| Error::Validation {
                field: name.into(),
                message: format!("Must be a non-negative integer, got '{raw}'"),
            }),
            Err(_) => Ok(None),
        }
    }

    /// Parse a boolean value from a string.
    ///
    /// Accepts: true/1/yes/on for true, false/0/no/off for false (case-insensitive).
    fn parse_bool(field: &str, s: &str) -> Result<bool> {
        match s.to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            _ => Err(Error::Validation {
                field: field.into(),
                message: format!(
                    "Invalid boolean value: '{s}' (expected true/false/1/0/yes/no/on/off)"
                ),
            }),
        }
    }
}
