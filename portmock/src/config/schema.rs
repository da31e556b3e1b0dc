//! Configuration schema definitions.
//!
//! [`Config`] mirrors the configuration file: every field is optional so
//! that files, environment variables and CLI flags can each supply a subset.
//! [`Settings`] is the validated result with defaults filled in.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::port::{Port, PortRange};
use crate::validation::TimeoutBounds;

/// Default port the daemon listens on, one below the allocation range.
pub const DEFAULT_SERVER_PORT: u16 = DEFAULT_MIN_PORT - 1;
/// Default lower bound of the allocation range.
pub const DEFAULT_MIN_PORT: u16 = 8000;
/// Default upper bound of the allocation range.
pub const DEFAULT_MAX_PORT: u16 = 8999;
/// Default smallest accepted idle timeout, in seconds.
pub const DEFAULT_MIN_TIMEOUT: u64 = 5;
/// Default largest accepted idle timeout, in seconds.
pub const DEFAULT_MAX_TIMEOUT: u64 = 300;
/// Default idle timeout, in seconds.
pub const DEFAULT_TIMEOUT: u64 = 20;

/// Configuration as read from a file or assembled from overrides.
///
/// Keys are camelCase. The PascalCase and all-lowercase spellings used by
/// older daemon config files are accepted as aliases, and keys this daemon
/// does not know are ignored so those files keep loading.
///
/// # Examples
///
/// ```
/// use portmock::config::Config;
///
/// let config: Config = serde_yaml::from_str(
///     r#"{"port": 7999, "minPort": 8000, "maxPort": 9000, "Timeout": 300}"#,
/// ).unwrap();
/// assert_eq!(config.max_port, Some(9000));
/// assert_eq!(config.timeout, Some(300));
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Port the daemon listens on.
    #[serde(alias = "Port", skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,

    /// Lower bound of the allocation range.
    #[serde(alias = "MinPort", alias = "minport", skip_serializing_if = "Option::is_none")]
    pub min_port: Option<u16>,

    /// Upper bound of the allocation range.
    #[serde(alias = "MaxPort", alias = "maxport", skip_serializing_if = "Option::is_none")]
    pub max_port: Option<u16>,

    /// Smallest idle timeout a client may set.
    #[serde(alias = "MinTimeout", alias = "mintimeout", skip_serializing_if = "Option::is_none")]
    pub min_timeout: Option<u64>,

    /// Largest idle timeout a client may set.
    #[serde(alias = "MaxTimeout", alias = "maxtimeout", skip_serializing_if = "Option::is_none")]
    pub max_timeout: Option<u64>,

    /// Idle timeout applied at startup.
    #[serde(alias = "Timeout", skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,

    /// Append log output to this file instead of stderr. Empty means stderr.
    #[serde(alias = "LogFileName", alias = "logfilename", skip_serializing_if = "Option::is_none")]
    pub log_file_name: Option<PathBuf>,

    /// Verbose logging, including the resolved configuration at startup.
    #[serde(alias = "Debug", skip_serializing_if = "Option::is_none")]
    pub debug: Option<bool>,
}

/// Validated, fully resolved configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Port the daemon listens on. Permanently reserved in the registry.
    pub server_port: Port,
    /// Range ports are allocated from.
    pub ports: PortRange,
    /// Accepted idle timeout range.
    pub timeouts: TimeoutBounds,
    /// Idle timeout applied at startup.
    pub timeout: u64,
    /// Optional log file.
    pub log_file: Option<PathBuf>,
    /// Debug mode.
    pub debug: bool,
    /// The file the configuration was loaded from, if any.
    pub source: Option<PathBuf>,
}

impl fmt::Display for Settings {
    /// One-line summary written to the log at startup in debug mode.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let log_file = self
            .log_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        write!(
            f,
            "CFG{{\"port\":{}, \"minPort\":{}, \"maxPort\":{}, \"minTimeout\":{}, \"maxTimeout\":{}, \"timeout\":{}, \"logfilename\":\"{}\"}}",
            self.server_port,
            self.ports.min(),
            self.ports.max(),
            self.timeouts.min(),
            self.timeouts.max(),
            self.timeout,
            log_file
        )
    }
}
