//! Configuration system for portmock.
//!
//! This module provides layered configuration with support for:
//! - JSON or YAML configuration files
//! - Environment variable overrides
//! - Programmatic configuration via builder pattern
//! - Validation into fully resolved [`Settings`]
//!
//! # Configuration Precedence
//!
//! Configuration is merged from multiple sources with the following precedence
//! (highest to lowest):
//!
//! 1. Programmatic overrides (via `ConfigBuilder::with_config`)
//! 2. Environment variables (`PORTMOCK_*`)
//! 3. The configuration file (`portmock.json` unless another is named)
//! 4. Built-in defaults
//!
//! # Examples
//!
//! Loading a named file, as `portmock serve mockServer` does:
//!
//! ```no_run
//! use portmock::config::ConfigBuilder;
//!
//! let settings = ConfigBuilder::new()
//!     .with_file("mockServer")
//!     .build()
//!     .unwrap();
//!
//! println!("{settings}");
//! ```
//!
//! Programmatic configuration:
//!
//! ```
//! use portmock::config::{Config, ConfigBuilder};
//!
//! let custom = Config {
//!     min_port: Some(9000),
//!     max_port: Some(9100),
//!     ..Default::default()
//! };
//!
//! let settings = ConfigBuilder::new()
//!     .skip_files()
//!     .skip_env()
//!     .with_config(custom)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(settings.ports.to_string(), "9000-9100");
//! ```

pub mod builder;
pub mod environment;
pub mod loader;
pub mod merger;
pub mod schema;
pub mod validator;

#[cfg(test)]
mod proptests;

// Re-export key types at module root
pub use builder::ConfigBuilder;
pub use environment::EnvironmentConfig;
pub use loader::{ConfigLoader, DEFAULT_CONFIG_FILE};
pub use merger::ConfigMerger;
pub use schema::{
    Config, Settings, DEFAULT_MAX_PORT, DEFAULT_MAX_TIMEOUT, DEFAULT_MIN_PORT,
    DEFAULT_MIN_TIMEOUT, DEFAULT_SERVER_PORT, DEFAULT_TIMEOUT,
};
pub use validator::ConfigValidator;
