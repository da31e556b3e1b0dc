//! Configuration file discovery and loading.
//!
//! Files are parsed with `serde_yaml`, which reads both YAML and the JSON
//! files the daemon has always been configured with.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::schema::Config;
use crate::error::{Error, Result};

/// File loaded when no configuration file is named.
pub const DEFAULT_CONFIG_FILE: &str = "portmock.json";

const KNOWN_EXTENSIONS: [&str; 3] = ["json", "yaml", "yml"];

/// Loads configuration files.
///
/// # Examples
///
/// ```
/// use portmock::config::ConfigLoader;
/// use std::path::PathBuf;
///
/// assert_eq!(ConfigLoader::resolve_file_name("local"), PathBuf::from("local.json"));
/// assert_eq!(ConfigLoader::resolve_file_name("ci.yaml"), PathBuf::from("ci.yaml"));
/// ```
pub struct ConfigLoader;

impl ConfigLoader {
    /// Turns a user-supplied name into a file path.
    ///
    /// Names without a `.json`, `.yaml` or `.yml` extension (compared
    /// case-insensitively) get `.json` appended.
    #[must_use]
    pub fn resolve_file_name(name: &str) -> PathBuf {
        let has_known_extension = Path::new(name)
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                KNOWN_EXTENSIONS
                    .iter()
                    .any(|known| ext.eq_ignore_ascii_case(known))
            });

        if has_known_extension {
            PathBuf::from(name)
        } else {
            PathBuf::from(format!("{name}.json"))
        }
    }

    /// Loads the default file from `dir` if it exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_default(dir: &Path) -> Result<Option<(PathBuf, Config)>> {
        let path = dir.join(DEFAULT_CONFIG_FILE);
        if !path.exists() {
            return Ok(None);
        }
        let config = Self::load_file(&path)?;
        Ok(Some((path, config)))
    }

    /// Load and parse a configuration file.
    ///
    /// An empty file yields an all-default [`Config`].
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or its contents are
    /// invalid.
    pub fn load_file(path: &Path) -> Result<Config> {
        let contents = fs::read_to_string(path).map_err(|e| Error::ConfigNotFound {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        if contents.trim().is_empty() {
            return Ok(Config::default());
        }

        serde_yaml::from_str(&contents).map_err(|e| Error::Validation {
            field: format!("{}", path.display()),
            message: format!("Invalid configuration: {e}"),
        })
    }
}
