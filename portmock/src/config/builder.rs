//! Builder assembling [`Settings`] from every configuration source.

use std::path::{Path, PathBuf};

use crate::config::environment::EnvironmentConfig;
use crate::config::loader::ConfigLoader;
use crate::config::merger::ConfigMerger;
use crate::config::schema::{Config, Settings};
use crate::config::validator::ConfigValidator;
use crate::error::Result;

/// Builder for loading and merging configuration.
///
/// Layers, lowest precedence first: built-in defaults, the configuration
/// file, `PORTMOCK_*` environment variables, then programmatic overrides
/// (CLI flags).
///
/// # Examples
///
/// ```
/// use portmock::config::{Config, ConfigBuilder};
///
/// let settings = ConfigBuilder::new()
///     .skip_files()
///     .skip_env()
///     .with_config(Config { timeout: Some(60), ..Default::default() })
///     .build()
///     .unwrap();
/// assert_eq!(settings.timeout, 60);
/// ```
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    file: Option<String>,
    working_dir: Option<PathBuf>,
    skip_files: bool,
    skip_env: bool,
    overrides: Option<Config>,
}

impl ConfigBuilder {
    /// Create a new configuration builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the named file instead of the default one.
    ///
    /// The name goes through [`ConfigLoader::resolve_file_name`]. Unlike the
    /// default file, a named file must exist.
    #[must_use]
    pub fn with_file(mut self, name: impl Into<String>) -> Self {
        self.file = Some(name.into());
        self
    }

    /// Set the directory the default file is looked up in.
    ///
    /// Defaults to the current directory.
    #[must_use]
    pub fn with_working_dir(mut self, dir: &Path) -> Self {
        self.working_dir = Some(dir.to_path_buf());
        self
    }

    /// Skip loading configuration files.
    #[must_use]
    pub const fn skip_files(mut self) -> Self {
        self.skip_files = true;
        self
    }

    /// Skip environment variable overrides.
    #[must_use]
    pub const fn skip_env(mut self) -> Self {
        self.skip_env = true;
        self
    }

    /// Add programmatic configuration overrides (highest precedence).
    #[must_use]
    pub fn with_config(mut self, config: Config) -> Self {
        self.overrides = Some(config);
        self
    }

    /// Build the final settings.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A named configuration file cannot be read
    /// - Any configuration file is malformed
    /// - Environment variables hold unparsable values
    /// - The merged configuration fails validation
    pub fn build(self) -> Result<Settings> {
        let mut merged = Config::default();
        let mut source = None;

        if !self.skip_files {
            if let Some((path, config)) = self.load_file()? {
                log::debug!("Loaded configuration from {}", path.display());
                ConfigMerger::merge_into(&mut merged, &config);
                source = Some(path);
            }
        }

        if !self.skip_env {
            EnvironmentConfig::apply_overrides(&mut merged)?;
        }

        if let Some(ref overrides) = self.overrides {
            ConfigMerger::merge_into(&mut merged, overrides);
        }

        ConfigValidator::resolve(&merged, source)
    }

    fn load_file(&self) -> Result<Option<(PathBuf, Config)>> {
        if let Some(ref name) = self.file {
            let mut path = ConfigLoader::resolve_file_name(name);
            if path.is_relative() {
                if let Some(ref dir) = self.working_dir {
                    path = dir.join(path);
                }
            }
            let config = ConfigLoader::load_file(&path)?;
            return Ok(Some((path, config)));
        }

        let dir = self.working_dir.clone().unwrap_or_else(|| PathBuf::from("."));
        ConfigLoader::load_default(&dir)
    }
}
