//! Configuration merging and precedence handling.

use crate::config::schema::Config;

/// Merges configuration layers according to precedence rules.
///
/// # Examples
///
/// ```
/// use portmock::config::{Config, ConfigMerger};
///
/// let file = Config { port: Some(7999), timeout: Some(60), ..Default::default() };
/// let flags = Config { timeout: Some(120), ..Default::default() };
///
/// let mut result = file;
/// ConfigMerger::merge_into(&mut result, &flags);
/// assert_eq!(result.port, Some(7999));
/// assert_eq!(result.timeout, Some(120));
/// ```
pub struct ConfigMerger;

impl ConfigMerger {
    /// Merge layers given from lowest to highest precedence.
    #[must_use]
    pub fn merge(layers: &[Config]) -> Config {
        let mut result = Config::default();
        for layer in layers {
            Self::merge_into(&mut result, layer);
        }
        result
    }

    /// Merge source config into target (source overwrites target).
    ///
    /// Every field is a plain scalar, so a `Some` in `source` replaces the
    /// target value and a `None` leaves it alone.
    pub fn merge_into(target: &mut Config, source: &Config) {
        if source.port.is_some() {
            target.port = source.port;
        }

        if source.min_port.is_some() {
            target.min_port = source.min_port;
        }

        if source.max_port.is_some() {
            target.max_port = source.max_port;
        }

        if source.min_timeout.is_some() {
            target.min_timeout = source.min_timeout;
        }

        if source.max_timeout.is_some() {
            target.max_timeout = source.max_timeout;
        }

        if source.timeout.is_some() {
            target.timeout = source.timeout;
        }

        if source.log_file_name.is_some() {
            target.log_file_name.clone_from(&source.log_file_name);
        }

        if source.debug.is_some() {
            target.debug = source.debug;
        }
    }
}
