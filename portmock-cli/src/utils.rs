//! Utility functions for CLI operations.
//!
//! This module provides the options shared by the commands: global flags,
//! the configuration arguments of `serve` and `validate`, and helpers for
//! running the daemon.

use crate::error::CliError;
use clap::Args;
use portmock::config::{Config, ConfigBuilder};
use portmock::Settings;
use std::env;
use std::path::PathBuf;

/// Global CLI options shared across all commands.
#[derive(Debug, Clone, Copy)]
pub struct GlobalOptions {
    /// Enable verbose output.
    pub verbose: bool,

    /// Suppress non-essential output.
    pub quiet: bool,
}

/// Configuration file and per-field overrides.
///
/// Flags take precedence over `PORTMOCK_*` environment variables, which take
/// precedence over the file.
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigArgs {
    /// Configuration file; `.json` is appended when the name has no
    /// `.json`, `.yaml` or `.yml` extension [default: portmock.json]
    #[arg(value_name = "CONFIG")]
    pub config: Option<String>,

    /// Port the daemon listens on
    #[arg(long, value_name = "PORT")]
    pub port: Option<u16>,

    /// Lower bound of the allocation range
    #[arg(long, value_name = "PORT")]
    pub min_port: Option<u16>,

    /// Upper bound of the allocation range
    #[arg(long, value_name = "PORT")]
    pub max_port: Option<u16>,

    /// Smallest idle timeout a client may set, in seconds
    #[arg(long, value_name = "SECONDS")]
    pub min_timeout: Option<u64>,

    /// Largest idle timeout a client may set, in seconds
    #[arg(long, value_name = "SECONDS")]
    pub max_timeout: Option<u64>,

    /// Idle timeout applied at startup, in seconds
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// Append log output to this file instead of stderr
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Ignore PORTMOCK_* environment variables
    #[arg(long)]
    pub no_env: bool,
}

impl ConfigArgs {
    /// The flags as a configuration layer.
    fn overrides(&self) -> Config {
        Config {
            port: self.port,
            min_port: self.min_port,
            max_port: self.max_port,
            min_timeout: self.min_timeout,
            max_timeout: self.max_timeout,
            timeout: self.timeout,
            log_file_name: self.log_file.clone(),
            debug: None,
        }
    }

    /// Load, merge and validate the configuration.
    pub fn load(&self) -> Result<Settings, CliError> {
        let mut builder = ConfigBuilder::new().with_config(self.overrides());

        if let Some(ref name) = self.config {
            builder = builder.with_file(name.as_str());
        }

        if self.no_env {
            builder = builder.skip_env();
        }

        Ok(builder.build()?)
    }
}

/// Name reported in the `Server` response header: the executable's file name,
/// without its directory.
pub fn server_name() -> String {
    env::current_exe()
        .ok()
        .and_then(|path| path.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_else(|| env!("CARGO_PKG_NAME").to_string())
}

/// Completes when the process receives SIGINT, SIGTERM or SIGQUIT.
#[cfg(unix)]
pub async fn wait_for_shutdown_signal() -> std::io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigquit = signal(SignalKind::quit())?;

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {},
        _ = sigint.recv()  => {},
        _ = sigterm.recv() => {},
        _ = sigquit.recv() => {},
    }
    Ok(())
}

/// Completes on Ctrl-C.
#[cfg(not(unix))]
pub async fn wait_for_shutdown_signal() -> std::io::Result<()> {
    tokio::signal::ctrl_c().await
}
