//! Logging infrastructure for portmock.
//!
//! The library logs through the `log` facade. [`Logger`] is the backend the
//! daemon installs: it writes timestamped lines to stderr, or appends them to
//! a log file when one is configured.

use std::env;
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, LineWriter, Write};
use std::path::Path;

use log::{LevelFilter, Metadata, Record};
use parking_lot::Mutex;

/// Environment variable consulted when no CLI flag picks a level.
pub const LOG_MODE_ENV: &str = "PORTMOCK_LOG_MODE";

/// Logging level for controlling output verbosity.
///
/// # Examples
///
/// ```
/// use portmock::LogLevel;
///
/// assert!(LogLevel::Quiet < LogLevel::Normal);
/// assert!(LogLevel::Normal < LogLevel::Verbose);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    /// Errors only.
    Quiet,
    /// Startup banner, request log, warnings and errors.
    Normal,
    /// Everything, including debug output.
    Verbose,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Quiet => write!(f, "quiet"),
            Self::Normal => write!(f, "normal"),
            Self::Verbose => write!(f, "verbose"),
        }
    }
}

impl LogLevel {
    /// Parses a log level from a string.
    ///
    /// Recognizes: "quiet", "normal", "verbose" (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not recognized.
    ///
    /// # Examples
    ///
    /// ```
    /// use portmock::LogLevel;
    ///
    /// assert_eq!(LogLevel::parse("quiet").unwrap(), LogLevel::Quiet);
    /// assert_eq!(LogLevel::parse("VERBOSE").unwrap(), LogLevel::Verbose);
    /// assert!(LogLevel::parse("chatty").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "quiet" => Ok(Self::Quiet),
            "normal" => Ok(Self::Normal),
            "verbose" => Ok(Self::Verbose),
            _ => Err(format!("invalid log level: {s}")),
        }
    }

    /// The `log` filter this level corresponds to.
    #[must_use]
    pub const fn filter(self) -> LevelFilter {
        match self {
            Self::Quiet => LevelFilter::Error,
            Self::Normal => LevelFilter::Info,
            Self::Verbose => LevelFilter::Debug,
        }
    }
}

/// Picks the effective level.
///
/// The priority order is:
/// 1. CLI flags (`verbose` wins over `quiet`)
/// 2. `PORTMOCK_LOG_MODE` environment variable
/// 3. `debug: true` in the configuration file (verbose)
/// 4. Normal
#[must_use]
pub fn resolve_level(verbose: bool, quiet: bool, config_debug: bool) -> LogLevel {
    if verbose {
        return LogLevel::Verbose;
    }
    if quiet {
        return LogLevel::Quiet;
    }

    if let Ok(env_value) = env::var(LOG_MODE_ENV) {
        if let Ok(level) = LogLevel::parse(&env_value) {
            return level;
        }
    }

    if config_debug {
        LogLevel::Verbose
    } else {
        LogLevel::Normal
    }
}

enum Sink {
    Stderr,
    File(LineWriter<File>),
}

/// A `log` backend writing to stderr or to an append-only log file.
pub struct Logger {
    level: LogLevel,
    sink: Mutex<Sink>,
}

impl Logger {
    /// Creates a logger writing to stderr.
    #[must_use]
    pub fn stderr(level: LogLevel) -> Self {
        Self {
            level,
            sink: Mutex::new(Sink::Stderr),
        }
    }

    /// Creates a logger appending to `path`, creating the file if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened for appending.
    pub fn file(level: LogLevel, path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            level,
            sink: Mutex::new(Sink::File(LineWriter::new(file))),
        })
    }

    /// Returns the configured log level.
    #[must_use]
    pub const fn level(&self) -> LogLevel {
        self.level
    }

    fn format_line(record: &Record<'_>) -> String {
        let timestamp = chrono::Local::now().format("%Y/%m/%d %H:%M:%S");
        match record.level() {
            log::Level::Info => format!("{timestamp} {}", record.args()),
            level => format!("{timestamp} {level}: {}", record.args()),
        }
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let target = match *self.sink.lock() {
            Sink::Stderr => "stderr",
            Sink::File(_) => "file",
        };
        f.debug_struct("Logger")
            .field("level", &self.level)
            .field("sink", &target)
            .finish()
    }
}

impl log::Log for Logger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.level.filter()
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let line = Self::format_line(record);
        let mut sink = self.sink.lock();
        // a failed log write has nowhere better to be reported
        let _ = match &mut *sink {
            Sink::Stderr => writeln!(io::stderr().lock(), "{line}"),
            Sink::File(writer) => writeln!(writer, "{line}"),
        };
    }

    fn flush(&self) {
        let mut sink = self.sink.lock();
        let _ = match &mut *sink {
            Sink::Stderr => io::stderr().flush(),
            Sink::File(writer) => writer.flush(),
        };
    }
}

/// Installs the process-wide logger.
///
/// With a `log_file`, output is appended to that file; if it cannot be
/// opened a notice is printed and logging falls back to stderr. Installing a
/// second logger is a no-op.
pub fn init_logger(level: LogLevel, log_file: Option<&Path>) {
    let logger = match log_file {
        Some(path) => Logger::file(level, path).unwrap_or_else(|e| {
            eprintln!(
                "Log file '{}' could not be opened, logging to stderr: {e}",
                path.display()
            );
            Logger::stderr(level)
        }),
        None => Logger::stderr(level),
    };

    if log::set_boxed_logger(Box::new(logger)).is_ok() {
        log::set_max_level(level.filter());
    }
}

/// Flushes whatever logger is installed. Called before the process exits.
pub fn flush() {
    log::logger().flush();
}
