//! Logging infrastructure for the tablebook library.
//!
//! Library code logs through the `log` facade. This module provides the
//! stderr backend used by the command-line tool.

use std::env;
use std::fmt;

use log::{LevelFilter, Metadata, Record};

/// Environment variable consulted when no CLI flag sets the level.
pub const LOG_MODE_ENV: &str = "TABLEBOOK_LOG_MODE";

/// Logging level for controlling output verbosity.
///
/// Log levels are ordered from least verbose (Quiet) to most verbose (Verbose).
///
/// # Examples
///
/// ```
/// use tablebook::LogLevel;
///
/// assert!(LogLevel::Quiet < LogLevel::Normal);
/// assert!(LogLevel::Normal < LogLevel::Verbose);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    /// Suppress all non-essential output.
    Quiet,
    /// Errors and warnings.
    Normal,
    /// Errors, warnings, info and debug messages.
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
    /// use tablebook::LogLevel;
    ///
    /// assert_eq!(LogLevel::parse("quiet").unwrap(), LogLevel::Quiet);
    /// assert_eq!(LogLevel::parse("VERBOSE").unwrap(), LogLevel::Verbose);
    /// assert!(LogLevel::parse("invalid").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "quiet" => Ok(Self::Quiet),
            "normal" => Ok(Self::Normal),
            "verbose" => Ok(Self::Verbose),
            _ => Err(format!("invalid log level: {s}")),
        }
    }

    /// The `log` filter this level maps to.
    #[must_use]
    pub const fn to_filter(self) -> LevelFilter {
        match self {
            Self::Quiet => LevelFilter::Off,
            Self::Normal => LevelFilter::Warn,
            Self::Verbose => LevelFilter::Debug,
        }
    }
}

/// A stderr backend for the `log` facade.
///
/// # Examples
///
/// ```
/// use log::Log;
/// use tablebook::{Logger, LogLevel};
///
/// let logger = Logger::new(LogLevel::Normal);
/// assert!(logger.enabled(&log::Metadata::builder().level(log::Level::Warn).build()));
/// assert!(!logger.enabled(&log::Metadata::builder().level(log::Level::Info).build()));
/// ```
pub struct Logger {
    level: LogLevel,
}

impl Logger {
    /// Creates a new logger with the specified log level.
    #[must_use]
    pub const fn new(level: LogLevel) -> Self {
        Self { level }
    }

    /// Returns the current log level.
    #[must_use]
    pub const fn level(&self) -> LogLevel {
        self.level
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new(LogLevel::Normal)
    }
}

impl log::Log for Logger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.level.to_filter()
    }

    fn log(&self, record: &Record<'_>) {
        if self.enabled(record.metadata()) {
            eprintln!("{}: {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

/// Resolves the effective level.
///
/// The priority order is:
/// 1. CLI flags (verbose/quiet, verbose wins if both are set)
/// 2. `TABLEBOOK_LOG_MODE` environment variable
/// 3. Default (Normal)
#[must_use]
pub fn resolve_level(verbose: bool, quiet: bool) -> LogLevel {
    if verbose {
        return LogLevel::Verbose;
    }
    if quiet {
        return LogLevel::Quiet;
    }

    env::var(LOG_MODE_ENV)
        .ok()
        .and_then(|value| LogLevel::parse(&value).ok())
        .unwrap_or(LogLevel::Normal)
}

/// Installs the stderr logger as the global `log` backend.
///
/// Safe to call more than once; only the first call installs a backend, but
/// every call updates the maximum level.
///
/// # Examples
///
/// ```
/// use tablebook::{init_logger, LogLevel};
///
/// assert_eq!(init_logger(true, false), LogLevel::Verbose);
/// ```
pub fn init_logger(verbose: bool, quiet: bool) -> LogLevel {
    let level = resolve_level(verbose, quiet);
    // A backend may already be installed by an embedding application.
    let _ = log::set_boxed_logger(Box::new(Logger::new(level)));
    log::set_max_level(level.to_filter());
    level
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::Log;
    use serial_test::serial;

    fn metadata(level: log::Level) -> Metadata<'static> {
        Metadata::builder().level(level).build()
    }

    #[test]
    fn test_log_level_ordering() {
        assert!(LogLevel::Quiet < LogLevel::Normal);
        assert!(LogLevel::Normal < LogLevel::Verbose);
    }

    #[test]
    fn test_log_level_display_and_parse() {
        for level in [LogLevel::Quiet, LogLevel::Normal, LogLevel::Verbose] {
            assert_eq!(LogLevel::parse(&level.to_string()).unwrap(), level);
        }
        assert_eq!(LogLevel::parse("Normal").unwrap(), LogLevel::Normal);
        assert!(LogLevel::parse("").is_err());
    }

    #[test]
    fn test_filters() {
        assert_eq!(LogLevel::Quiet.to_filter(), LevelFilter::Off);
        assert_eq!(LogLevel::Normal.to_filter(), LevelFilter::Warn);
        assert_eq!(LogLevel::Verbose.to_filter(), LevelFilter::Debug);
    }

    #[test]
    fn test_logger_enabled() {
        let quiet = Logger::new(LogLevel::Quiet);
        assert!(!quiet.enabled(&metadata(log::Level::Error)));

        let verbose = Logger::new(LogLevel::Verbose);
        assert!(verbose.enabled(&metadata(log::Level::Debug)));
        assert!(!verbose.enabled(&metadata(log::Level::Trace)));

        assert_eq!(Logger::default().level(), LogLevel::Normal);
    }

    #[test]
    #[serial]
    fn test_resolve_level_flags_override_env() {
        env::set_var(LOG_MODE_ENV, "quiet");
        assert_eq!(resolve_level(true, false), LogLevel::Verbose);
        assert_eq!(resolve_level(true, true), LogLevel::Verbose);
        assert_eq!(resolve_level(false, false), LogLevel::Quiet);
        env::remove_var(LOG_MODE_ENV);
    }

    #[test]
    #[serial]
    fn test_resolve_level_env_invalid_fallback() {
        env::set_var(LOG_MODE_ENV, "chatty");
        assert_eq!(resolve_level(false, false), LogLevel::Normal);
        env::remove_var(LOG_MODE_ENV);
        assert_eq!(resolve_level(false, true), LogLevel::Quiet);
    }

    #[test]
    #[serial]
    fn test_init_logger_installs_once_and_updates_level() {
        env::remove_var(LOG_MODE_ENV);
        assert_eq!(init_logger(true, false), LogLevel::Verbose);
        assert_eq!(log::max_level(), LevelFilter::Debug);

        // A second call keeps the backend and only moves the level.
        assert_eq!(init_logger(false, true), LogLevel::Quiet);
        assert_eq!(log::max_level(), LevelFilter::Off);
        log::warn!("dropped while quiet");

        init_logger(false, false);
        assert_eq!(log::max_level(), LevelFilter::Warn);
    }
}
