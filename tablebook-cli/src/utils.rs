//! Utility functions for CLI operations.
//!
//! Data directory resolution, configuration loading, store access, argument
//! parsing helpers and the shared output formats.

use crate::error::CliError;
use chrono::NaiveDateTime;
use clap::ValueEnum;
use std::path::PathBuf;
use std::time::Duration;
use tablebook::config::OutputFormat as ConfigOutputFormat;
use tablebook::database::{default_data_dir, DATABASE_FILE_NAME};
use tablebook::{
    BookingPolicy, ClockTime, Config, ConfigBuilder, Database, DatabaseConfig, ServiceDate,
};

/// Global CLI options shared across all commands.
#[derive(Debug, Clone)]
#[allow(dead_code)] // verbose is consumed by the logger in main.rs
pub struct GlobalOptions {
    /// Enable verbose output.
    pub verbose: bool,

    /// Suppress non-essential output.
    pub quiet: bool,

    /// Override the data directory location.
    pub data_dir: Option<PathBuf>,

    /// Override the default busy timeout (in seconds).
    pub busy_timeout: Option<u32>,

    /// Disable automatic database initialization.
    pub disable_autoinit: bool,
}

/// Output format for listing commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Tab-separated table format (human-readable)
    Table,
    /// JSON format
    Json,
    /// CSV format
    Csv,
    /// TSV format (tab-separated values)
    Tsv,
}

impl OutputFormat {
    /// The explicit flag if given, else the configured format, else a table.
    pub fn resolve(flag: Option<Self>, config: &Config) -> Self {
        flag.unwrap_or(match config.output_format {
            Some(ConfigOutputFormat::Json) => Self::Json,
            Some(ConfigOutputFormat::Csv) => Self::Csv,
            Some(ConfigOutputFormat::Tsv) => Self::Tsv,
            Some(ConfigOutputFormat::Table) | None => Self::Table,
        })
    }
}

/// Resolve the data directory: `--data-dir` / `TABLEBOOK_DATA_DIR`, else
/// `~/.tablebook`.
pub fn resolve_data_dir(global: &GlobalOptions) -> Result<PathBuf, CliError> {
    match global.data_dir {
        Some(ref dir) => Ok(dir.clone()),
        None => default_data_dir().map_err(|e| CliError::Config(e.to_string())),
    }
}

/// Load hierarchical configuration.
///
/// Configuration is merged from multiple sources with precedence:
/// 1. Environment variables (highest priority)
/// 2. Project files (`tablebook.local.yaml`, `tablebook.yaml`)
/// 3. User file (`<data-dir>/config.yaml`)
/// 4. Built-in defaults (lowest priority)
pub fn load_configuration(global: &GlobalOptions) -> Result<Config, CliError> {
    let data_dir = resolve_data_dir(global)?;

    ConfigBuilder::new()
        .with_data_dir(&data_dir)
        .build()
        .map_err(|e| CliError::Config(e.to_string()))
}

/// Resolve the booking policy from a loaded configuration.
pub fn booking_policy(config: &Config) -> Result<BookingPolicy, CliError> {
    BookingPolicy::from_config(config).map_err(|e| CliError::Config(e.to_string()))
}

/// Open database with configuration.
///
/// # Errors
///
/// Returns `NoDataDirectory` if the database doesn't exist and auto-init is
/// disabled by flag or configuration.
pub fn open_database(global: &GlobalOptions, config: &Config) -> Result<Database, CliError> {
    let db_path = resolve_data_dir(global)?.join(DATABASE_FILE_NAME);
    let autoinit_disabled = global.disable_autoinit || config.disable_autoinit == Some(true);

    if !db_path.exists() && autoinit_disabled {
        return Err(CliError::NoDataDirectory);
    }

    let mut db_config = DatabaseConfig::new(db_path);

    if let Some(timeout_seconds) = global.busy_timeout {
        db_config = db_config.with_busy_timeout(Duration::from_secs(timeout_seconds.into()));
    } else if let Some(timeout_seconds) = config.maximum_lock_wait_seconds {
        db_config = db_config.with_busy_timeout(Duration::from_secs(timeout_seconds));
    }

    Database::open(db_config).map_err(CliError::from)
}

/// Current local wall-clock time, the "now" every status decision uses.
pub fn local_now() -> NaiveDateTime {
    chrono::Local::now().naive_local()
}

/// Parse a `dd.mm.yyyy` or `yyyy-mm-dd` date argument.
pub fn parse_date(value: &str) -> Result<ServiceDate, CliError> {
    value
        .parse()
        .map_err(|e| CliError::InvalidArguments(format!("{e}")))
}

/// Parse an `HH:mm` time argument.
pub fn parse_time(value: &str) -> Result<ClockTime, CliError> {
    value
        .parse()
        .map_err(|e| CliError::InvalidArguments(format!("{e}")))
}

/// The date a command works on: the argument if given, else today.
pub fn date_or_today(value: Option<&str>) -> Result<ServiceDate, CliError> {
    value.map_or_else(|| Ok(ServiceDate::today()), parse_date)
}

/// Write rows as CSV or TSV to stdout.
pub fn write_delimited<I>(headers: &[&str], rows: I, delimiter: u8) -> Result<(), CliError>
where
    I: IntoIterator<Item = Vec<String>>,
{
    let stdout = std::io::stdout();
    let handle = stdout.lock();
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(handle);

    writer.write_record(headers)?;
    for row in rows {
        writer.write_record(&row)?;
    }
    writer.flush()?;

    Ok(())
}

/// Print a plan's warnings to stderr unless quiet.
pub fn print_warnings(global: &GlobalOptions, warnings: &[String]) {
    if global.quiet {
        return;
    }
    for warning in warnings {
        eprintln!("Warning: {warning}");
    }
}
