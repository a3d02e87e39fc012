//! Data directory initialization.
//!
//! Creates the data directory and the store, and optionally writes a
//! commented configuration file listing the booking settings.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::loader::USER_CONFIG_FILE;
use crate::database::DATABASE_FILE_NAME;
use crate::error::{Error, Result};
use crate::{Database, DatabaseConfig};

/// Options for initialization.
#[derive(Debug, Clone)]
pub struct InitOptions {
    /// Data directory to initialize.
    pub data_dir: PathBuf,
    /// Replace an existing store.
    pub overwrite: bool,
    /// Write a default configuration file.
    pub create_config: bool,
    /// Report what would happen without touching the filesystem.
    pub dry_run: bool,
}

impl InitOptions {
    /// Creates new initialization options.
    #[must_use]
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            data_dir,
            overwrite: false,
            create_config: false,
            dry_run: false,
        }
    }

    /// Sets whether to overwrite an existing store.
    #[must_use]
    pub const fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Sets whether to create a default configuration file.
    #[must_use]
    pub const fn with_create_config(mut self, create_config: bool) -> Self {
        self.create_config = create_config;
        self
    }

    /// Sets dry-run mode.
    #[must_use]
    pub const fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

/// Result of initialization.
#[derive(Debug)]
pub struct InitResult {
    /// Whether the data directory was created.
    pub data_dir_created: bool,
    /// Whether the store was created or recreated.
    pub database_created: bool,
    /// Whether a configuration file was written.
    pub config_created: bool,
    /// Path to the data directory.
    pub data_dir: PathBuf,
}

/// Default configuration written by `init --with-config`.
const DEFAULT_CONFIG_TEMPLATE: &str = r"# tablebook configuration

booking:
  # First and last bookable slot, both inclusive
  service_open: '10:00'
  service_close: '22:00'
  slot_step_minutes: 15
  # A slot is blocked from this long before a reservation starts
  lookback_minutes: 120
  # Length of every reservation
  duration_minutes: 120
  # Tables may have up to this many seats more than the party
  extra_seats: 2
  # max_assignment_attempts: 16
  # Bookable dates run from this many days after today...
  min_days_ahead: 1
  # ...up to this many months ahead
  max_months_ahead: 3

# reconcile:
#   interval_seconds: 300
#   complete_elapsed: false

# Maximum store lock wait in seconds (default: 5)
# maximum_lock_wait_seconds: 5
";

fn remove_store_files(db_path: &Path) -> Result<()> {
    fs::remove_file(db_path)?;
    for suffix in ["-wal", "-shm"] {
        let mut side = db_path.as_os_str().to_owned();
        side.push(suffix);
        let side = PathBuf::from(side);
        if side.exists() {
            fs::remove_file(side)?;
        }
    }
    Ok(())
}

/// Initializes the data directory and store.
///
/// # Errors
///
/// Returns a validation error if the store exists and `overwrite` is not
/// set, or an I/O or database error.
///
/// # Examples
///
/// ```no_run
/// use tablebook::operations::init::{init_database, InitOptions};
/// use std::path::PathBuf;
///
/// let options = InitOptions::new(PathBuf::from("/tmp/tablebook-test")).with_create_config(true);
/// let result = init_database(&options).unwrap();
/// println!("store created: {}", result.database_created);
/// ```
pub fn init_database(options: &InitOptions) -> Result<InitResult> {
    let db_path = options.data_dir.join(DATABASE_FILE_NAME);
    let config_path = options.data_dir.join(USER_CONFIG_FILE);
    let dir_exists = options.data_dir.exists();
    let db_exists = db_path.exists();

    if db_exists && !options.overwrite {
        return Err(Error::Validation {
            field: "database".into(),
            message: format!(
                "Database already exists at {}. Use --overwrite to replace it.",
                db_path.display()
            ),
        });
    }

    let result = InitResult {
        data_dir_created: !dir_exists,
        database_created: true,
        config_created: options.create_config && !config_path.exists(),
        data_dir: options.data_dir.clone(),
    };

    if options.dry_run {
        return Ok(result);
    }

    if !dir_exists {
        fs::create_dir_all(&options.data_dir)?;
    }
    if db_exists {
        remove_store_files(&db_path)?;
    }

    Database::open(DatabaseConfig::new(&db_path))?;
    log::info!("initialized store at {}", db_path.display());

    if result.config_created {
        fs::write(&config_path, DEFAULT_CONFIG_TEMPLATE)?;
    }

    Ok(result)
}
