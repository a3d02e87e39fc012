//! Database connection management.
//!
//! This module provides the main database connection type with the PRAGMA
//! settings the store relies on for concurrent writers.

use rusqlite::{Connection, ErrorCode, OpenFlags, Transaction, TransactionBehavior};

use crate::error::{Error, Result};

use super::config::DatabaseConfig;

/// A database connection wrapper with configuration.
///
/// Each process or thread that books tables opens its own `Database`; the
/// store serializes writers through `SQLite` locking.
///
/// # Examples
///
/// ```no_run
/// use tablebook::database::{Database, DatabaseConfig};
///
/// let config = DatabaseConfig::new("/tmp/tablebook.db");
/// let db = Database::open(config).unwrap();
/// ```
#[derive(Debug)]
pub struct Database {
    pub(super) conn: Connection,
    config: DatabaseConfig,
}

impl Database {
    /// Opens a database connection with the given configuration.
    ///
    /// This function will:
    /// - Create the parent directory if `auto_create` is enabled
    /// - Set WAL mode, `synchronous = NORMAL` and the busy timeout
    /// - Enable foreign keys
    /// - Initialize or verify the database schema
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened, the parent directory
    /// cannot be created, or the schema version is incompatible.
    pub fn open(config: DatabaseConfig) -> Result<Self> {
        if config.auto_create && !config.path.exists() {
            if let Some(parent) = config.path.parent() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let flags = if config.read_only {
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX
        } else if config.auto_create {
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_NO_MUTEX
        } else {
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX
        };

        let conn = Connection::open_with_flags(&config.path, flags)?;

        // busy_timeout must be in place before the journal mode switch, which
        // itself takes a lock when several connections open at once.
        conn.busy_timeout(config.busy_timeout)?;
        if !config.read_only {
            let _: String = conn.query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))?;
        }
        conn.execute_batch("PRAGMA synchronous = NORMAL; PRAGMA foreign_keys = ON;")?;

        super::migrations::check_schema_compatibility(&conn)?;
        log::debug!("opened store at {}", config.path.display());

        Ok(Self { conn, config })
    }

    /// Returns a reference to the underlying `SQLite` connection.
    #[must_use]
    pub const fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Returns a mutable reference to the underlying `SQLite` connection.
    pub fn connection_mut(&mut self) -> &mut Connection {
        &mut self.conn
    }

    /// The configuration this connection was opened with.
    #[must_use]
    pub const fn config(&self) -> &DatabaseConfig {
        &self.config
    }

    /// Seconds a writer waits on a locked store before giving up.
    pub(super) fn lock_wait_seconds(&self) -> u64 {
        self.config.busy_timeout.as_secs().max(1)
    }

    /// Starts an IMMEDIATE transaction, taking the write lock up front.
    ///
    /// # Errors
    ///
    /// Returns `LockTimeout` if the lock is not acquired within the busy
    /// timeout.
    pub(super) fn begin_immediate(&mut self) -> Result<Transaction<'_>> {
        let seconds = self.lock_wait_seconds();
        self.conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(|e| busy_to_timeout(seconds, e))
    }
}

/// Maps a busy or locked failure to [`Error::LockTimeout`]; other errors
/// pass through unchanged.
pub(super) fn busy_to_timeout(seconds: u64, err: rusqlite::Error) -> Error {
    match err {
        rusqlite::Error::SqliteFailure(ref e, _)
            if matches!(e.code, ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked) =>
        {
            Error::LockTimeout { seconds }
        }
        other => other.into(),
    }
}
