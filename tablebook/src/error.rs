//! Error types for the tablebook library.
//!
//! Every fallible operation in the crate returns [`Result`], whose error side
//! is the [`Error`] enum below. Business outcomes (a conflicting booking, no
//! table in the capacity band) are ordinary variants so that callers can tell
//! them apart from store failures.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for operations that may fail with a tablebook error.
///
/// # Examples
///
/// ```
/// use tablebook::{Error, Result};
///
/// fn party_size() -> Result<u32> {
///     Ok(4)
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the tablebook library.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed input, rejected before the store is touched.
    #[error("validation error for '{field}': {message}")]
    Validation {
        /// The field that failed validation.
        field: String,
        /// A description of the validation failure.
        message: String,
    },

    /// A date or time-of-day value could not be parsed.
    #[error("invalid time value '{value}': {reason}")]
    InvalidTime {
        /// The rejected input.
        value: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A referenced restaurant, table or reservation does not exist.
    #[error("not found: {resource}")]
    NotFound {
        /// The resource that was not found.
        resource: String,
    },

    /// Every candidate table conflicted with another booking at write time.
    #[error("reservation conflict: {details}")]
    ReservationConflict {
        /// Details about the conflict.
        details: String,
    },

    /// No table in the capacity band is free for the requested slot.
    #[error("no table available for {party_size} guest(s) on {date} at {time}")]
    NoTableAvailable {
        /// The requested party size.
        party_size: u32,
        /// The requested date, as stored (`dd.mm.yyyy`).
        date: String,
        /// The requested start time (`HH:mm`).
        time: String,
    },

    /// A database error occurred.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A configuration file could not be parsed.
    #[error("configuration error: {0}")]
    Configuration(#[from] serde_yaml::Error),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A filesystem path could not be used.
    #[error("invalid path {}: {reason}", path.display())]
    InvalidPath {
        /// The offending path.
        path: PathBuf,
        /// The reason the path is unusable.
        reason: String,
    },

    /// The store stayed locked for longer than the configured wait.
    #[error("database lock timeout after {seconds}s")]
    LockTimeout {
        /// The number of seconds waited before timing out.
        seconds: u64,
    },

    /// The data directory was not found and auto-initialization is disabled.
    #[error("data directory not found: {}", path.display())]
    DataDirectoryNotFound {
        /// The expected path to the data directory.
        path: PathBuf,
    },

    /// Database corruption was detected.
    #[error("database corruption detected: {details}")]
    DatabaseCorruption {
        /// Details about the corruption.
        details: String,
    },

    /// An unsupported schema version was encountered.
    #[error("unsupported schema version: expected {expected}, found {found}")]
    UnsupportedSchemaVersion {
        /// The schema version this build understands.
        expected: i32,
        /// The schema version found in the database.
        found: i32,
    },
}

impl From<crate::reservation::ValidationError> for Error {
    fn from(err: crate::reservation::ValidationError) -> Self {
        Self::Validation {
            field: err.field,
            message: err.message,
        }
    }
}

impl From<crate::clock::InvalidTimeError> for Error {
    fn from(err: crate::clock::InvalidTimeError) -> Self {
        Self::InvalidTime {
            value: err.value,
            reason: err.reason,
        }
    }
}

impl Error {
    /// Returns true for failures where retrying the whole operation may help.
    ///
    /// These are store busy/locked conditions and lock timeouts. Business
    /// outcomes and validation failures are never transient.
    ///
    /// # Examples
    ///
    /// ```
    /// use tablebook::Error;
    ///
    /// assert!(Error::LockTimeout { seconds: 5 }.is_transient());
    /// assert!(!Error::NotFound { resource: "table 3".into() }.is_transient());
    /// ```
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::LockTimeout { .. } => true,
            Self::Database(rusqlite::Error::SqliteFailure(err, _)) => matches!(
                err.code,
                rusqlite::ErrorCode::DatabaseBusy | rusqlite::ErrorCode::DatabaseLocked
            ),
            _ => false,
        }
    }

    /// Returns true if a booking lost a write-time race on every candidate.
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::ReservationConflict { .. })
    }

    /// Returns true if no table could serve the request at all.
    #[must_use]
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::NoTableAvailable { .. })
    }

    /// Returns true if a referenced entity does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns true for input validation failures.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. } | Self::InvalidTime { .. })
    }
}
