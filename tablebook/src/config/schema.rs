//! Configuration schema definitions.
//!
//! Every field is optional so that partial files from several sources can be
//! merged; unset values fall back to built-in defaults when the booking
//! policy and reconcile options are resolved.

use serde::{Deserialize, Serialize};

use crate::clock::ClockTime;

/// Default interval between reconciliation passes, in seconds.
pub const DEFAULT_RECONCILE_INTERVAL_SECONDS: u64 = 300;

/// Default busy timeout for the store, in seconds.
pub const DEFAULT_LOCK_WAIT_SECONDS: u64 = 5;

/// Complete configuration structure.
///
/// # Examples
///
/// ```
/// use tablebook::config::{BookingConfig, Config};
///
/// let config = Config {
///     booking: Some(BookingConfig {
///         extra_seats: Some(1),
///         ..Default::default()
///     }),
///     ..Default::default()
/// };
/// assert_eq!(config.booking.unwrap().extra_seats, Some(1));
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Service window, slot grid and assignment settings.
    pub booking: Option<BookingConfig>,

    /// Table status reconciliation settings.
    pub reconcile: Option<ReconcileConfig>,

    /// Disable automatic database initialization.
    pub disable_autoinit: Option<bool>,

    /// Maximum time to wait for database lock acquisition (seconds).
    pub maximum_lock_wait_seconds: Option<u64>,

    /// Output format for list commands.
    pub output_format: Option<OutputFormat>,
}

/// Booking rules.
///
/// ```yaml
/// booking:
///   service_open: "10:00"
///   service_close: "22:00"
///   slot_step_minutes: 15
///   lookback_minutes: 120
///   duration_minutes: 120
///   extra_seats: 2
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct BookingConfig {
    /// First bookable slot.
    pub service_open: Option<ClockTime>,

    /// Last bookable slot.
    pub service_close: Option<ClockTime>,

    /// Slot granularity in minutes.
    pub slot_step_minutes: Option<u16>,

    /// Minutes before a reservation's start during which a slot is blocked.
    pub lookback_minutes: Option<u16>,

    /// Reservation length in minutes.
    pub duration_minutes: Option<u16>,

    /// How many seats a table may exceed the party size by.
    pub extra_seats: Option<u32>,

    /// Upper bound on insert attempts for one booking.
    pub max_assignment_attempts: Option<usize>,

    /// Earliest bookable date, in days after today.
    pub min_days_ahead: Option<u32>,

    /// Latest bookable date, in calendar months after today.
    pub max_months_ahead: Option<u32>,
}

/// Reconciliation job settings.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ReconcileConfig {
    /// Seconds between passes in watch mode.
    pub interval_seconds: Option<u64>,

    /// Mark active reservations whose end has passed as completed before
    /// recomputing table statuses.
    pub complete_elapsed: Option<bool>,
}

impl ReconcileConfig {
    /// Interval with the default applied.
    #[must_use]
    pub fn interval_seconds_or_default(&self) -> u64 {
        self.interval_seconds
            .unwrap_or(DEFAULT_RECONCILE_INTERVAL_SECONDS)
    }
}

/// Output format for list commands.
///
/// # Examples
///
/// ```
/// use tablebook::config::OutputFormat;
///
/// let format = OutputFormat::Json;
/// assert_eq!(format.to_string(), "json");
/// ```
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// JSON output format.
    Json,
    /// CSV output format.
    Csv,
    /// TSV output format.
    Tsv,
    /// Human-readable table format.
    Table,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json => write!(f, "json"),
            Self::Csv => write!(f, "csv"),
            Self::Tsv => write!(f, "tsv"),
            Self::Table => write!(f, "table"),
        }
    }
}
