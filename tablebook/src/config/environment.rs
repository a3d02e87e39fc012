//! Environment variable handling for configuration overrides.
//!
//! `TABLEBOOK_*` variables override file-based configuration values.

use crate::clock::ClockTime;
use crate::config::schema::Config;
use crate::error::{Error, Result};
use std::env;
use std::str::FromStr;

/// Handles environment variable overrides for configuration.
///
/// # Examples
///
/// ```no_run
/// use tablebook::config::{Config, EnvironmentConfig};
///
/// let mut config = Config::default();
/// EnvironmentConfig::apply_overrides(&mut config).unwrap();
/// ```
pub struct EnvironmentConfig;

impl EnvironmentConfig {
    /// Apply environment variable overrides to config.
    ///
    /// # Errors
    ///
    /// Returns an error if any variable holds a malformed value (a time that
    /// is not `HH:mm`, a non-numeric count, or an invalid boolean).
    pub fn apply_overrides(config: &mut Config) -> Result<()> {
        if let Ok(val) = env::var("TABLEBOOK_DISABLE_AUTOINIT") {
            config.disable_autoinit = Some(Self::parse_bool("TABLEBOOK_DISABLE_AUTOINIT", &val)?);
        }

        if let Ok(val) = env::var("TABLEBOOK_MAXIMUM_LOCK_WAIT_SECONDS") {
            config.maximum_lock_wait_seconds =
                Some(Self::parse_number("TABLEBOOK_MAXIMUM_LOCK_WAIT_SECONDS", &val)?);
        }

        Self::apply_booking_overrides(config)?;
        Self::apply_reconcile_overrides(config)?;

        Ok(())
    }

    fn apply_booking_overrides(config: &mut Config) -> Result<()> {
        let mut booking = config.booking.clone().unwrap_or_default();
        let mut modified = false;

        if let Ok(val) = env::var("TABLEBOOK_SERVICE_OPEN") {
            booking.service_open = Some(Self::parse_time("TABLEBOOK_SERVICE_OPEN", &val)?);
            modified = true;
        }

        if let Ok(val) = env::var("TABLEBOOK_SERVICE_CLOSE") {
            booking.service_close = Some(Self::parse_time("TABLEBOOK_SERVICE_CLOSE", &val)?);
            modified = true;
        }

        if let Ok(val) = env::var("TABLEBOOK_SLOT_STEP_MINUTES") {
            booking.slot_step_minutes = Some(Self::parse_number("TABLEBOOK_SLOT_STEP_MINUTES", &val)?);
            modified = true;
        }

        if let Ok(val) = env::var("TABLEBOOK_LOOKBACK_MINUTES") {
            booking.lookback_minutes = Some(Self::parse_number("TABLEBOOK_LOOKBACK_MINUTES", &val)?);
            modified = true;
        }

        if let Ok(val) = env::var("TABLEBOOK_DURATION_MINUTES") {
            booking.duration_minutes = Some(Self::parse_number("TABLEBOOK_DURATION_MINUTES", &val)?);
            modified = true;
        }

        if let Ok(val) = env::var("TABLEBOOK_EXTRA_SEATS") {
            booking.extra_seats = Some(Self::parse_number("TABLEBOOK_EXTRA_SEATS", &val)?);
            modified = true;
        }

        if let Ok(val) = env::var("TABLEBOOK_MIN_DAYS_AHEAD") {
            booking.min_days_ahead = Some(Self::parse_number("TABLEBOOK_MIN_DAYS_AHEAD", &val)?);
            modified = true;
        }

        if let Ok(val) = env::var("TABLEBOOK_MAX_MONTHS_AHEAD") {
            booking.max_months_ahead = Some(Self::parse_number("TABLEBOOK_MAX_MONTHS_AHEAD", &val)?);
            modified = true;
        }

        if modified {
            config.booking = Some(booking);
        }

        Ok(())
    }

    fn apply_reconcile_overrides(config: &mut Config) -> Result<()> {
        if let Ok(val) = env::var("TABLEBOOK_RECONCILE_INTERVAL_SECONDS") {
            let seconds = Self::parse_number("TABLEBOOK_RECONCILE_INTERVAL_SECONDS", &val)?;
            config
                .reconcile
                .get_or_insert_with(Default::default)
                .interval_seconds = Some(seconds);
        }

        Ok(())
    }

    fn parse_time(field: &str, s: &str) -> Result<ClockTime> {
        s.trim().parse().map_err(|e| Error::Validation {
            field: field.into(),
            message: format!("{e}"),
        })
    }

    fn parse_number<T: FromStr>(field: &str, s: &str) -> Result<T> {
        s.trim().parse().map_err(|_| Error::Validation {
            field: field.into(),
            message: format!("Must be a non-negative integer, got '{s}'"),
        })
    }

    /// Parse a boolean value from a string.
    ///
    /// Accepts: true/1/yes/on for true, false/0/no/off for false (case-insensitive).
    fn parse_bool(field: &str, s: &str) -> Result<bool> {
        match s.to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            _ => Err(Error::Validation {
                field: field.into(),
                message: format!(
                    "Invalid boolean value: '{s}' (expected true/false/1/0/yes/no/on/off)"
                ),
            }),
        }
    }
}
