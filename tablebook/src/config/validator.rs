//! Configuration validation.

use crate::booking::BookingPolicy;
use crate::config::schema::{Config, ReconcileConfig};
use crate::error::{Error, Result};

/// Validates configuration values.
///
/// # Examples
///
/// ```
/// use tablebook::config::{BookingConfig, Config, ConfigValidator};
///
/// let config = Config {
///     booking: Some(BookingConfig {
///         slot_step_minutes: Some(0),
///         ..Default::default()
///     }),
///     ..Default::default()
/// };
/// assert!(ConfigValidator::validate(&config).is_err());
/// ```
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate a complete configuration.
    ///
    /// # Errors
    ///
    /// Returns a validation error naming the first offending field.
    pub fn validate(config: &Config) -> Result<()> {
        // Unset booking fields take their defaults, so a partial section is
        // checked as the policy it resolves to.
        if config.booking.is_some() {
            BookingPolicy::from_config(config)?;
        }

        if let Some(ref reconcile) = config.reconcile {
            Self::validate_reconcile(reconcile)?;
        }

        if let Some(timeout) = config.maximum_lock_wait_seconds {
            if timeout == 0 {
                return Err(Error::Validation {
                    field: "maximum_lock_wait_seconds".into(),
                    message: "Timeout must be greater than 0".into(),
                });
            }
        }

        Ok(())
    }

    fn validate_reconcile(reconcile: &ReconcileConfig) -> Result<()> {
        if reconcile.interval_seconds == Some(0) {
            return Err(Error::Validation {
                field: "reconcile.interval_seconds".into(),
                message: "Interval must be greater than 0".into(),
            });
        }
        Ok(())
    }
}
