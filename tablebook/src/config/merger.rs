//! Configuration merging and precedence handling.

use crate::config::loader::ConfigSource;
use crate::config::schema::{BookingConfig, Config, ReconcileConfig};

/// Merges configuration sources according to precedence rules.
///
/// # Examples
///
/// ```
/// use tablebook::config::{Config, ConfigMerger};
///
/// let low = Config { maximum_lock_wait_seconds: Some(5), ..Default::default() };
/// let high = Config { maximum_lock_wait_seconds: Some(30), ..Default::default() };
///
/// let mut result = low;
/// ConfigMerger::merge_into(&mut result, &high);
/// assert_eq!(result.maximum_lock_wait_seconds, Some(30));
/// ```
pub struct ConfigMerger;

impl ConfigMerger {
    /// Merge multiple configuration sources into final config.
    ///
    /// Sources should be provided in order from lowest to highest precedence.
    #[must_use]
    pub fn merge(sources: Vec<ConfigSource>) -> Config {
        let mut result = Config::default();

        for source in sources {
            Self::merge_into(&mut result, &source.config);
        }

        result
    }

    /// Merge source config into target (source overwrites target).
    ///
    /// Scalar fields are replaced when set in `source`. The `booking` and
    /// `reconcile` sections merge field by field.
    pub fn merge_into(target: &mut Config, source: &Config) {
        if source.disable_autoinit.is_some() {
            target.disable_autoinit = source.disable_autoinit;
        }

        if source.maximum_lock_wait_seconds.is_some() {
            target.maximum_lock_wait_seconds = source.maximum_lock_wait_seconds;
        }

        if source.output_format.is_some() {
            target.output_format = source.output_format;
        }

        if let Some(ref source_booking) = source.booking {
            target.booking = Some(match &target.booking {
                Some(target_booking) => Self::merge_booking(target_booking, source_booking),
                None => source_booking.clone(),
            });
        }

        if let Some(ref source_reconcile) = source.reconcile {
            target.reconcile = Some(match &target.reconcile {
                Some(target_reconcile) => Self::merge_reconcile(target_reconcile, source_reconcile),
                None => source_reconcile.clone(),
            });
        }
    }

    fn merge_booking(target: &BookingConfig, source: &BookingConfig) -> BookingConfig {
        BookingConfig {
            service_open: source.service_open.or(target.service_open),
            service_close: source.service_close.or(target.service_close),
            slot_step_minutes: source.slot_step_minutes.or(target.slot_step_minutes),
            lookback_minutes: source.lookback_minutes.or(target.lookback_minutes),
            duration_minutes: source.duration_minutes.or(target.duration_minutes),
            extra_seats: source.extra_seats.or(target.extra_seats),
            max_assignment_attempts: source
                .max_assignment_attempts
                .or(target.max_assignment_attempts),
            min_days_ahead: source.min_days_ahead.or(target.min_days_ahead),
            max_months_ahead: source.max_months_ahead.or(target.max_months_ahead),
        }
    }

    fn merge_reconcile(target: &ReconcileConfig, source: &ReconcileConfig) -> ReconcileConfig {
        ReconcileConfig {
            interval_seconds: source.interval_seconds.or(target.interval_seconds),
            complete_elapsed: source.complete_elapsed.or(target.complete_elapsed),
        }
    }
}
