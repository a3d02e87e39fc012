//! Booking policy: service window, slot grid and reservation length.

use std::ops::RangeInclusive;

use chrono::{Days, Months};

use crate::clock::{ClockTime, InvalidTimeError, ServiceDate, TimeRange};
use crate::config::Config;
use crate::error::{Error, Result};

/// Default opening time of the bookable window.
pub const DEFAULT_SERVICE_OPEN: ClockTime = ClockTime::clamped(10 * 60);

/// Default last bookable slot.
pub const DEFAULT_SERVICE_CLOSE: ClockTime = ClockTime::clamped(22 * 60);

/// Default slot granularity in minutes.
pub const DEFAULT_SLOT_STEP_MINUTES: u16 = 15;

/// Default lookback buffer applied when listing slots.
pub const DEFAULT_LOOKBACK_MINUTES: u16 = 120;

/// Default reservation length.
pub const DEFAULT_DURATION_MINUTES: u16 = 120;

/// Default number of seats a table may exceed the party size by.
pub const DEFAULT_EXTRA_SEATS: u32 = 2;

/// Default bound on conflict retries during assignment.
pub const DEFAULT_MAX_ASSIGNMENT_ATTEMPTS: usize = 16;

/// Default earliest bookable date: tomorrow.
pub const DEFAULT_MIN_DAYS_AHEAD: u32 = 1;

/// Default latest bookable date, in months after today.
pub const DEFAULT_MAX_MONTHS_AHEAD: u32 = 3;

/// Resolved booking rules used by the availability calculator and the
/// table selector.
///
/// # Examples
///
/// ```
/// use tablebook::BookingPolicy;
///
/// let policy = BookingPolicy::default();
/// assert_eq!(policy.candidate_slots().len(), 49);
/// assert_eq!(policy.capacity_band(4), 4..=6);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingPolicy {
    /// First bookable slot.
    pub service_open: ClockTime,
    /// Last bookable slot (inclusive).
    pub service_close: ClockTime,
    /// Distance between consecutive slots.
    pub slot_step_minutes: u16,
    /// How far before a reservation's start a slot is already blocked.
    pub lookback_minutes: u16,
    /// Length of every reservation.
    pub duration_minutes: u16,
    /// Width of the capacity band above the party size.
    pub extra_seats: u32,
    /// Upper bound on insert attempts for one booking.
    pub max_assignment_attempts: usize,
    /// Earliest bookable date, in days after today.
    pub min_days_ahead: u32,
    /// Latest bookable date, in calendar months after today.
    pub max_months_ahead: u32,
}

impl Default for BookingPolicy {
    fn default() -> Self {
        Self {
            service_open: DEFAULT_SERVICE_OPEN,
            service_close: DEFAULT_SERVICE_CLOSE,
            slot_step_minutes: DEFAULT_SLOT_STEP_MINUTES,
            lookback_minutes: DEFAULT_LOOKBACK_MINUTES,
            duration_minutes: DEFAULT_DURATION_MINUTES,
            extra_seats: DEFAULT_EXTRA_SEATS,
            max_assignment_attempts: DEFAULT_MAX_ASSIGNMENT_ATTEMPTS,
            min_days_ahead: DEFAULT_MIN_DAYS_AHEAD,
            max_months_ahead: DEFAULT_MAX_MONTHS_AHEAD,
        }
    }
}

impl BookingPolicy {
    /// Resolves the policy from a merged configuration, falling back to
    /// defaults for unset fields.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the resulting policy is inconsistent.
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut policy = Self::default();

        if let Some(ref booking) = config.booking {
            if let Some(open) = booking.service_open {
                policy.service_open = open;
            }
            if let Some(close) = booking.service_close {
                policy.service_close = close;
            }
            if let Some(step) = booking.slot_step_minutes {
                policy.slot_step_minutes = step;
            }
            if let Some(lookback) = booking.lookback_minutes {
                policy.lookback_minutes = lookback;
            }
            if let Some(duration) = booking.duration_minutes {
                policy.duration_minutes = duration;
            }
            if let Some(extra) = booking.extra_seats {
                policy.extra_seats = extra;
            }
            if let Some(attempts) = booking.max_assignment_attempts {
                policy.max_assignment_attempts = attempts;
            }
            if let Some(days) = booking.min_days_ahead {
                policy.min_days_ahead = days;
            }
            if let Some(months) = booking.max_months_ahead {
                policy.max_months_ahead = months;
            }
        }

        policy.validate()?;
        Ok(policy)
    }

    /// Checks internal consistency.
    ///
    /// # Errors
    ///
    /// Returns an error for an empty window, a zero step or duration, a step
    /// that does not divide the window, a zero attempt bound, or a date
    /// range that ends before it starts.
    pub fn validate(&self) -> Result<()> {
        if self.service_close <= self.service_open {
            return Err(Error::Validation {
                field: "booking.service_close".into(),
                message: format!(
                    "service window {}-{} is empty",
                    self.service_open, self.service_close
                ),
            });
        }

        if self.slot_step_minutes == 0 {
            return Err(Error::Validation {
                field: "booking.slot_step_minutes".into(),
                message: "slot step must be greater than 0".into(),
            });
        }

        let window = self.service_close.minutes() - self.service_open.minutes();
        if window % self.slot_step_minutes != 0 {
            return Err(Error::Validation {
                field: "booking.slot_step_minutes".into(),
                message: format!(
                    "slot step {} does not divide the {window}-minute service window",
                    self.slot_step_minutes
                ),
            });
        }

        if self.duration_minutes == 0 {
            return Err(Error::Validation {
                field: "booking.duration_minutes".into(),
                message: "reservation duration must be greater than 0".into(),
            });
        }

        if self.max_assignment_attempts == 0 {
            return Err(Error::Validation {
                field: "booking.max_assignment_attempts".into(),
                message: "at least one assignment attempt is required".into(),
            });
        }

        if self.max_months_ahead == 0 {
            return Err(Error::Validation {
                field: "booking.max_months_ahead".into(),
                message: "bookable range must extend at least one month".into(),
            });
        }

        if self.min_days_ahead > self.max_months_ahead.saturating_mul(28) {
            return Err(Error::Validation {
                field: "booking.min_days_ahead".into(),
                message: format!(
                    "{} day(s) ahead lies beyond the {}-month booking range",
                    self.min_days_ahead, self.max_months_ahead
                ),
            });
        }

        Ok(())
    }

    /// All candidate slots, ascending, both window endpoints included.
    #[must_use]
    pub fn candidate_slots(&self) -> Vec<ClockTime> {
        let step = self.slot_step_minutes.max(1);
        let mut slots = Vec::new();
        let mut current = Some(self.service_open);
        while let Some(slot) = current {
            if slot > self.service_close {
                break;
            }
            slots.push(slot);
            current = slot.checked_add_minutes(step);
        }
        slots
    }

    /// Table capacities that may seat `party_size` guests.
    #[must_use]
    pub fn capacity_band(&self, party_size: u32) -> RangeInclusive<u32> {
        party_size.max(1)..=party_size.saturating_add(self.extra_seats)
    }

    /// Whether a requested start time lies inside the service window.
    #[must_use]
    pub fn is_within_service(&self, start: ClockTime) -> bool {
        self.service_open <= start && start <= self.service_close
    }

    /// Whether `start` falls on the slot grid anchored at the opening time.
    #[must_use]
    pub fn is_on_slot_grid(&self, start: ClockTime) -> bool {
        self.is_within_service(start)
            && (start.minutes() - self.service_open.minutes()) % self.slot_step_minutes.max(1) == 0
    }

    /// First and last date a booking made on `today` may be for.
    ///
    /// # Examples
    ///
    /// ```
    /// use tablebook::{BookingPolicy, ServiceDate};
    ///
    /// let today: ServiceDate = "30.11.2025".parse().unwrap();
    /// let (first, last) = BookingPolicy::default().bookable_dates(today);
    /// assert_eq!(first.to_string(), "01.12.2025");
    /// assert_eq!(last.to_string(), "28.02.2026");
    /// ```
    #[must_use]
    pub fn bookable_dates(&self, today: ServiceDate) -> (ServiceDate, ServiceDate) {
        let today = today.as_naive();
        let first = today
            .checked_add_days(Days::new(self.min_days_ahead.into()))
            .unwrap_or(chrono::NaiveDate::MAX);
        let last = today
            .checked_add_months(Months::new(self.max_months_ahead))
            .unwrap_or(chrono::NaiveDate::MAX);
        (first.into(), last.into())
    }

    /// Checks that `date` lies in the bookable range as seen on `today`.
    ///
    /// # Errors
    ///
    /// Returns a validation error on `date` otherwise.
    pub fn check_booking_date(&self, date: ServiceDate, today: ServiceDate) -> Result<()> {
        let (first, last) = self.bookable_dates(today);
        if date < first || date > last {
            return Err(Error::Validation {
                field: "date".into(),
                message: format!("{date} is outside the bookable range {first}-{last}"),
            });
        }
        Ok(())
    }

    /// End of a reservation starting at `start`, capped at 23:59.
    #[must_use]
    pub fn end_time(&self, start: ClockTime) -> ClockTime {
        start.saturating_add_minutes(self.duration_minutes)
    }

    /// The interval a reservation starting at `start` occupies.
    ///
    /// # Errors
    ///
    /// Returns an error if capping at 23:59 leaves an empty interval.
    pub fn reservation_window(&self, start: ClockTime) -> std::result::Result<TimeRange, InvalidTimeError> {
        TimeRange::new(start, self.end_time(start))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BookingConfig;

    fn t(s: &str) -> ClockTime {
        s.parse().unwrap()
    }

    #[test]
    fn test_default_policy() {
        let policy = BookingPolicy::default();
        assert_eq!(policy.service_open, t("10:00"));
        assert_eq!(policy.service_close, t("22:00"));
        assert_eq!(policy.lookback_minutes, 120);
        assert_eq!(policy.duration_minutes, 120);
        policy.validate().unwrap();
    }

    #[test]
    fn test_candidate_slots_include_both_endpoints() {
        let slots = BookingPolicy::default().candidate_slots();
        assert_eq!(slots.len(), 49);
        assert_eq!(slots.first(), Some(&t("10:00")));
        assert_eq!(slots.last(), Some(&t("22:00")));
        assert!(slots.windows(2).all(|w| w[1].minutes() - w[0].minutes() == 15));
    }

    #[test]
    fn test_capacity_band() {
        let policy = BookingPolicy::default();
        assert_eq!(policy.capacity_band(4), 4..=6);
        assert_eq!(policy.capacity_band(0), 1..=2);
        assert_eq!(policy.capacity_band(u32::MAX), u32::MAX..=u32::MAX);
    }

    #[test]
    fn test_end_time_caps_before_midnight() {
        let policy = BookingPolicy::default();
        assert_eq!(policy.end_time(t("18:00")), t("20:00"));
        assert_eq!(policy.end_time(t("22:00")), t("23:59"));
        assert!(policy.reservation_window(t("23:59")).is_err());
    }

    #[test]
    fn test_from_config_overrides() {
        let config = Config {
            booking: Some(BookingConfig {
                service_open: Some(t("12:00")),
                service_close: Some(t("14:00")),
                slot_step_minutes: Some(30),
                duration_minutes: Some(90),
                ..BookingConfig::default()
            }),
            ..Config::default()
        };
        let policy = BookingPolicy::from_config(&config).unwrap();
        assert_eq!(policy.candidate_slots(), vec![t("12:00"), t("12:30"), t("13:00"), t("13:30"), t("14:00")]);
        assert_eq!(policy.end_time(t("12:00")), t("13:30"));
        assert_eq!(policy.lookback_minutes, DEFAULT_LOOKBACK_MINUTES);
    }

    #[test]
    fn test_validate_rejects_inverted_window() {
        let policy = BookingPolicy {
            service_open: t("22:00"),
            service_close: t("10:00"),
            ..BookingPolicy::default()
        };
        assert!(policy.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_step_not_dividing_window() {
        let policy = BookingPolicy {
            slot_step_minutes: 25,
            ..BookingPolicy::default()
        };
        let err = policy.validate().unwrap_err();
        assert!(err.to_string().contains("does not divide"));
    }

    #[test]
    fn test_slot_grid() {
        let policy = BookingPolicy::default();
        assert!(policy.is_on_slot_grid(t("10:00")));
        assert!(policy.is_on_slot_grid(t("18:45")));
        assert!(policy.is_on_slot_grid(t("22:00")));
        assert!(!policy.is_on_slot_grid(t("18:07")));
        assert!(!policy.is_on_slot_grid(t("09:45")));
        assert!(!policy.is_on_slot_grid(t("22:15")));
    }

    #[test]
    fn test_booking_date_range() {
        let policy = BookingPolicy::default();
        let today: ServiceDate = "01.06.2025".parse().unwrap();
        let day = |s: &str| s.parse::<ServiceDate>().unwrap();

        assert!(policy.check_booking_date(day("02.06.2025"), today).is_ok());
        assert!(policy.check_booking_date(day("01.09.2025"), today).is_ok());

        for rejected in ["01.01.2020", "31.05.2025", "01.06.2025", "02.09.2025"] {
            let err = policy.check_booking_date(day(rejected), today).unwrap_err();
            assert!(
                matches!(err, Error::Validation { ref field, .. } if field == "date"),
                "{rejected}: {err}"
            );
        }
    }

    #[test]
    fn test_booking_date_range_configurable() {
        let config = Config {
            booking: Some(BookingConfig {
                min_days_ahead: Some(0),
                max_months_ahead: Some(12),
                ..BookingConfig::default()
            }),
            ..Config::default()
        };
        let policy = BookingPolicy::from_config(&config).unwrap();
        let today: ServiceDate = "01.06.2025".parse().unwrap();

        assert!(policy.check_booking_date(today, today).is_ok());
        assert!(policy.check_booking_date("01.06.2026".parse().unwrap(), today).is_ok());

        let inverted = BookingPolicy {
            min_days_ahead: 120,
            max_months_ahead: 1,
            ..BookingPolicy::default()
        };
        assert!(inverted.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_duration() {
        let policy = BookingPolicy {
            duration_minutes: 0,
            ..BookingPolicy::default()
        };
        assert!(policy.validate().is_err());
    }
}
