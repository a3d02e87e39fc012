//! Calendar and time-of-day types for reservations.
//!
//! Reservations are persisted as human-readable strings (`dd.mm.yyyy` dates
//! and `HH:mm` times). This module parses those strings into comparable
//! values before any interval arithmetic happens.

use std::fmt;
use std::str::FromStr;

use chrono::{Local, NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

const MINUTES_PER_DAY: u16 = 24 * 60;

/// A time of day with minute precision, stored as minutes since midnight.
///
/// # Examples
///
/// ```
/// use tablebook::ClockTime;
///
/// let t: ClockTime = "18:30".parse().unwrap();
/// assert_eq!(t.minutes(), 18 * 60 + 30);
/// assert_eq!(t.to_string(), "18:30");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClockTime(u16);

impl ClockTime {
    /// 00:00.
    pub const MIDNIGHT: Self = Self(0);

    /// 23:59, the latest representable time of day.
    pub const LAST_MINUTE: Self = Self(MINUTES_PER_DAY - 1);

    /// Builds a time from hours and minutes.
    ///
    /// # Errors
    ///
    /// Returns an error if `hour > 23` or `minute > 59`.
    pub fn from_hm(hour: u8, minute: u8) -> Result<Self, InvalidTimeError> {
        if hour > 23 || minute > 59 {
            return Err(InvalidTimeError {
                value: format!("{hour:02}:{minute:02}"),
                reason: "hour must be 0-23 and minute 0-59".into(),
            });
        }
        Ok(Self(u16::from(hour) * 60 + u16::from(minute)))
    }

    /// Builds a time from minutes since midnight.
    ///
    /// # Errors
    ///
    /// Returns an error if `minutes` is 1440 or more.
    pub fn from_minutes(minutes: u16) -> Result<Self, InvalidTimeError> {
        if minutes >= MINUTES_PER_DAY {
            return Err(InvalidTimeError {
                value: minutes.to_string(),
                reason: "minutes since midnight must be below 1440".into(),
            });
        }
        Ok(Self(minutes))
    }

    /// Builds a time from minutes since midnight, clamping to 23:59.
    #[must_use]
    pub const fn clamped(minutes: u16) -> Self {
        if minutes >= MINUTES_PER_DAY {
            Self::LAST_MINUTE
        } else {
            Self(minutes)
        }
    }

    /// Minutes since midnight.
    #[must_use]
    pub const fn minutes(self) -> u16 {
        self.0
    }

    /// Hour component (0-23).
    #[must_use]
    pub const fn hour(self) -> u16 {
        self.0 / 60
    }

    /// Minute component (0-59).
    #[must_use]
    pub const fn minute(self) -> u16 {
        self.0 % 60
    }

    /// Adds minutes, returning `None` if the result reaches midnight.
    #[must_use]
    pub fn checked_add_minutes(self, minutes: u16) -> Option<Self> {
        let total = u32::from(self.0) + u32::from(minutes);
        u16::try_from(total)
            .ok()
            .filter(|m| *m < MINUTES_PER_DAY)
            .map(Self)
    }

    /// Adds minutes, capping the result at 23:59.
    ///
    /// # Examples
    ///
    /// ```
    /// use tablebook::ClockTime;
    ///
    /// let late: ClockTime = "22:30".parse().unwrap();
    /// assert_eq!(late.saturating_add_minutes(120), ClockTime::LAST_MINUTE);
    /// ```
    #[must_use]
    pub fn saturating_add_minutes(self, minutes: u16) -> Self {
        self.checked_add_minutes(minutes)
            .unwrap_or(Self::LAST_MINUTE)
    }

    /// Subtracts minutes, flooring at 00:00.
    #[must_use]
    pub const fn saturating_sub_minutes(self, minutes: u16) -> Self {
        Self(self.0.saturating_sub(minutes))
    }

    /// Truncates a wall-clock time to minute precision.
    #[must_use]
    pub fn from_naive(time: NaiveTime) -> Self {
        // hour() < 24 and minute() < 60, so the sum always fits below 1440.
        #[allow(clippy::cast_possible_truncation)]
        Self((time.hour() * 60 + time.minute()) as u16)
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for ClockTime {
    type Err = InvalidTimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| InvalidTimeError {
            value: s.to_string(),
            reason: reason.to_string(),
        };

        let trimmed = s.trim();
        let (hh, mm) = trimmed
            .split_once(':')
            .ok_or_else(|| invalid("expected HH:mm"))?;
        if hh.len() != 2 || mm.len() != 2 {
            return Err(invalid("expected two-digit HH:mm"));
        }
        let hour: u8 = hh.parse().map_err(|_| invalid("hour is not a number"))?;
        let minute: u8 = mm.parse().map_err(|_| invalid("minute is not a number"))?;
        Self::from_hm(hour, minute).map_err(|e| invalid(&e.reason))
    }
}

impl TryFrom<String> for ClockTime {
    type Error = InvalidTimeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ClockTime> for String {
    fn from(value: ClockTime) -> Self {
        value.to_string()
    }
}

/// A calendar day on which a reservation takes place.
///
/// Displays and persists as `dd.mm.yyyy`. Parsing also accepts ISO
/// `yyyy-mm-dd`.
///
/// # Examples
///
/// ```
/// use tablebook::ServiceDate;
///
/// let a: ServiceDate = "2025-06-01".parse().unwrap();
/// let b: ServiceDate = "01.06.2025".parse().unwrap();
/// assert_eq!(a, b);
/// assert_eq!(a.to_string(), "01.06.2025");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ServiceDate(NaiveDate);

impl ServiceDate {
    /// Storage and display format.
    pub const FORMAT: &'static str = "%d.%m.%Y";

    /// Wraps a calendar date.
    #[must_use]
    pub const fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Today's date in local time.
    #[must_use]
    pub fn today() -> Self {
        Self(Local::now().date_naive())
    }

    /// The underlying calendar date.
    #[must_use]
    pub const fn as_naive(self) -> NaiveDate {
        self.0
    }
}

impl From<NaiveDate> for ServiceDate {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl fmt::Display for ServiceDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(Self::FORMAT))
    }
}

impl FromStr for ServiceDate {
    type Err = InvalidTimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        NaiveDate::parse_from_str(trimmed, Self::FORMAT)
            .or_else(|_| NaiveDate::parse_from_str(trimmed, "%Y-%m-%d"))
            .map(Self)
            .map_err(|_| InvalidTimeError {
                value: s.to_string(),
                reason: "expected dd.mm.yyyy or yyyy-mm-dd".into(),
            })
    }
}

impl TryFrom<String> for ServiceDate {
    type Error = InvalidTimeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ServiceDate> for String {
    fn from(value: ServiceDate) -> Self {
        value.to_string()
    }
}

/// A half-open interval `[start, end)` within a single day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeRange {
    start: ClockTime,
    end: ClockTime,
}

impl TimeRange {
    /// Creates a range, requiring `end > start`.
    ///
    /// # Errors
    ///
    /// Returns an error if the range is empty or inverted.
    pub fn new(start: ClockTime, end: ClockTime) -> Result<Self, InvalidTimeError> {
        if end <= start {
            return Err(InvalidTimeError {
                value: format!("{start}-{end}"),
                reason: "end time must be after start time".into(),
            });
        }
        Ok(Self { start, end })
    }

    /// Inclusive start.
    #[must_use]
    pub const fn start(&self) -> ClockTime {
        self.start
    }

    /// Exclusive end.
    #[must_use]
    pub const fn end(&self) -> ClockTime {
        self.end
    }

    /// Length of the range in minutes.
    #[must_use]
    pub const fn len_minutes(&self) -> u16 {
        self.end.minutes() - self.start.minutes()
    }

    /// Whether two half-open ranges share at least one minute.
    ///
    /// `[a, b)` and `[c, d)` overlap iff `a < d && c < b`; ranges that only
    /// touch at an endpoint do not overlap.
    ///
    /// # Examples
    ///
    /// ```
    /// use tablebook::{ClockTime, TimeRange};
    ///
    /// let t = |s: &str| s.parse::<ClockTime>().unwrap();
    /// let evening = TimeRange::new(t("18:00"), t("20:00")).unwrap();
    /// let later = TimeRange::new(t("20:00"), t("22:00")).unwrap();
    /// let mid = TimeRange::new(t("19:00"), t("21:00")).unwrap();
    ///
    /// assert!(!evening.overlaps(&later));
    /// assert!(evening.overlaps(&mid));
    /// ```
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Whether an instant lies in the closed range `[start, end]`.
    #[must_use]
    pub fn covers_instant(&self, instant: ClockTime) -> bool {
        self.start <= instant && instant <= self.end
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// Error returned when a date or time value cannot be parsed or built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidTimeError {
    /// The rejected input.
    pub value: String,
    /// Why it was rejected.
    pub reason: String,
}

impl fmt::Display for InvalidTimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid time value '{}': {}", self.value, self.reason)
    }
}

impl std::error::Error for InvalidTimeError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str) -> ClockTime {
        s.parse().unwrap()
    }

    #[test]
    fn test_parse_clock_time() {
        assert_eq!(t("00:00"), ClockTime::MIDNIGHT);
        assert_eq!(t("23:59"), ClockTime::LAST_MINUTE);
        assert_eq!(t("10:15").minutes(), 615);
    }

    #[test]
    fn test_parse_clock_time_rejects_malformed() {
        assert!("24:00".parse::<ClockTime>().is_err());
        assert!("12:60".parse::<ClockTime>().is_err());
        assert!("9:00".parse::<ClockTime>().is_err());
        assert!("0900".parse::<ClockTime>().is_err());
        assert!("ab:cd".parse::<ClockTime>().is_err());
        assert!("".parse::<ClockTime>().is_err());
    }

    #[test]
    fn test_clock_time_display_zero_pads() {
        assert_eq!(ClockTime::from_hm(9, 5).unwrap().to_string(), "09:05");
    }

    #[test]
    fn test_clamped() {
        assert_eq!(ClockTime::clamped(600), t("10:00"));
        assert_eq!(ClockTime::clamped(5000), ClockTime::LAST_MINUTE);
    }

    #[test]
    fn test_checked_add_minutes() {
        assert_eq!(t("10:00").checked_add_minutes(120), Some(t("12:00")));
        assert_eq!(t("22:00").checked_add_minutes(120), None);
        assert_eq!(t("21:59").checked_add_minutes(120), Some(t("23:59")));
    }

    #[test]
    fn test_saturating_add_caps_at_last_minute() {
        assert_eq!(t("22:00").saturating_add_minutes(120), t("23:59"));
        assert_eq!(t("23:30").saturating_add_minutes(u16::MAX), t("23:59"));
    }

    #[test]
    fn test_saturating_sub_floors_at_midnight() {
        assert_eq!(t("01:00").saturating_sub_minutes(120), ClockTime::MIDNIGHT);
        assert_eq!(t("18:00").saturating_sub_minutes(120), t("16:00"));
    }

    #[test]
    fn test_from_naive_truncates_seconds() {
        let time = NaiveTime::from_hms_opt(18, 45, 59).unwrap();
        assert_eq!(ClockTime::from_naive(time), t("18:45"));
    }

    #[test]
    fn test_service_date_formats() {
        let date: ServiceDate = "2025-06-01".parse().unwrap();
        assert_eq!(date.to_string(), "01.06.2025");
        let same: ServiceDate = "01.06.2025".parse().unwrap();
        assert_eq!(date, same);
        assert!("2025/06/01".parse::<ServiceDate>().is_err());
        assert!("31.02.2025".parse::<ServiceDate>().is_err());
    }

    #[test]
    fn test_time_range_requires_positive_length() {
        assert!(TimeRange::new(t("18:00"), t("18:00")).is_err());
        assert!(TimeRange::new(t("18:00"), t("17:00")).is_err());
        assert_eq!(
            TimeRange::new(t("18:00"), t("20:00")).unwrap().len_minutes(),
            120
        );
    }

    #[test]
    fn test_overlap_is_symmetric_and_half_open() {
        let a = TimeRange::new(t("18:00"), t("20:00")).unwrap();
        let b = TimeRange::new(t("19:59"), t("21:00")).unwrap();
        let c = TimeRange::new(t("16:00"), t("18:00")).unwrap();
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        assert!(!a.overlaps(&c));
        assert!(!c.overlaps(&a));
    }

    #[test]
    fn test_covers_instant_is_closed() {
        let a = TimeRange::new(t("18:00"), t("20:00")).unwrap();
        assert!(a.covers_instant(t("18:00")));
        assert!(a.covers_instant(t("20:00")));
        assert!(!a.covers_instant(t("20:01")));
        assert!(!a.covers_instant(t("17:59")));
    }

    #[test]
    fn test_serde_as_strings() {
        let json = serde_json::to_string(&t("07:30")).unwrap();
        assert_eq!(json, "\"07:30\"");
        let date: ServiceDate = serde_json::from_str("\"2025-06-01\"").unwrap();
        assert_eq!(serde_json::to_string(&date).unwrap(), "\"01.06.2025\"");
    }
}
