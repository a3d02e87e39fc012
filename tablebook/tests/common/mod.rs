//! Common test utilities for integration tests.
//!
//! Fixture helpers for building a store with a seeded restaurant and
//! booking requests against it.

pub mod database;

use chrono::{NaiveDate, NaiveDateTime};
use tablebook::{BookingRequest, ClockTime, CustomerContact, RestaurantId, ServiceDate};

/// The service date most scenarios book against.
pub const SERVICE_DAY: &str = "01.06.2025";

/// Parses a `dd.mm.yyyy` (or ISO) date.
#[allow(dead_code)]
pub fn date(s: &str) -> ServiceDate {
    s.parse().unwrap()
}

/// Parses an `HH:mm` time.
#[allow(dead_code)]
pub fn time(s: &str) -> ClockTime {
    s.parse().unwrap()
}

/// Wall-clock instant on 1 June 2025.
#[allow(dead_code)]
pub fn on_service_day(hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 6, 1)
        .unwrap()
        .and_hms_opt(hour, minute, 0)
        .unwrap()
}

/// An instant well before any service day used in the tests.
#[allow(dead_code)]
pub fn morning_before() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 5, 1)
        .unwrap()
        .and_hms_opt(9, 0, 0)
        .unwrap()
}

/// Valid contact details; `tag` keeps concurrent guests apart by email.
#[allow(dead_code)]
pub fn guest(tag: &str) -> CustomerContact {
    CustomerContact::new(
        "Olena",
        "Shevchenko",
        "380501234567",
        Some(format!("{tag}@example.com")),
    )
}

/// Builder for booking requests with sensible defaults.
///
/// Defaults: the seeded restaurant, [`SERVICE_DAY`], 18:00, party of 2.
#[allow(dead_code)]
pub struct RequestFixture {
    restaurant_id: RestaurantId,
    date: ServiceDate,
    start: ClockTime,
    party_size: u32,
    guest: String,
}

#[allow(dead_code)]
impl RequestFixture {
    pub fn new(restaurant_id: RestaurantId) -> Self {
        Self {
            restaurant_id,
            date: date(SERVICE_DAY),
            start: time("18:00"),
            party_size: 2,
            guest: "guest".into(),
        }
    }

    pub fn at(mut self, start: &str) -> Self {
        self.start = time(start);
        self
    }

    pub fn on(mut self, day: &str) -> Self {
        self.date = date(day);
        self
    }

    pub fn party(mut self, size: u32) -> Self {
        self.party_size = size;
        self
    }

    pub fn guest(mut self, tag: &str) -> Self {
        self.guest = tag.into();
        self
    }

    pub fn build(self) -> BookingRequest {
        BookingRequest::new(
            self.restaurant_id,
            self.date,
            self.start,
            self.party_size,
            guest(&self.guest),
        )
    }
}
