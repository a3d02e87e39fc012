//! Shared test utilities for database unit tests.

use tempfile::tempdir;

use crate::clock::{ServiceDate, TimeRange};
use crate::database::{Database, DatabaseConfig};
use crate::reservation::{CustomerContact, NewReservation};
use crate::table::{RestaurantId, Table, TableId};

/// Creates a temporary test database that will be cleaned up automatically.
///
/// # Panics
///
/// Panics if the temporary directory or database cannot be created.
#[must_use]
pub fn create_test_database() -> Database {
    let dir = tempdir().unwrap();
    let path = dir.path().join("test.db");
    let db = Database::open(DatabaseConfig::new(path)).unwrap();

    // Prevent the TempDir from being dropped immediately
    std::mem::forget(dir);

    db
}

/// Creates a restaurant with tables of the given `(number, capacity)`.
///
/// # Panics
///
/// Panics if any insert fails.
pub fn seed_restaurant(db: &mut Database, tables: &[(u32, u32)]) -> (RestaurantId, Vec<Table>) {
    let restaurant = db.create_restaurant("Test Bistro").unwrap();
    let tables = tables
        .iter()
        .map(|&(number, capacity)| db.add_table(restaurant.id, number, capacity).unwrap())
        .collect();
    (restaurant.id, tables)
}

/// Parses a `dd.mm.yyyy` date.
///
/// # Panics
///
/// Panics on malformed input.
#[must_use]
pub fn date(s: &str) -> ServiceDate {
    s.parse().unwrap()
}

/// Builds a valid booking for `table_id` over `start`-`end`.
///
/// # Panics
///
/// Panics on malformed times.
#[must_use]
pub fn booking(table_id: TableId, on: &str, start: &str, end: &str) -> NewReservation {
    let range = TimeRange::new(start.parse().unwrap(), end.parse().unwrap()).unwrap();
    let contact = CustomerContact::new(
        "Ivan",
        "Petrenko",
        "380671112233",
        Some("ivan@example.com".into()),
    );
    NewReservation::builder(table_id, date(on), range, 2, contact)
        .build()
        .unwrap()
}
