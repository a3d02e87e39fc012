//! Shared database test utilities.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tablebook::{Database, DatabaseConfig, RestaurantId, Table};

/// Creates a temporary test database that will be cleaned up when dropped.
///
/// The temporary directory is leaked for the lifetime of the test process.
#[allow(dead_code)]
pub fn create_test_database() -> Database {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("test.db");
    let db = Database::open(DatabaseConfig::new(path)).unwrap();

    // Prevent the TempDir from being dropped immediately
    std::mem::forget(dir);

    db
}

/// Opens (creating if needed) a store at `path` with a generous busy
/// timeout, for tests where several connections share one file.
#[allow(dead_code)]
pub fn open_shared(path: &Path) -> Database {
    Database::open(DatabaseConfig::new(path).with_busy_timeout(Duration::from_secs(10))).unwrap()
}

/// Path of a fresh store file inside `dir`.
#[allow(dead_code)]
pub fn store_path(dir: &tempfile::TempDir) -> PathBuf {
    dir.path().join("tablebook.db")
}

/// Creates a restaurant with tables of the given `(number, capacity)`.
#[allow(dead_code)]
pub fn seed_restaurant(db: &mut Database, tables: &[(u32, u32)]) -> (RestaurantId, Vec<Table>) {
    let restaurant = db.create_restaurant("Harbour Grill").unwrap();
    let tables = tables
        .iter()
        .map(|&(number, capacity)| db.add_table(restaurant.id, number, capacity).unwrap())
        .collect();
    (restaurant.id, tables)
}
