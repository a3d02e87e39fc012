//! Persistent storage for restaurants, tables and reservations.
//!
//! A single `SQLite` file holds the whole booking state. Each writer opens
//! its own [`Database`]; overlapping bookings on one table are prevented by
//! the atomic check-and-insert in [`Database::try_create_reservation_atomic`].
//!
//! # Examples
//!
//! ```no_run
//! use tablebook::database::{Database, DatabaseConfig, ReservationFilter};
//!
//! let mut db = Database::open(DatabaseConfig::new("/tmp/tablebook.db")).unwrap();
//! let restaurant = db.create_restaurant("Bistro").unwrap();
//! db.add_table(restaurant.id, 1, 4).unwrap();
//!
//! let filter = ReservationFilter::default().with_restaurant(restaurant.id);
//! for reservation in db.list_reservations(&filter).unwrap() {
//!     println!("{reservation:?}");
//! }
//! ```

mod config;
mod connection;
mod inventory;
pub mod migrations;
mod operations;
mod schema;
mod transaction;

#[cfg(test)]
pub(crate) mod test_util;

// Re-export public API
pub use config::{
    default_data_dir, resolve_database_path, DatabaseConfig, DATABASE_FILE_NAME, DATA_DIR_ENV,
};
pub use connection::Database;
pub use operations::ReservationFilter;

// Re-export migration functions for advanced use cases
pub use migrations::{check_schema_compatibility, get_schema_version, initialize_schema};
