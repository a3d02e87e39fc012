#![deny(missing_docs, unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! # tablebook
//!
//! A restaurant table booking engine.
//!
//! Guests ask for the start times at which a party can be seated, then book
//! one of them; the engine picks the best-fitting table and writes the
//! reservation so that no two active reservations on a table overlap, even
//! with several writers racing. A reconciliation sweep keeps each table's
//! cached status in line with its reservations.
//!
//! ## Core Types
//!
//! - [`ClockTime`], [`ServiceDate`] and [`TimeRange`]: minute-precision times
//!   of day, service dates and half-open intervals
//! - [`Table`] and [`Reservation`]: the inventory and the bookings on it
//! - [`BookingPolicy`]: service window, slot grid and capacity band rules
//! - [`Database`]: the `SQLite` store
//! - [`Error`] and [`Result`]: error handling types
//! - [`Logger`] and [`LogLevel`]: logging infrastructure
//!
//! ## Examples
//!
//! ```
//! use tablebook::booking::compute_slots;
//! use tablebook::{BookingPolicy, Table, TableStatus};
//!
//! let tables = vec![Table { id: 1, restaurant_id: 1, number: 1, capacity: 4, status: TableStatus::Free }];
//! let slots = compute_slots(&BookingPolicy::default(), &tables, &[], 4);
//!
//! // 10:00 through 22:00 every 15 minutes
//! assert_eq!(slots.len(), 49);
//! assert_eq!(slots[0].to_string(), "10:00");
//! ```

pub mod booking;
pub mod clock;
pub mod config;
pub mod database;
pub mod error;
pub mod logging;
pub mod operations;
pub mod reservation;
pub mod table;

// Re-export key types at crate root for convenience
pub use booking::BookingPolicy;
pub use clock::{ClockTime, ServiceDate, TimeRange};
pub use config::{Config, ConfigBuilder};
pub use database::{Database, DatabaseConfig, ReservationFilter};
pub use error::{Error, Result};
pub use logging::{init_logger, LogLevel, Logger};
pub use operations::{
    assign_and_book, assign_table, compute_slots, BookingPlan, BookingRequest, ExecutionResult,
    OperationPlan, PlanAction, PlanExecutor, ReconcileJob, ReconcileOperations, ReconcileOptions,
    ReconcileResult,
};
pub use reservation::{
    BookedInterval, CreatedBy, CustomerContact, NewReservation, Reservation, ReservationId,
    ReservationStatus,
};
pub use table::{Restaurant, RestaurantId, Table, TableId, TableStatus};
