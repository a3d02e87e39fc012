//! Booking operations using the plan-execute pattern.
//!
//! Operations that write are split into two phases:
//! 1. **Planning**: validates the request and reads the store, building a plan
//! 2. **Execution**: performs the plan's writes, or only reports them in
//!    dry-run mode
//!
//! Reconciliation is a read-compute-write sweep and lives in [`reconcile`].
//!
//! # Examples
//!
//! ```no_run
//! use tablebook::database::{Database, DatabaseConfig};
//! use tablebook::operations::{compute_slots, BookingPlan, BookingRequest, PlanExecutor};
//! use tablebook::{BookingPolicy, CustomerContact};
//!
//! let mut db = Database::open(DatabaseConfig::new("/tmp/tablebook.db")).unwrap();
//! let policy = BookingPolicy::default();
//! let date = "01.06.2025".parse().unwrap();
//!
//! let slots = compute_slots(&db, &policy, 1, date, 4).unwrap();
//! if let Some(&start) = slots.first() {
//!     let contact = CustomerContact::new("Ivan", "Petrenko", "380671112233", None);
//!     let request = BookingRequest::new(1, date, start, 4, contact);
//!     let now = chrono::Local::now().naive_local();
//!
//!     let plan = BookingPlan::new(request, &policy, now).build_plan(&db).unwrap();
//!     let result = PlanExecutor::new(&mut db).execute(&plan).unwrap();
//!     println!("booked {:?}", result.table);
//! }
//! ```

pub mod book;
pub mod executor;
pub mod init;
pub mod plan;
pub mod reconcile;
pub mod status;

// Store-backed and slow: `cargo test --features property-tests`.
#[cfg(all(test, feature = "property-tests"))]
mod proptests;

pub use book::{assign_and_book, assign_table, compute_slots, BookingPlan};
pub use executor::{ExecutionResult, PlanExecutor};
pub use init::{init_database, InitOptions, InitResult};
pub use plan::{BookingRequest, OperationPlan, PlanAction};
pub use reconcile::{
    ReconcileJob, ReconcileOperations, ReconcileOptions, ReconcileResult, StatusChange,
};
pub use status::{
    cancel_reservation, complete_reservation, plan_free_all_tables, plan_set_table_status,
    ReservationStatusPlan,
};
