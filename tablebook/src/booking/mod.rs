//! Booking rules: slot availability and best-fit table assignment.
//!
//! Everything here works on values already read from the store. The
//! [`operations`](crate::operations) layer loads tables and active
//! reservations, calls into this module, and writes the outcome back.

mod availability;
mod policy;
mod selector;

pub use availability::{compute_slots, is_table_available_at, slot_blocked, tables_in_band};
pub use policy::{
    BookingPolicy, DEFAULT_DURATION_MINUTES, DEFAULT_EXTRA_SEATS, DEFAULT_LOOKBACK_MINUTES,
    DEFAULT_MAX_ASSIGNMENT_ATTEMPTS, DEFAULT_SERVICE_CLOSE, DEFAULT_SERVICE_OPEN,
    DEFAULT_SLOT_STEP_MINUTES,
};
pub use selector::{rank_candidates, select_table};

#[cfg(test)]
mod proptests;
