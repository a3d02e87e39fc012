//! Plan types for booking operations.
//!
//! A plan lists the writes an operation will make, so that it can be shown
//! to the user in dry-run mode before anything touches the store.

use chrono::NaiveDateTime;

use crate::booking::BookingPolicy;
use crate::clock::{ClockTime, ServiceDate, TimeRange};
use crate::reservation::{CreatedBy, CustomerContact, ReservationId, ReservationStatus};
use crate::table::{RestaurantId, Table, TableId, TableStatus};

/// Everything a guest supplies when booking a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingRequest {
    /// Restaurant to book in.
    pub restaurant_id: RestaurantId,
    /// Day of the visit.
    pub date: ServiceDate,
    /// Requested start; must be one of the service slots.
    pub start: ClockTime,
    /// Number of guests.
    pub party_size: u32,
    /// Guest contact details.
    pub contact: CustomerContact,
    /// Who made the booking.
    pub created_by: CreatedBy,
    /// Account that made the booking, if any.
    pub user_id: Option<i64>,
}

impl BookingRequest {
    /// Creates a request made by a guest without an account.
    #[must_use]
    pub const fn new(
        restaurant_id: RestaurantId,
        date: ServiceDate,
        start: ClockTime,
        party_size: u32,
        contact: CustomerContact,
    ) -> Self {
        Self {
            restaurant_id,
            date,
            start,
            party_size,
            contact,
            created_by: CreatedBy::User,
            user_id: None,
        }
    }

    /// Sets who made the booking.
    #[must_use]
    pub const fn with_created_by(mut self, created_by: CreatedBy) -> Self {
        self.created_by = created_by;
        self
    }

    /// Sets the booking account.
    #[must_use]
    pub const fn with_user_id(mut self, user_id: Option<i64>) -> Self {
        self.user_id = user_id;
        self
    }
}

/// A single action to be taken during plan execution.
#[derive(Debug, Clone, PartialEq)]
pub enum PlanAction {
    /// Insert a reservation on the best free table, moving to the next
    /// candidate when another writer takes the table first.
    AssignTable {
        /// The validated request.
        request: BookingRequest,
        /// The interval the reservation will occupy.
        window: TimeRange,
        /// The table chosen at planning time.
        first_choice: Table,
        /// Rules used to rank replacement tables.
        policy: BookingPolicy,
        /// Wall-clock time used to re-sync the table's status.
        now: NaiveDateTime,
    },

    /// Move a reservation to a new status.
    SetReservationStatus {
        /// The reservation to change.
        reservation_id: ReservationId,
        /// The target status.
        status: ReservationStatus,
    },

    /// Recompute one table's cached status from its reservations.
    SyncTableStatus {
        /// The table to re-sync.
        table_id: TableId,
        /// Wall-clock time the status is computed for.
        now: NaiveDateTime,
    },

    /// Overwrite one table's cached status.
    SetTableStatus {
        /// The table to change.
        table_id: TableId,
        /// The new status.
        status: TableStatus,
    },

    /// Reset every table of a restaurant to free.
    FreeAllTables(RestaurantId),

    /// Mark the listed active reservations completed.
    CompleteReservations(Vec<ReservationId>),
}

impl PlanAction {
    /// Returns a human-readable description of this action.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::AssignTable {
                request,
                window,
                first_choice,
                ..
            } => format!(
                "Book {} for {} guest(s) on {} at {}",
                first_choice, request.party_size, request.date, window
            ),
            Self::SetReservationStatus {
                reservation_id,
                status,
            } => format!("Mark reservation {reservation_id} {status}"),
            Self::SyncTableStatus { table_id, .. } => {
                format!("Re-sync status of table id {table_id}")
            }
            Self::SetTableStatus { table_id, status } => {
                format!("Set table id {table_id} to {status}")
            }
            Self::FreeAllTables(restaurant_id) => {
                format!("Free all tables of restaurant {restaurant_id}")
            }
            Self::CompleteReservations(ids) => {
                format!("Complete {} elapsed reservation(s)", ids.len())
            }
        }
    }
}

/// A complete operation plan describing all actions to be taken.
#[derive(Debug, Clone)]
pub struct OperationPlan {
    /// A human-readable description of the operation.
    pub description: String,

    /// The sequence of actions to perform.
    pub actions: Vec<PlanAction>,

    /// Warnings to communicate to the user.
    pub warnings: Vec<String>,
}

impl OperationPlan {
    /// Creates a new operation plan with the given description.
    ///
    /// # Examples
    ///
    /// ```
    /// use tablebook::operations::OperationPlan;
    ///
    /// let plan = OperationPlan::new("Cancel reservation 7");
    /// assert_eq!(plan.description, "Cancel reservation 7");
    /// assert!(plan.is_empty());
    /// ```
    #[must_use]
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            actions: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Adds an action to the plan.
    ///
    /// # Examples
    ///
    /// ```
    /// use tablebook::operations::{OperationPlan, PlanAction};
    ///
    /// let plan = OperationPlan::new("Reset").add_action(PlanAction::FreeAllTables(1));
    /// assert_eq!(plan.len(), 1);
    /// ```
    #[must_use]
    pub fn add_action(mut self, action: PlanAction) -> Self {
        self.actions.push(action);
        self
    }

    /// Adds a warning to the plan.
    #[must_use]
    pub fn add_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }

    /// Checks if the plan has no actions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Returns the number of actions in the plan.
    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }
}
