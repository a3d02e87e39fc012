//! Reservation and table status changes.

use chrono::NaiveDateTime;

use crate::database::Database;
use crate::error::{Error, Result};
use crate::reservation::{Reservation, ReservationId, ReservationStatus};
use crate::table::{RestaurantId, TableId, TableStatus};

use super::executor::PlanExecutor;
use super::plan::{OperationPlan, PlanAction};

/// Plans moving a reservation to `cancelled` or `completed`.
pub struct ReservationStatusPlan {
    reservation_id: ReservationId,
    status: ReservationStatus,
    now: NaiveDateTime,
}

impl ReservationStatusPlan {
    /// Creates a plan; `now` is used to re-sync the table afterwards.
    #[must_use]
    pub const fn new(
        reservation_id: ReservationId,
        status: ReservationStatus,
        now: NaiveDateTime,
    ) -> Self {
        Self {
            reservation_id,
            status,
            now,
        }
    }

    /// Checks the transition and builds the plan.
    ///
    /// Asking for the status a reservation already has yields an empty plan
    /// with a warning.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown reservation and a validation error
    /// for reopening a reservation or changing a terminal one.
    pub fn build_plan(&self, db: &Database) -> Result<OperationPlan> {
        if self.status == ReservationStatus::Active {
            return Err(Error::Validation {
                field: "status".into(),
                message: "a reservation cannot be reopened".into(),
            });
        }

        let current = db.require_reservation(self.reservation_id)?;
        let plan = OperationPlan::new(format!(
            "Mark reservation {} {}",
            self.reservation_id, self.status
        ));

        if current.status() == self.status {
            return Ok(plan.add_warning(format!(
                "reservation {} is already {}",
                self.reservation_id, self.status
            )));
        }
        if current.status().is_terminal() {
            return Err(Error::Validation {
                field: "status".into(),
                message: format!(
                    "reservation {} is {} and cannot become {}",
                    self.reservation_id,
                    current.status(),
                    self.status
                ),
            });
        }

        Ok(plan
            .add_action(PlanAction::SetReservationStatus {
                reservation_id: self.reservation_id,
                status: self.status,
            })
            .add_action(PlanAction::SyncTableStatus {
                table_id: current.table_id(),
                now: self.now,
            }))
    }
}

fn transition(
    db: &mut Database,
    id: ReservationId,
    status: ReservationStatus,
    now: NaiveDateTime,
) -> Result<Reservation> {
    let plan = ReservationStatusPlan::new(id, status, now).build_plan(db)?;
    let result = PlanExecutor::new(db).execute(&plan)?;
    match result.reservation {
        Some(reservation) => Ok(reservation),
        None => db.require_reservation(id),
    }
}

/// Cancels an active reservation and re-syncs its table.
///
/// # Errors
///
/// Returns `NotFound` for an unknown id and a validation error if the
/// reservation is already completed.
pub fn cancel_reservation(
    db: &mut Database,
    id: ReservationId,
    now: NaiveDateTime,
) -> Result<Reservation> {
    transition(db, id, ReservationStatus::Cancelled, now)
}

/// Completes an active reservation and re-syncs its table.
///
/// # Errors
///
/// Returns `NotFound` for an unknown id and a validation error if the
/// reservation is already cancelled.
pub fn complete_reservation(
    db: &mut Database,
    id: ReservationId,
    now: NaiveDateTime,
) -> Result<Reservation> {
    transition(db, id, ReservationStatus::Completed, now)
}

/// Plans a manual override of one table's cached status.
///
/// # Errors
///
/// Returns `NotFound` if the table does not exist.
pub fn plan_set_table_status(
    db: &Database,
    table_id: TableId,
    status: TableStatus,
) -> Result<OperationPlan> {
    let table = db.get_table(table_id)?.ok_or_else(|| Error::NotFound {
        resource: format!("table {table_id}"),
    })?;

    let plan = OperationPlan::new(format!("Set {table} to {status}"));
    if table.status == status {
        return Ok(plan.add_warning(format!("{table} is already {status}")));
    }
    Ok(plan.add_action(PlanAction::SetTableStatus { table_id, status }))
}

/// Plans resetting every table of a restaurant to free.
///
/// # Errors
///
/// Returns `NotFound` if the restaurant does not exist.
pub fn plan_free_all_tables(db: &Database, restaurant_id: RestaurantId) -> Result<OperationPlan> {
    let restaurant = db.require_restaurant(restaurant_id)?;
    Ok(
        OperationPlan::new(format!("Free all tables of {}", restaurant.name))
            .add_action(PlanAction::FreeAllTables(restaurant_id)),
    )
}
