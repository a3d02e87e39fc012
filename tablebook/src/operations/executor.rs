//! Plan execution engine.
//!
//! The executor is the only place where a booking plan meets the store. The
//! table chosen at planning time may be gone by the time the insert runs, so
//! `AssignTable` re-reads the store after every lost race and moves to the
//! next best table.

use std::collections::HashSet;

use chrono::NaiveDateTime;

use crate::booking::{select_table, BookingPolicy};
use crate::clock::TimeRange;
use crate::database::Database;
use crate::error::{Error, Result};
use crate::reservation::{NewReservation, Reservation};
use crate::table::{Table, TableId};

use super::plan::{BookingRequest, OperationPlan, PlanAction};
use super::reconcile::ReconcileOperations;

/// Result of executing a plan.
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    /// Whether the execution was successful.
    pub success: bool,

    /// Whether this was a dry-run (no actual changes made).
    pub dry_run: bool,

    /// Descriptions of actions that were taken (or would be taken in dry-run).
    pub actions_taken: Vec<String>,

    /// Warnings from the plan.
    pub warnings: Vec<String>,

    /// The reservation that was created or changed, if any.
    pub reservation: Option<Reservation>,

    /// The table the reservation landed on (the planned table in dry-run).
    pub table: Option<Table>,

    /// Number of insert attempts a booking took.
    pub attempts: usize,

    /// Number of store rows changed by status actions.
    pub rows_changed: usize,
}

impl ExecutionResult {
    fn new(plan: &OperationPlan, dry_run: bool) -> Self {
        Self {
            success: true,
            dry_run,
            actions_taken: plan.actions.iter().map(PlanAction::description).collect(),
            warnings: plan.warnings.clone(),
            reservation: None,
            table: None,
            attempts: 0,
            rows_changed: 0,
        }
    }
}

/// Executes operation plans against the database.
///
/// # Examples
///
/// ```no_run
/// use tablebook::database::{Database, DatabaseConfig};
/// use tablebook::operations::{BookingPlan, BookingRequest, PlanExecutor};
/// use tablebook::{BookingPolicy, CustomerContact};
///
/// let mut db = Database::open(DatabaseConfig::new("/tmp/tablebook.db")).unwrap();
/// let contact = CustomerContact::new("Ivan", "Petrenko", "380671112233", None);
/// let request = BookingRequest::new(1, "01.06.2025".parse().unwrap(), "18:00".parse().unwrap(), 4, contact);
/// let now = chrono::Local::now().naive_local();
///
/// let policy = BookingPolicy::default();
/// let plan = BookingPlan::new(request, &policy, now).build_plan(&db).unwrap();
///
/// // Dry-run first, then for real
/// let preview = PlanExecutor::new(&mut db).dry_run().execute(&plan).unwrap();
/// assert!(preview.dry_run);
/// let result = PlanExecutor::new(&mut db).execute(&plan).unwrap();
/// println!("booked {:?}", result.table);
/// ```
pub struct PlanExecutor<'a> {
    db: &'a mut Database,
    dry_run: bool,
}

impl<'a> PlanExecutor<'a> {
    /// Creates a new plan executor.
    #[must_use]
    pub fn new(db: &'a mut Database) -> Self {
        Self { db, dry_run: false }
    }

    /// Sets the executor to dry-run mode.
    ///
    /// In dry-run mode, the executor reports the plan but does not modify
    /// the database.
    #[must_use]
    pub const fn dry_run(mut self) -> Self {
        self.dry_run = true;
        self
    }

    /// Executes the given plan.
    ///
    /// # Errors
    ///
    /// Returns the first error of any action. A booking that loses every
    /// race fails with `ReservationConflict`; one whose candidates vanish
    /// without a race fails with `NoTableAvailable`.
    pub fn execute(&mut self, plan: &OperationPlan) -> Result<ExecutionResult> {
        let mut result = ExecutionResult::new(plan, self.dry_run);

        if self.dry_run {
            for action in &plan.actions {
                if let PlanAction::AssignTable { first_choice, .. } = action {
                    result.table = Some(first_choice.clone());
                }
            }
            return Ok(result);
        }

        for action in &plan.actions {
            self.execute_action(action, &mut result)?;
        }
        Ok(result)
    }

    fn execute_action(&mut self, action: &PlanAction, result: &mut ExecutionResult) -> Result<()> {
        match action {
            PlanAction::AssignTable {
                request,
                window,
                first_choice,
                policy,
                now,
            } => {
                let (reservation, table, attempts) =
                    self.assign(request, window, first_choice, policy, *now)?;
                result.reservation = Some(reservation);
                result.table = Some(table);
                result.attempts = attempts;
            }
            PlanAction::SetReservationStatus {
                reservation_id,
                status,
            } => {
                let updated = self.db.update_reservation_status(*reservation_id, *status)?;
                result.rows_changed += 1;
                result.reservation = Some(updated);
            }
            PlanAction::SyncTableStatus { table_id, now } => {
                if ReconcileOperations::sync_table(self.db, *table_id, *now)?.is_some() {
                    result.rows_changed += 1;
                }
            }
            PlanAction::SetTableStatus { table_id, status } => {
                if !self.db.set_table_status(*table_id, *status)? {
                    return Err(Error::NotFound {
                        resource: format!("table {table_id}"),
                    });
                }
                result.rows_changed += 1;
            }
            PlanAction::FreeAllTables(restaurant_id) => {
                result.rows_changed += self.db.free_all_tables(*restaurant_id)?;
            }
            PlanAction::CompleteReservations(ids) => {
                result.rows_changed += self.db.complete_reservations(ids)?;
            }
        }
        Ok(())
    }

    /// Inserts the booking, retrying on the next best table after a lost
    /// race until candidates or attempts run out.
    fn assign(
        &mut self,
        request: &BookingRequest,
        window: &TimeRange,
        first_choice: &Table,
        policy: &BookingPolicy,
        now: NaiveDateTime,
    ) -> Result<(Reservation, Table, usize)> {
        let mut tried: HashSet<TableId> = HashSet::new();
        let mut candidate = Some(first_choice.clone());
        let mut attempts = 0;
        let mut lost_race = false;

        while let Some(table) = candidate.take() {
            if attempts >= policy.max_assignment_attempts {
                break;
            }
            attempts += 1;

            let booking = NewReservation::builder(
                table.id,
                request.date,
                *window,
                request.party_size,
                request.contact.clone(),
            )
            .created_by(request.created_by)
            .user_id(request.user_id)
            .build()?;

            match self.db.try_create_reservation_atomic(&booking) {
                Ok(Some(reservation)) => {
                    if let Err(e) = ReconcileOperations::sync_table(self.db, table.id, now) {
                        log::warn!("booked, but could not refresh status of {table}: {e}");
                    }
                    return Ok((reservation, table, attempts));
                }
                Ok(None) => {
                    log::warn!("{table} was taken by a concurrent booking, trying the next one");
                    lost_race = true;
                }
                Err(e) if e.is_not_found() => {
                    log::warn!("{table} was removed during booking, trying the next one");
                }
                Err(e) => return Err(e),
            }

            tried.insert(table.id);
            let tables = self.db.list_tables(request.restaurant_id)?;
            let ids: Vec<TableId> = tables.iter().map(|t| t.id).collect();
            let booked = self.db.list_active_reservations(&ids, request.date)?;
            candidate = select_table(
                policy,
                &tables,
                &booked,
                request.party_size,
                window,
                &tried,
            )
            .cloned();
        }

        if lost_race {
            Err(Error::ReservationConflict {
                details: format!(
                    "every table for {} guest(s) on {} within {window} was taken by concurrent \
                     bookings ({attempts} attempt(s))",
                    request.party_size, request.date
                ),
            })
        } else {
            Err(Error::NoTableAvailable {
                party_size: request.party_size,
                date: request.date.to_string(),
                time: request.start.to_string(),
            })
        }
    }
}
