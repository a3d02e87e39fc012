//! Cancel and complete command implementations.
//!
//! Both move an active reservation to a terminal state and re-sync the
//! reservation's table for the current time. Repeating the same change is
//! a no-op; changing a terminal reservation fails with exit code 1.

use crate::error::CliError;
use crate::utils::{load_configuration, local_now, open_database, print_warnings, GlobalOptions};
use clap::Args;
use tablebook::operations::ReservationStatusPlan;
use tablebook::{PlanExecutor, ReservationId, ReservationStatus};

/// Cancel a reservation.
#[derive(Args)]
pub struct CancelCommand {
    /// Reservation id
    pub reservation_id: ReservationId,

    /// Show what would change without writing
    #[arg(long)]
    pub dry_run: bool,
}

/// Mark a reservation completed.
#[derive(Args)]
pub struct CompleteCommand {
    /// Reservation id
    pub reservation_id: ReservationId,

    /// Show what would change without writing
    #[arg(long)]
    pub dry_run: bool,
}

impl CancelCommand {
    /// Execute the cancel command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        transition(
            global,
            self.reservation_id,
            ReservationStatus::Cancelled,
            self.dry_run,
        )
    }
}

impl CompleteCommand {
    /// Execute the complete command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        transition(
            global,
            self.reservation_id,
            ReservationStatus::Completed,
            self.dry_run,
        )
    }
}

fn transition(
    global: &GlobalOptions,
    id: ReservationId,
    status: ReservationStatus,
    dry_run: bool,
) -> Result<(), CliError> {
    let config = load_configuration(global)?;
    let mut db = open_database(global, &config)?;

    let plan = ReservationStatusPlan::new(id, status, local_now()).build_plan(&db)?;
    print_warnings(global, &plan.warnings);

    if dry_run {
        if !global.quiet {
            eprintln!("Dry run - would perform the following actions:");
            for (i, action) in plan.actions.iter().enumerate() {
                eprintln!("  {}. {}", i + 1, action.description());
            }
        }
        return Ok(());
    }

    PlanExecutor::new(&mut db).execute(&plan)?;

    if !global.quiet && !plan.is_empty() {
        eprintln!("Reservation {id} {status}");
    }
    Ok(())
}
