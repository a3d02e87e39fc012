//! Book command implementation.
//!
//! Picks the best-fitting free table for the requested start time and
//! writes the reservation, retrying on other tables if a concurrent writer
//! takes the first choice. Prints the new reservation id on stdout.

use crate::error::CliError;
use crate::utils::{
    booking_policy, load_configuration, local_now, open_database, parse_date, parse_time,
    print_warnings, GlobalOptions,
};
use clap::Args;
use tablebook::{
    BookingPlan, BookingRequest, CreatedBy, CustomerContact, PlanExecutor, RestaurantId,
};

/// Book a table.
#[derive(Args)]
pub struct BookCommand {
    /// Restaurant id
    #[arg(long, value_name = "ID")]
    pub restaurant: RestaurantId,

    /// Service date (dd.mm.yyyy or yyyy-mm-dd)
    #[arg(long)]
    pub date: String,

    /// Start time (HH:mm)
    #[arg(long)]
    pub time: String,

    /// Number of guests
    #[arg(long)]
    pub party: u32,

    /// Guest first name
    #[arg(long)]
    pub name: String,

    /// Guest last name
    #[arg(long)]
    pub surname: String,

    /// Guest phone (380 followed by 9 digits)
    #[arg(long)]
    pub phone: String,

    /// Guest email
    #[arg(long)]
    pub email: Option<String>,

    /// Record the booking as made by staff
    #[arg(long)]
    pub admin: bool,

    /// Account the booking belongs to
    #[arg(long, value_name = "ID")]
    pub user_id: Option<i64>,

    /// Show the table that would be assigned without booking
    #[arg(long)]
    pub dry_run: bool,
}

impl BookCommand {
    /// Execute the book command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let date = parse_date(&self.date)?;
        let start = parse_time(&self.time)?;

        let config = load_configuration(global)?;
        let policy = booking_policy(&config)?;
        let mut db = open_database(global, &config)?;

        let created_by = if self.admin {
            CreatedBy::Admin
        } else {
            CreatedBy::User
        };
        let contact = CustomerContact::new(self.name, self.surname, self.phone, self.email);
        let request = BookingRequest::new(self.restaurant, date, start, self.party, contact)
            .with_created_by(created_by)
            .with_user_id(self.user_id);

        let plan = BookingPlan::new(request, &policy, local_now()).build_plan(&db)?;
        print_warnings(global, &plan.warnings);

        let mut executor = PlanExecutor::new(&mut db);
        if self.dry_run {
            executor = executor.dry_run();
        }
        let result = executor.execute(&plan)?;

        if self.dry_run {
            if let Some(table) = result.table {
                println!("{}", table.id);
                if !global.quiet {
                    eprintln!("Dry run - would book {table}");
                }
            }
            return Ok(());
        }

        let reservation = result.reservation.ok_or_else(|| {
            CliError::SemanticFailure("booking finished without a reservation".to_string())
        })?;
        println!("{}", reservation.id());

        if !global.quiet {
            let table = result
                .table
                .map_or_else(|| format!("table id {}", reservation.table_id()), |t| t.to_string());
            eprintln!(
                "Booked {table} on {} {} for {} guest(s)",
                reservation.date(),
                reservation.time(),
                reservation.people_count()
            );
            if result.attempts > 1 {
                eprintln!("  (after {} attempts)", result.attempts);
            }
        }

        Ok(())
    }
}
