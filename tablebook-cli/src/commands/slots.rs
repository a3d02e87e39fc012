//! Slots command implementation.
//!
//! Prints every start time at which a party can be seated, one per line.

use crate::error::CliError;
use crate::utils::{booking_policy, load_configuration, open_database, parse_date, GlobalOptions};
use clap::Args;
use std::io::Write;
use tablebook::{compute_slots, RestaurantId};

/// List bookable start times for a party.
#[derive(Args)]
pub struct SlotsCommand {
    /// Restaurant id
    #[arg(long, value_name = "ID")]
    pub restaurant: RestaurantId,

    /// Service date (dd.mm.yyyy or yyyy-mm-dd)
    #[arg(long)]
    pub date: String,

    /// Number of guests
    #[arg(long)]
    pub party: u32,

    /// Print the slots as a JSON array
    #[arg(long)]
    pub json: bool,
}

impl SlotsCommand {
    /// Execute the slots command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let date = parse_date(&self.date)?;
        let config = load_configuration(global)?;
        let policy = booking_policy(&config)?;
        let db = open_database(global, &config)?;

        let slots = compute_slots(&db, &policy, self.restaurant, date, self.party)?;

        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        if self.json {
            serde_json::to_writer(&mut handle, &slots)?;
            writeln!(handle)?;
        } else {
            for slot in &slots {
                writeln!(handle, "{slot}")?;
            }
        }

        if slots.is_empty() && !global.quiet {
            eprintln!("No free slots for {} guest(s) on {date}", self.party);
        }
        Ok(())
    }
}
