//! Today command implementation.
//!
//! Shows a restaurant's active reservations for one day grouped by table,
//! the floor view a host works from.

use crate::error::CliError;
use crate::utils::{date_or_today, load_configuration, open_database, GlobalOptions};
use clap::Args;
use std::collections::BTreeMap;
use std::io::Write;
use tablebook::{Reservation, ReservationFilter, ReservationStatus, RestaurantId, TableId};

/// Show the day's active reservations grouped by table.
#[derive(Args)]
pub struct TodayCommand {
    /// Restaurant id
    #[arg(long, value_name = "ID")]
    pub restaurant: RestaurantId,

    /// Day to show instead of today (dd.mm.yyyy or yyyy-mm-dd)
    #[arg(long)]
    pub date: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl TodayCommand {
    /// Execute the today command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let date = date_or_today(self.date.as_deref())?;
        let config = load_configuration(global)?;
        let db = open_database(global, &config)?;

        db.require_restaurant(self.restaurant)?;
        let tables = db.list_tables(self.restaurant)?;
        let reservations = db.list_reservations(
            &ReservationFilter::default()
                .with_restaurant(self.restaurant)
                .with_date(date)
                .with_status(ReservationStatus::Active),
        )?;

        let mut by_table: BTreeMap<TableId, Vec<&Reservation>> = BTreeMap::new();
        for r in &reservations {
            by_table.entry(r.table_id()).or_default().push(r);
        }

        let stdout = std::io::stdout();
        let mut handle = stdout.lock();

        if self.json {
            let json_data: Vec<serde_json::Value> = tables
                .iter()
                .map(|t| {
                    let bookings: Vec<serde_json::Value> = by_table
                        .get(&t.id)
                        .map(Vec::as_slice)
                        .unwrap_or_default()
                        .iter()
                        .map(|r| {
                            serde_json::json!({
                                "id": r.id(),
                                "start": r.time().start().to_string(),
                                "end": r.time().end().to_string(),
                                "people": r.people_count(),
                                "guest": r.contact().full_name(),
                                "phone": r.contact().phone,
                            })
                        })
                        .collect();
                    serde_json::json!({
                        "table_id": t.id,
                        "number": t.number,
                        "capacity": t.capacity,
                        "status": t.status.to_string(),
                        "reservations": bookings,
                    })
                })
                .collect();
            serde_json::to_writer_pretty(&mut handle, &json_data)?;
            writeln!(handle)?;
            return Ok(());
        }

        writeln!(handle, "{date}")?;
        for t in &tables {
            writeln!(handle, "Table {} ({} seats, {})", t.number, t.capacity, t.status)?;
            match by_table.get(&t.id) {
                Some(list) => {
                    for r in list {
                        writeln!(
                            handle,
                            "  {}\t#{}\t{} guest(s)\t{}\t{}",
                            r.time(),
                            r.id(),
                            r.people_count(),
                            r.contact().full_name(),
                            r.contact().phone
                        )?;
                    }
                }
                None => writeln!(handle, "  -")?,
            }
        }

        Ok(())
    }
}
