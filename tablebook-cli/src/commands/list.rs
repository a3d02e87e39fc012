//! List command implementation.
//!
//! This module implements the `list` command, which displays reservations
//! in various formats (table, JSON, CSV, TSV).

use crate::error::CliError;
use crate::utils::{
    load_configuration, open_database, parse_date, write_delimited, GlobalOptions, OutputFormat,
};
use clap::Args;
use std::io::Write;
use tablebook::{Reservation, ReservationFilter, ReservationStatus, RestaurantId};

/// Column headers for CSV/TSV output.
const COLUMN_HEADERS: [&str; 12] = [
    "id",
    "table_id",
    "date",
    "start",
    "end",
    "people",
    "status",
    "name",
    "surname",
    "phone",
    "email",
    "created_by",
];

/// List reservations.
#[derive(Args)]
pub struct ListCommand {
    /// Output format (defaults to the configured format)
    #[arg(long, value_enum, env = "TABLEBOOK_OUTPUT_FORMAT", ignore_case = true)]
    pub format: Option<OutputFormat>,

    /// Filter by restaurant id
    #[arg(long, value_name = "ID")]
    pub restaurant: Option<RestaurantId>,

    /// Filter by service date (dd.mm.yyyy or yyyy-mm-dd)
    #[arg(long)]
    pub date: Option<String>,

    /// Filter by status: active, cancelled or completed
    #[arg(long)]
    pub status: Option<String>,

    /// Filter by guest email (case-insensitive)
    #[arg(long)]
    pub email: Option<String>,
}

impl ListCommand {
    /// Execute the list command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let mut filter = ReservationFilter::default();
        if let Some(id) = self.restaurant {
            filter = filter.with_restaurant(id);
        }
        if let Some(ref date) = self.date {
            filter = filter.with_date(parse_date(date)?);
        }
        if let Some(ref status) = self.status {
            let status: ReservationStatus = status
                .parse()
                .map_err(|e| CliError::InvalidArguments(format!("{e}")))?;
            filter = filter.with_status(status);
        }
        if let Some(email) = self.email {
            filter = filter.with_email(email);
        }

        let config = load_configuration(global)?;
        let db = open_database(global, &config)?;
        let reservations = db.list_reservations(&filter)?;

        match OutputFormat::resolve(self.format, &config) {
            OutputFormat::Table => format_as_table(&reservations),
            OutputFormat::Json => format_as_json(&reservations),
            OutputFormat::Csv => write_delimited(&COLUMN_HEADERS, rows(&reservations), b','),
            OutputFormat::Tsv => write_delimited(&COLUMN_HEADERS, rows(&reservations), b'\t'),
        }
    }
}

fn rows(reservations: &[Reservation]) -> impl Iterator<Item = Vec<String>> + '_ {
    reservations.iter().map(|r| {
        vec![
            r.id().to_string(),
            r.table_id().to_string(),
            r.date().to_string(),
            r.time().start().to_string(),
            r.time().end().to_string(),
            r.people_count().to_string(),
            r.status().to_string(),
            r.contact().name.clone(),
            r.contact().surname.clone(),
            r.contact().phone.clone(),
            r.contact().email.clone().unwrap_or_default(),
            r.created_by().to_string(),
        ]
    })
}

/// Format reservations as a human-readable table.
fn format_as_table(reservations: &[Reservation]) -> Result<(), CliError> {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();

    writeln!(handle, "ID\tTABLE\tDATE\tTIME\tPEOPLE\tSTATUS\tGUEST\tPHONE\tEMAIL")?;

    for r in reservations {
        writeln!(
            handle,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            r.id(),
            r.table_id(),
            r.date(),
            r.time(),
            r.people_count(),
            r.status(),
            r.contact().full_name(),
            r.contact().phone,
            r.contact().email.as_deref().unwrap_or("-"),
        )?;
    }

    Ok(())
}

/// Format reservations as JSON.
fn format_as_json(reservations: &[Reservation]) -> Result<(), CliError> {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();

    let json_data: Vec<serde_json::Value> = reservations
        .iter()
        .map(|r| {
            serde_json::json!({
                "id": r.id(),
                "table_id": r.table_id(),
                "date": r.date().to_string(),
                "start": r.time().start().to_string(),
                "end": r.time().end().to_string(),
                "people": r.people_count(),
                "status": r.status().to_string(),
                "name": r.contact().name,
                "surname": r.contact().surname,
                "phone": r.contact().phone,
                "email": r.contact().email,
                "created_by": r.created_by().to_string(),
                "user_id": r.user_id(),
            })
        })
        .collect();

    serde_json::to_writer_pretty(&mut handle, &json_data)?;
    writeln!(handle)?;

    Ok(())
}
