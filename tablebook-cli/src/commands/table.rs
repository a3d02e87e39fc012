//! Table command implementation.
//!
//! Inventory management (`add`, `list`, `remove`) and manual overrides of
//! the cached table status (`set-status`, `free-all`).

use crate::error::CliError;
use crate::utils::{
    load_configuration, open_database, print_warnings, write_delimited, GlobalOptions,
    OutputFormat,
};
use clap::{Args, Subcommand};
use std::io::Write;
use tablebook::operations::{plan_free_all_tables, plan_set_table_status};
use tablebook::{Database, OperationPlan, PlanExecutor, RestaurantId, Table, TableId, TableStatus};

const COLUMN_HEADERS: [&str; 5] = ["id", "restaurant_id", "number", "capacity", "status"];

/// Manage dining tables.
#[derive(Args)]
pub struct TableCommand {
    #[command(subcommand)]
    pub action: TableAction,
}

/// Table subcommands.
#[derive(Subcommand)]
pub enum TableAction {
    /// Add a table to a restaurant and print its id
    Add {
        /// Restaurant id
        #[arg(long, value_name = "ID")]
        restaurant: RestaurantId,

        /// Table number shown in the dining room
        #[arg(long)]
        number: u32,

        /// Number of seats
        #[arg(long)]
        capacity: u32,
    },

    /// List the tables of a restaurant
    List {
        /// Restaurant id
        #[arg(long, value_name = "ID")]
        restaurant: RestaurantId,

        /// Output format (defaults to the configured format)
        #[arg(long, value_enum, env = "TABLEBOOK_OUTPUT_FORMAT", ignore_case = true)]
        format: Option<OutputFormat>,
    },

    /// Remove a table without active reservations
    Remove {
        /// Table id
        table_id: TableId,
    },

    /// Override a table's cached status
    SetStatus {
        /// Table id
        table_id: TableId,

        /// New status: free, reserved or occupied
        status: String,

        /// Show what would change without writing
        #[arg(long)]
        dry_run: bool,
    },

    /// Mark every table of a restaurant free
    FreeAll {
        /// Restaurant id
        #[arg(long, value_name = "ID")]
        restaurant: RestaurantId,

        /// Show what would change without writing
        #[arg(long)]
        dry_run: bool,
    },
}

impl TableCommand {
    /// Execute the table command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let mut db = open_database(global, &config)?;

        match self.action {
            TableAction::Add {
                restaurant,
                number,
                capacity,
            } => {
                db.require_restaurant(restaurant)?;
                let table = db.add_table(restaurant, number, capacity)?;
                println!("{}", table.id);
                if !global.quiet {
                    eprintln!("Added {table}");
                }
                Ok(())
            }
            TableAction::List { restaurant, format } => {
                db.require_restaurant(restaurant)?;
                let tables = db.list_tables(restaurant)?;
                match OutputFormat::resolve(format, &config) {
                    OutputFormat::Table => format_as_table(&tables),
                    OutputFormat::Json => format_as_json(&tables),
                    OutputFormat::Csv => write_delimited(&COLUMN_HEADERS, rows(&tables), b','),
                    OutputFormat::Tsv => write_delimited(&COLUMN_HEADERS, rows(&tables), b'\t'),
                }
            }
            TableAction::Remove { table_id } => {
                let table = db.remove_table(table_id)?;
                if !global.quiet {
                    eprintln!("Removed {table}");
                }
                Ok(())
            }
            TableAction::SetStatus {
                table_id,
                status,
                dry_run,
            } => {
                let status: TableStatus = status
                    .parse()
                    .map_err(|e| CliError::InvalidArguments(format!("{e}")))?;
                let plan = plan_set_table_status(&db, table_id, status)?;
                run_plan(&mut db, &plan, dry_run, global)
            }
            TableAction::FreeAll {
                restaurant,
                dry_run,
            } => {
                let plan = plan_free_all_tables(&db, restaurant)?;
                run_plan(&mut db, &plan, dry_run, global)
            }
        }
    }
}

fn run_plan(
    db: &mut Database,
    plan: &OperationPlan,
    dry_run: bool,
    global: &GlobalOptions,
) -> Result<(), CliError> {
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

    let result = PlanExecutor::new(db).execute(plan)?;
    if !global.quiet {
        eprintln!("{}: {} table(s) updated", plan.description, result.rows_changed);
    }
    Ok(())
}

fn rows(tables: &[Table]) -> impl Iterator<Item = Vec<String>> + '_ {
    tables.iter().map(|t| {
        vec![
            t.id.to_string(),
            t.restaurant_id.to_string(),
            t.number.to_string(),
            t.capacity.to_string(),
            t.status.to_string(),
        ]
    })
}

fn format_as_table(tables: &[Table]) -> Result<(), CliError> {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();

    let header_line = COLUMN_HEADERS
        .iter()
        .map(|s| s.to_uppercase())
        .collect::<Vec<_>>()
        .join("\t");
    writeln!(handle, "{header_line}")?;

    for t in tables {
        writeln!(
            handle,
            "{}\t{}\t{}\t{}\t{}",
            t.id, t.restaurant_id, t.number, t.capacity, t.status
        )?;
    }
    Ok(())
}

fn format_as_json(tables: &[Table]) -> Result<(), CliError> {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();

    serde_json::to_writer_pretty(&mut handle, tables)?;
    writeln!(handle)?;
    Ok(())
}
