//! Restaurant command implementation.
//!
//! `restaurant add` registers a restaurant and prints its id;
//! `restaurant list` shows every registered restaurant.

use crate::error::CliError;
use crate::utils::{load_configuration, open_database, write_delimited, GlobalOptions, OutputFormat};
use clap::{Args, Subcommand};
use std::io::Write;
use tablebook::Restaurant;

const COLUMN_HEADERS: [&str; 2] = ["id", "name"];

/// Manage restaurants.
#[derive(Args)]
pub struct RestaurantCommand {
    #[command(subcommand)]
    pub action: RestaurantAction,
}

/// Restaurant subcommands.
#[derive(Subcommand)]
pub enum RestaurantAction {
    /// Register a restaurant and print its id
    Add {
        /// Display name
        name: String,
    },

    /// List restaurants
    List {
        /// Output format (defaults to the configured format)
        #[arg(long, value_enum, env = "TABLEBOOK_OUTPUT_FORMAT", ignore_case = true)]
        format: Option<OutputFormat>,
    },
}

impl RestaurantCommand {
    /// Execute the restaurant command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let mut db = open_database(global, &config)?;

        match self.action {
            RestaurantAction::Add { name } => {
                let restaurant = db.create_restaurant(&name)?;
                println!("{}", restaurant.id);
                if !global.quiet {
                    eprintln!("Added restaurant '{}'", restaurant.name);
                }
                Ok(())
            }
            RestaurantAction::List { format } => {
                let restaurants = db.list_restaurants()?;
                match OutputFormat::resolve(format, &config) {
                    OutputFormat::Table => format_as_table(&restaurants),
                    OutputFormat::Json => format_as_json(&restaurants),
                    OutputFormat::Csv => write_delimited(&COLUMN_HEADERS, rows(&restaurants), b','),
                    OutputFormat::Tsv => {
                        write_delimited(&COLUMN_HEADERS, rows(&restaurants), b'\t')
                    }
                }
            }
        }
    }
}

fn rows(restaurants: &[Restaurant]) -> impl Iterator<Item = Vec<String>> + '_ {
    restaurants
        .iter()
        .map(|r| vec![r.id.to_string(), r.name.clone()])
}

fn format_as_table(restaurants: &[Restaurant]) -> Result<(), CliError> {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();

    writeln!(handle, "ID\tNAME")?;
    for r in restaurants {
        writeln!(handle, "{}\t{}", r.id, r.name)?;
    }
    Ok(())
}

fn format_as_json(restaurants: &[Restaurant]) -> Result<(), CliError> {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();

    let json_data: Vec<serde_json::Value> = restaurants
        .iter()
        .map(|r| serde_json::json!({ "id": r.id, "name": r.name }))
        .collect();
    serde_json::to_writer_pretty(&mut handle, &json_data)?;
    writeln!(handle)?;
    Ok(())
}
