//! Build script for tablebook-cli.
//!
//! Generates the `tablebook.1` man page into OUT_DIR using clap_mangen.
//!
//! Build scripts cannot depend on the crate being built, so the command
//! structure is declared again here in its minimal form.

use clap::{Arg, ArgAction, Command};
use clap_mangen::Man;
use std::fs;
use std::path::PathBuf;

/// Build the CLI command structure for man page generation.
///
/// Keep in sync with src/cli.rs.
fn build_cli() -> Command {
    Command::new("tablebook")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Book restaurant tables")
        .long_about(
            "Command-line tool for booking restaurant tables: free slots, \
             table assignment, cancellation and table status reconciliation",
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .help("Enable verbose output")
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("quiet")
                .long("quiet")
                .help("Suppress non-essential output")
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("data-dir")
                .long("data-dir")
                .help("Override the data directory location")
                .value_name("PATH")
                .global(true)
                .env("TABLEBOOK_DATA_DIR"),
        )
        .arg(
            Arg::new("busy-timeout")
                .long("busy-timeout")
                .help("Override the default busy timeout (in seconds)")
                .value_name("SECONDS")
                .global(true)
                .env("TABLEBOOK_BUSY_TIMEOUT"),
        )
        .arg(
            Arg::new("disable-autoinit")
                .long("disable-autoinit")
                .help("Disable automatic store initialization")
                .global(true)
                .action(ArgAction::SetTrue)
                .env("TABLEBOOK_DISABLE_AUTOINIT"),
        )
        .subcommands(vec![
            Command::new("init")
                .about("Initialize the data directory and store")
                .long_about("Create the data directory, the store and optionally a default config"),
            Command::new("restaurant")
                .about("Register and list restaurants")
                .long_about("Add a restaurant and print its id, or list restaurants"),
            Command::new("table")
                .about("Manage tables and their status")
                .long_about(
                    "Add, list and remove tables; override or reset their cached status",
                ),
            Command::new("slots")
                .about("List bookable start times for a party")
                .long_about("Show every start time at which some table fits the party"),
            Command::new("book")
                .about("Book a table")
                .long_about("Assign the best-fitting free table and record the reservation"),
            Command::new("cancel")
                .about("Cancel a reservation")
                .long_about("Cancel a reservation and free its slot"),
            Command::new("complete")
                .about("Mark a reservation completed")
                .long_about("Close a reservation after the guests have left"),
            Command::new("edit-contact")
                .about("Change a reservation's guest details")
                .long_about("Update name, surname, phone or email of a reservation"),
            Command::new("rename-email")
                .about("Move a guest's reservations to a new email")
                .long_about("Replace one email with another on every reservation that uses it"),
            Command::new("list")
                .about("List reservations")
                .long_about("Display reservations filtered by restaurant, date, status or email"),
            Command::new("today")
                .about("Show a day's active reservations grouped by table")
                .long_about("Display the active reservations of one day, table by table"),
            Command::new("reconcile")
                .about("Sync table statuses with reservations")
                .long_about(
                    "Recompute each table's status from its reservations, once or periodically",
                ),
            Command::new("validate")
                .about("Validate a configuration file")
                .long_about("Check a tablebook configuration file for errors"),
            Command::new("completions")
                .about("Generate shell completion scripts")
                .long_about("Generate shell completion scripts for bash, zsh, fish, or PowerShell"),
        ])
}

fn main() {
    let out_dir = PathBuf::from(std::env::var("OUT_DIR").unwrap());
    let man_dir = out_dir.join("man");
    fs::create_dir_all(&man_dir).unwrap();

    let man = Man::new(build_cli());
    let mut buffer = Vec::new();
    man.render(&mut buffer).unwrap();

    fs::write(man_dir.join("tablebook.1"), buffer).unwrap();

    println!("cargo:rerun-if-changed=src/cli.rs");
    println!("cargo:rerun-if-changed=src/commands/");
}
