//! CLI structure and command definitions.
//!
//! This module defines the main CLI structure using clap's derive macros,
//! including global options and subcommands.

use crate::commands::{
    BookCommand, CancelCommand, CompleteCommand, CompletionsCommand, EditContactCommand,
    InitCommand, ListCommand, ReconcileCommand, RenameEmailCommand, RestaurantCommand,
    SlotsCommand, TableCommand, TodayCommand, ValidateCommand,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Restaurant table booking from the command line.
#[derive(Parser)]
#[command(name = "tablebook")]
#[command(version, about = "Book restaurant tables", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Override the data directory location
    #[arg(long, value_name = "PATH", global = true, env = "TABLEBOOK_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Override the default busy timeout (in seconds)
    #[arg(long, value_name = "SECONDS", global = true, env = "TABLEBOOK_BUSY_TIMEOUT")]
    pub busy_timeout: Option<u32>,

    /// Disable automatic store initialization
    #[arg(long, global = true, env = "TABLEBOOK_DISABLE_AUTOINIT")]
    pub disable_autoinit: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand)]
pub enum Command {
    /// Initialize the data directory and store
    Init(InitCommand),

    /// Register and list restaurants
    Restaurant(RestaurantCommand),

    /// Manage tables and their status
    Table(TableCommand),

    /// List bookable start times for a party
    Slots(SlotsCommand),

    /// Book a table
    Book(BookCommand),

    /// Cancel a reservation
    Cancel(CancelCommand),

    /// Mark a reservation completed
    Complete(CompleteCommand),

    /// Change a reservation's guest details
    EditContact(EditContactCommand),

    /// Move a guest's reservations to a new email
    RenameEmail(RenameEmailCommand),

    /// List reservations
    List(ListCommand),

    /// Show a day's active reservations grouped by table
    Today(TodayCommand),

    /// Sync table statuses with reservations
    Reconcile(ReconcileCommand),

    /// Validate a configuration file
    Validate(ValidateCommand),

    /// Generate shell completion scripts
    Completions(CompletionsCommand),
}
