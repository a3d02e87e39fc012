//! Main entry point for the tablebook CLI.
//!
//! This is the command-line interface for the tablebook reservation engine.
//! Its main commands:
//! - `slots`: List bookable start times for a party
//! - `book`: Book the best-fitting table
//! - `cancel` / `complete`: Close a reservation
//! - `list` / `today`: Show reservations
//! - `reconcile`: Sync table statuses with reservations

mod cli;
mod commands;
mod error;
mod utils;

use clap::Parser;
use cli::Cli;
use utils::GlobalOptions;

fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let _logger = tablebook::init_logger(cli.verbose, cli.quiet);

    let global = GlobalOptions {
        verbose: cli.verbose,
        quiet: cli.quiet,
        data_dir: cli.data_dir,
        busy_timeout: cli.busy_timeout,
        disable_autoinit: cli.disable_autoinit,
    };

    let result = match cli.command {
        cli::Command::Init(cmd) => cmd.execute(&global),
        cli::Command::Restaurant(cmd) => cmd.execute(&global),
        cli::Command::Table(cmd) => cmd.execute(&global),
        cli::Command::Slots(cmd) => cmd.execute(&global),
        cli::Command::Book(cmd) => cmd.execute(&global),
        cli::Command::Cancel(cmd) => cmd.execute(&global),
        cli::Command::Complete(cmd) => cmd.execute(&global),
        cli::Command::EditContact(cmd) => cmd.execute(&global),
        cli::Command::RenameEmail(cmd) => cmd.execute(&global),
        cli::Command::List(cmd) => cmd.execute(&global),
        cli::Command::Today(cmd) => cmd.execute(&global),
        cli::Command::Reconcile(cmd) => cmd.execute(&global),
        cli::Command::Validate(cmd) => cmd.execute(&global),
        cli::Command::Completions(cmd) => cmd.execute(&global),
    };

    // Handle errors and set exit code
    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(e.exit_code());
        }
    }
}
