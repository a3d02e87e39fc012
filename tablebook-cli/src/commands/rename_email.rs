//! Rename-email command implementation.

use crate::error::CliError;
use crate::utils::{load_configuration, open_database, print_warnings, GlobalOptions};
use clap::Args;

/// Move every reservation of one guest email to another.
///
/// Prints how many reservations changed.
#[derive(Args)]
pub struct RenameEmailCommand {
    /// Current email (matched case-insensitively)
    pub old: String,

    /// New email
    pub new: String,
}

impl RenameEmailCommand {
    /// Execute the rename-email command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let mut db = open_database(global, &config)?;

        let changed = db.rename_email(&self.old, &self.new)?;
        println!("{changed}");

        if changed == 0 {
            print_warnings(global, &[format!("no reservations use {}", self.old.trim())]);
        }
        Ok(())
    }
}
