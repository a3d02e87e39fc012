//! Init command implementation.
//!
//! This module implements the `init` command for explicitly initializing
//! the tablebook data directory and store.

use crate::error::CliError;
use crate::utils::{resolve_data_dir, GlobalOptions};
use clap::Args;
use tablebook::operations::init::{init_database, InitOptions};

/// Initialize the tablebook data directory and store.
#[derive(Args)]
pub struct InitCommand {
    /// Overwrite existing store
    #[arg(long)]
    overwrite: bool,

    /// Create default configuration file
    #[arg(long)]
    with_config: bool,

    /// Preview actions without executing
    #[arg(long)]
    dry_run: bool,
}

impl InitCommand {
    /// Execute the init command.
    ///
    /// The global `--data-dir` names where to create rather than where to
    /// find, and `--disable-autoinit` does not apply.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let data_dir = resolve_data_dir(global)?;

        let options = InitOptions::new(data_dir)
            .with_overwrite(self.overwrite)
            .with_create_config(self.with_config)
            .with_dry_run(self.dry_run);

        let result = init_database(&options)?;

        if self.dry_run {
            println!("Dry-run mode: no changes will be made");
            println!();
            println!("Would initialize tablebook in: {}", result.data_dir.display());
            if result.data_dir_created {
                println!("  - Create data directory");
            }
            if self.overwrite {
                println!("  - Recreate store");
            } else {
                println!("  - Create store");
            }
            if result.config_created {
                println!("  - Create configuration file");
            } else if self.with_config {
                println!("  - Configuration file already exists (will not overwrite)");
            }
            return Ok(());
        }

        println!("Initialized tablebook in: {}", result.data_dir.display());

        if result.data_dir_created {
            println!("  - Created data directory");
        }

        if result.database_created {
            if self.overwrite {
                println!("  - Recreated store");
            } else {
                println!("  - Created store");
            }
        }

        if result.config_created {
            println!("  - Created default configuration file");
        } else if self.with_config {
            println!("  - Configuration file already exists (not overwritten)");
        }

        Ok(())
    }
}
