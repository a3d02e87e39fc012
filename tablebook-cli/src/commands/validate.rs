//! Command to validate a tablebook configuration file.

use crate::error::CliError;
use crate::utils::GlobalOptions;
use clap::Args;
use std::path::PathBuf;
use tablebook::config::{ConfigLoader, ConfigValidator};
use tablebook::BookingPolicy;

/// Validate a tablebook configuration file.
#[derive(Args)]
pub struct ValidateCommand {
    /// Configuration file to validate
    #[arg(value_name = "CONFIG_PATH")]
    pub config_path: PathBuf,
}

impl ValidateCommand {
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        if !self.config_path.exists() {
            return Err(CliError::InvalidArguments(format!(
                "File not found: {}",
                self.config_path.display()
            )));
        }

        let config = match ConfigLoader::load_file(&self.config_path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Parse error: {e}");
                return Err(CliError::SemanticFailure(
                    "Configuration file is invalid".to_string(),
                ));
            }
        };

        if let Err(e) = ConfigValidator::validate(&config) {
            eprintln!("Validation error: {e}");
            return Err(CliError::SemanticFailure(
                "Configuration validation failed".to_string(),
            ));
        }

        println!("Configuration is valid");
        if global.verbose {
            if let Ok(policy) = BookingPolicy::from_config(&config) {
                eprintln!(
                    "  service {}-{}, {} slot(s) every {} min, {} min per booking",
                    policy.service_open,
                    policy.service_close,
                    policy.candidate_slots().len(),
                    policy.slot_step_minutes,
                    policy.duration_minutes
                );
            }
        }
        Ok(())
    }
}
