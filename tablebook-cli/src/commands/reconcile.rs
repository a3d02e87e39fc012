//! Reconcile command implementation.
//!
//! Recomputes each table's cached status from its reservations at the
//! current local time. With `--watch` it keeps sweeping on the configured
//! interval until interrupted (or until `--sweeps` passes have run).

use crate::error::CliError;
use crate::utils::{load_configuration, local_now, open_database, GlobalOptions};
use clap::Args;
use std::sync::atomic::Ordering;
use std::time::Duration;
use tablebook::{ReconcileJob, ReconcileOperations, ReconcileOptions, ReconcileResult, RestaurantId};

/// Sync table statuses with reservations.
#[derive(Args)]
pub struct ReconcileCommand {
    /// Only reconcile this restaurant's tables
    #[arg(long, value_name = "ID")]
    pub restaurant: Option<RestaurantId>,

    /// Also mark reservations that have already ended as completed
    #[arg(long)]
    pub complete_elapsed: bool,

    /// Report changes without writing them
    #[arg(long)]
    pub dry_run: bool,

    /// Keep running, sweeping once per interval
    #[arg(long)]
    pub watch: bool,

    /// Seconds between sweeps in watch mode (defaults to the configured interval)
    #[arg(long, value_name = "SECONDS", requires = "watch")]
    pub interval: Option<u64>,

    /// Stop watching after this many sweeps
    #[arg(long, value_name = "N", requires = "watch")]
    pub sweeps: Option<usize>,
}

impl ReconcileCommand {
    /// Execute the reconcile command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        if self.interval == Some(0) {
            return Err(CliError::InvalidArguments(
                "--interval must be greater than 0".to_string(),
            ));
        }

        let config = load_configuration(global)?;
        let mut db = open_database(global, &config)?;

        let mut options = ReconcileOptions::from_config(&config)
            .with_restaurant(self.restaurant)
            .with_dry_run(self.dry_run);
        if self.complete_elapsed {
            options = options.with_complete_elapsed(true);
        }

        if !self.watch {
            let result = ReconcileOperations::reconcile_statuses(&mut db, local_now(), &options)?;
            report(&result, global);
            return Ok(());
        }

        let interval = match self.interval {
            Some(seconds) => Duration::from_secs(seconds),
            None => ReconcileJob::from_config(&config).interval(),
        };
        let job = ReconcileJob::new(interval, options);

        let stop = job.stop_handle();
        let limit = self.sweeps;
        let mut seen = 0;

        if !global.quiet {
            eprintln!("Reconciling every {}s", interval.as_secs());
        }
        job.run(&mut db, |result| {
            report(result, global);
            seen += 1;
            if limit.is_some_and(|n| seen >= n) {
                stop.store(true, Ordering::SeqCst);
            }
        })?;

        Ok(())
    }
}

fn report(result: &ReconcileResult, global: &GlobalOptions) {
    let verb = if result.dry_run { "would change" } else { "changed" };

    for change in &result.changes {
        println!(
            "table {}: {} -> {}",
            change.number, change.from, change.to
        );
    }
    if !result.completed.is_empty() {
        let ids: Vec<String> = result.completed.iter().map(ToString::to_string).collect();
        println!("completed: {}", ids.join(", "));
    }

    if !global.quiet {
        eprintln!(
            "Checked {} table(s), {verb} {}",
            result.tables_checked,
            result.changes.len()
        );
    }
}
