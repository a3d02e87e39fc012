//! Common test utilities for CLI integration tests.
//!
//! This module provides shared helpers for CLI testing, including:
//! - Test environment setup with temporary directories
//! - Command builder helpers for common patterns
//! - Fixtures for restaurants, tables and bookings

use assert_cmd::Command;
use chrono::{Days, Local, NaiveDate};
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A bookable service date: two weeks from today, well inside the window.
#[allow(dead_code)]
pub fn future_date() -> NaiveDate {
    Local::now()
        .date_naive()
        .checked_add_days(Days::new(14))
        .expect("date in range")
}

/// [`future_date`] in the `dd.mm.yyyy` form the CLI prints.
#[allow(dead_code)]
pub fn future_day() -> String {
    future_date().format("%d.%m.%Y").to_string()
}

/// Test environment with isolated data directory.
///
/// This struct provides an isolated test environment with:
/// - A temporary directory used as the working directory
/// - A separate data directory for the tablebook store
/// - Helper methods for common CLI operations
pub struct TestEnv {
    /// Temporary directory (kept alive for the duration of the test)
    #[allow(dead_code)]
    temp_dir: TempDir,
    /// Path to the temporary directory
    pub temp_path: PathBuf,
    /// Path to the tablebook data directory
    pub data_dir: PathBuf,
}

#[allow(dead_code)]
impl TestEnv {
    /// Create a new test environment.
    ///
    /// The data directory path is not created; `init` or auto-init does that.
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let temp_path = temp_dir.path().to_path_buf();
        let data_dir = temp_path.join("tablebook-data");

        Self {
            temp_dir,
            temp_path,
            data_dir,
        }
    }

    /// Get a bare command builder without pre-configured flags.
    ///
    /// The working directory is the temp dir and inherited `TABLEBOOK_*`
    /// variables are removed so no outside configuration leaks in.
    pub fn command_bare(&self) -> Command {
        let mut cmd = Command::cargo_bin("tablebook").expect("Failed to find tablebook binary");
        cmd.current_dir(&self.temp_path);
        for (key, _) in std::env::vars() {
            if key.starts_with("TABLEBOOK_") {
                cmd.env_remove(key);
            }
        }
        cmd
    }

    /// Get a command builder with the data directory pre-configured.
    pub fn command(&self) -> Command {
        let mut cmd = self.command_bare();
        cmd.arg("--data-dir").arg(&self.data_dir);
        cmd
    }

    /// Get the temp path.
    pub fn path(&self) -> &Path {
        &self.temp_path
    }

    /// Write a file under the data directory, creating it if needed.
    pub fn write_data_file(&self, name: &str, content: &str) -> PathBuf {
        std::fs::create_dir_all(&self.data_dir).expect("Failed to create data dir");
        let path = self.data_dir.join(name);
        std::fs::write(&path, content).expect("Failed to write file");
        path
    }

    /// Run a command that must succeed and return its trimmed stdout.
    pub fn run(&self, args: &[&str]) -> String {
        let output = self
            .command()
            .args(args)
            .output()
            .expect("Failed to run tablebook");

        assert!(
            output.status.success(),
            "tablebook {args:?} failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );

        String::from_utf8(output.stdout)
            .expect("Invalid UTF-8 in output")
            .trim()
            .to_string()
    }

    /// Register a restaurant and return its id.
    pub fn add_restaurant(&self, name: &str) -> String {
        self.run(&["restaurant", "add", name])
    }

    /// Add a table and return its id.
    pub fn add_table(&self, restaurant: &str, number: u32, capacity: u32) -> String {
        self.run(&[
            "table",
            "add",
            "--restaurant",
            restaurant,
            "--number",
            &number.to_string(),
            "--capacity",
            &capacity.to_string(),
        ])
    }

    /// A restaurant with tables of the given `(number, capacity)`.
    pub fn seed(&self, tables: &[(u32, u32)]) -> (String, Vec<String>) {
        let restaurant = self.add_restaurant("Harbour Grill");
        let ids = tables
            .iter()
            .map(|&(number, capacity)| self.add_table(&restaurant, number, capacity))
            .collect();
        (restaurant, ids)
    }

    /// Arguments for a valid booking; callers append or override flags.
    pub fn book_args(restaurant: &str, time: &str, party: u32) -> Vec<String> {
        [
            "book",
            "--restaurant",
            restaurant,
            "--date",
            &future_day(),
            "--time",
            time,
            "--party",
            &party.to_string(),
            "--name",
            "Olena",
            "--surname",
            "Shevchenko",
            "--phone",
            "380501234567",
            "--email",
            "olena@example.com",
        ]
        .iter()
        .map(ToString::to_string)
        .collect()
    }

    /// Book and return the reservation id.
    pub fn book(&self, restaurant: &str, time: &str, party: u32) -> String {
        let args = Self::book_args(restaurant, time, party);
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        self.run(&args)
    }

    /// Moves a stored reservation to another day, bypassing the booking
    /// window. Used to set up reservations that already lie in the past.
    pub fn move_reservation(&self, id: &str, day: &str) {
        let conn = Connection::open(self.data_dir.join("tablebook.db"))
            .expect("Failed to open store");
        let changed = conn
            .execute(
                "UPDATE reservations SET date = ?1 WHERE id = ?2",
                rusqlite::params![day, id.parse::<i64>().expect("numeric id")],
            )
            .expect("Failed to move reservation");
        assert_eq!(changed, 1, "no reservation {id}");
    }

    /// Slots for a party on [`future_day`], one per element.
    pub fn slots(&self, restaurant: &str, party: u32) -> Vec<String> {
        self.run(&[
            "slots",
            "--restaurant",
            restaurant,
            "--date",
            &future_day(),
            "--party",
            &party.to_string(),
        ])
        .lines()
        .map(ToString::to_string)
        .collect()
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}
