//! CLI command implementations.
//!
//! This module contains the implementations of all CLI commands:
//! - `init`: Create the data directory and store
//! - `restaurant`: Register and list restaurants
//! - `table`: Manage tables and their cached status
//! - `slots`: List bookable start times for a party
//! - `book`: Book the best-fitting table
//! - `cancel` / `complete`: Close a reservation
//! - `edit_contact`: Change a reservation's guest details
//! - `rename_email`: Move a guest's reservations to a new email
//! - `list`: List reservations with filters
//! - `today`: Show a day's reservations grouped by table
//! - `reconcile`: Sync table statuses, once or on an interval
//! - `validate`: Validate configuration file
//! - `completions`: Generate shell completion scripts

pub mod book;
pub mod completions;
pub mod edit_contact;
pub mod init;
pub mod list;
pub mod reconcile;
pub mod rename_email;
pub mod restaurant;
pub mod slots;
pub mod status;
pub mod table;
pub mod today;
pub mod validate;

pub use book::BookCommand;
pub use completions::CompletionsCommand;
pub use edit_contact::EditContactCommand;
pub use init::InitCommand;
pub use list::ListCommand;
pub use reconcile::ReconcileCommand;
pub use rename_email::RenameEmailCommand;
pub use restaurant::RestaurantCommand;
pub use slots::SlotsCommand;
pub use status::{CancelCommand, CompleteCommand};
pub use table::TableCommand;
pub use today::TodayCommand;
pub use validate::ValidateCommand;
