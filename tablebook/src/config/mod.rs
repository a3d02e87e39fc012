//! Configuration system for tablebook.
//!
//! # Configuration Precedence
//!
//! Configuration is merged from multiple sources with the following precedence
//! (highest to lowest):
//!
//! 1. Programmatic overrides (via `ConfigBuilder::with_config`)
//! 2. Environment variables (`TABLEBOOK_*`)
//! 3. Private project config (`tablebook.local.yaml`)
//! 4. Project config (`tablebook.yaml`)
//! 5. User config (`~/.tablebook/config.yaml`)
//! 6. Built-in defaults
//!
//! # Examples
//!
//! Loading from a specific directory:
//!
//! ```no_run
//! use tablebook::config::ConfigBuilder;
//! use std::path::Path;
//!
//! let config = ConfigBuilder::new()
//!     .with_working_dir(Path::new("/srv/bistro"))
//!     .build()
//!     .unwrap();
//! ```

pub mod builder;
pub mod environment;
pub mod loader;
pub mod merger;
pub mod schema;
pub mod validator;

pub use builder::ConfigBuilder;
pub use environment::EnvironmentConfig;
pub use loader::{ConfigLoader, ConfigSource};
pub use merger::ConfigMerger;
pub use schema::{
    BookingConfig, Config, OutputFormat, ReconcileConfig, DEFAULT_LOCK_WAIT_SECONDS,
    DEFAULT_RECONCILE_INTERVAL_SECONDS,
};
pub use validator::ConfigValidator;

#[cfg(test)]
mod proptests;
