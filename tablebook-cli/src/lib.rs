//! Library exports for tablebook-cli.
//!
//! This module exports the CLI structure for use by the benchmarks and
//! documentation tooling.

pub mod cli;
pub mod commands;
pub mod error;
pub mod utils;

// Re-export CLI for tooling
pub use cli::Cli;
