//! CLI module
//!
//! Command-line front end over the aggregator.
//!
//! # Commands
//!
//! - `list` - Page through the listing and print every server
//! - `check` - Fetch the first page only
//! - `validate` - Validate the configuration file

mod commands;
mod runner;

pub use commands::{Cli, Commands};
pub use runner::Runner;
