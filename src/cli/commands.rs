//! CLI commands and argument parsing

use crate::types::OutputFormat;
use clap::builder::RangedU64ValueParser;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Browse a remote game server listing
#[derive(Parser, Debug)]
#[command(name = "server-browser")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML or JSON)
    #[arg(short, long, global = true, default_value = "server-browser.yaml")]
    pub config: PathBuf,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Page through the listing and print every server
    List {
        /// Stop after this many pages (at least one)
        #[arg(long, value_parser = RangedU64ValueParser::<usize>::new().range(1..))]
        max_pages: Option<usize>,
    },

    /// Fetch the first page and report how many servers came back
    Check,

    /// Validate the configuration file
    Validate,
}
