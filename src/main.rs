//! # Multi-Compose CLI
//!
//! This is the binary entry point for the `multi-compose` command-line tool.
//!
//! Its primary responsibilities are:
//! - Parsing command-line arguments using `clap`.
//! - Setting up logging and output preferences.
//! - Executing the appropriate command and translating fatal errors into a
//!   non-zero exit status.
//!
//! The orchestration logic lives in the `multi_compose` library crate; the
//! binary is a thin wrapper around it.

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli.execute()
}
