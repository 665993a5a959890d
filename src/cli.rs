//! CLI argument parsing and command dispatch

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::LevelFilter;

use multi_compose::output::OutputConfig;

use crate::commands;

/// Multi-Compose - run many repositories' compose services on one network
#[derive(Parser, Debug)]
#[command(name = "multi-compose")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Colorize output (always, never, auto)
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL", default_value = "info")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Clone every repository in the repository set
    Clone(commands::clone::CloneArgs),

    /// Namespace every manifest, create the shared network, and start everything
    #[command(alias = "docker-up")]
    LaunchAll(commands::launch::LaunchArgs),

    /// List the services every repository declares
    ListServices(commands::list::ListArgs),

    /// Start one service in every repository that declares it
    RunService(commands::run::RunArgs),

    /// Put back the manifests saved before namespacing
    ///
    /// Once a checkout has been namespaced, later launches read the saved
    /// original and ignore edits to the live manifest (for example from a
    /// pull). Run restore before pulling to pick up upstream changes.
    Restore(commands::restore::RestoreArgs),

    /// Generate shell completion scripts
    Completions(commands::completions::CompletionsArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        let level: LevelFilter = self
            .log_level
            .parse()
            .with_context(|| format!("Invalid log level: {}", self.log_level))?;
        // Ignore a second initialization; only the first logger wins.
        let _ = env_logger::Builder::new()
            .filter_level(level)
            .format_timestamp(None)
            .try_init();

        let output = OutputConfig::from_env_and_flag(&self.color);

        match self.command {
            Commands::Clone(args) => commands::clone::execute(args, &output),
            Commands::LaunchAll(args) => commands::launch::execute(args, &output),
            Commands::ListServices(args) => commands::list::execute(args, &output),
            Commands::RunService(args) => commands::run::execute(args, &output),
            Commands::Restore(args) => commands::restore::execute(args, &output),
            Commands::Completions(args) => commands::completions::execute(args),
        }
    }
}
