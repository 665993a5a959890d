//! # Run-Service Command Implementation
//!
//! Starts one service, by its bare name, in every repository that declares
//! it. Discovery has to succeed for the whole set; a failure to start the
//! service in one repository is reported without failing the command.

use anyhow::{Context, Result};
use clap::builder::NonEmptyStringValueParser;
use clap::Args;

use multi_compose::output::{OutputConfig, Status};
use multi_compose::runner::run_service;
use multi_compose::runtime::DockerCli;

use super::WorkspaceArgs;

/// Start one service in every repository that declares it
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Bare service name as written in the repository's manifest.
    #[arg(value_name = "SERVICE", value_parser = NonEmptyStringValueParser::new())]
    pub service: String,

    #[command(flatten)]
    pub workspace: WorkspaceArgs,
}

/// Execute the `run-service` command.
pub fn execute(args: RunArgs, output: &OutputConfig) -> Result<()> {
    let set = args.workspace.load()?;
    let settings = args.workspace.settings();
    let ops = DockerCli::new(&settings);

    let outcome = run_service(&set.repositories, &settings, &ops, &args.service)
        .context("Failed to run target service")?;

    if outcome.succeeded.is_empty() && outcome.failures.is_empty() {
        println!(
            "{}",
            output.line(
                Status::Info,
                format!("No repository declares a service named '{}'", args.service)
            )
        );
        return Ok(());
    }

    for (repo, name) in &outcome.succeeded {
        println!(
            "{}",
            output.line(Status::Ok, format!("Started '{}' in {}", name, repo))
        );
    }
    for line in output.failure_lines(&outcome.failures) {
        eprintln!("{}", line);
    }

    Ok(())
}
