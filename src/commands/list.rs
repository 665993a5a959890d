//! # List-Services Command Implementation
//!
//! Prints every service every repository declares, grouped by repository.
//! Repositories that cannot be scanned do not hide the others: the services
//! that were found are printed first and the command then fails with one
//! line per failing repository.

use anyhow::Result;
use clap::Args;

use multi_compose::discovery::discover;
use multi_compose::output::{OutputConfig, Status};

use super::WorkspaceArgs;

/// List the services every repository declares
#[derive(Args, Debug)]
pub struct ListArgs {
    #[command(flatten)]
    pub workspace: WorkspaceArgs,

    /// Show only the total count of services.
    #[arg(long)]
    pub count: bool,
}

/// Execute the `list-services` command.
pub fn execute(args: ListArgs, output: &OutputConfig) -> Result<()> {
    let set = args.workspace.load()?;
    let settings = args.workspace.settings();

    let discovery = discover(&set.repositories, &settings)?;

    if args.count {
        println!("{}", discovery.inventory.len());
    } else if discovery.inventory.is_empty() {
        println!("{}", output.line(Status::Info, "No services found."));
    } else {
        println!("Services:");
        for record in discovery.inventory.records() {
            println!("- Repo: {}, Service: {}", record.repository, record.service);
        }
    }

    match discovery.error {
        Some(err) => Err(anyhow::Error::new(err).context("Failed to list services")),
        None => Ok(()),
    }
}
