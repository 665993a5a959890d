//! # Clone Command Implementation
//!
//! Fetches every repository of the set into the download directory. A
//! repository that fails to clone is reported and does not stop the others.

use anyhow::Result;
use clap::Args;

use multi_compose::clone::{clone_all, CloneStatus};
use multi_compose::output::{OutputConfig, Status};
use multi_compose::runtime::SystemGit;

use super::WorkspaceArgs;

/// Clone every repository in the repository set
#[derive(Args, Debug)]
pub struct CloneArgs {
    #[command(flatten)]
    pub workspace: WorkspaceArgs,
}

/// Execute the `clone` command.
pub fn execute(args: CloneArgs, output: &OutputConfig) -> Result<()> {
    let set = args.workspace.load()?;
    let settings = args.workspace.settings();

    let outcome = clone_all(&set, &settings, &SystemGit)?;

    for (repo, status) in &outcome.succeeded {
        match status {
            CloneStatus::Cloned => {
                println!("{}", output.line(Status::Ok, format!("Cloned {}", repo)))
            }
            CloneStatus::AlreadyPresent => println!(
                "{}",
                output.line(Status::Skipped, format!("{} already present", repo))
            ),
        }
    }
    for line in output.failure_lines(&outcome.failures) {
        eprintln!("{}", line);
    }

    Ok(())
}
