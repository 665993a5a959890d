//! # Restore Command Implementation
//!
//! Puts back every manifest saved before its first namespacing and removes
//! the saved copy, leaving each checkout as it was cloned.

use anyhow::Result;
use clap::Args;

use multi_compose::manifest::restore_all;
use multi_compose::output::{OutputConfig, Status};

use super::WorkspaceArgs;

/// Put back the manifests saved before namespacing
///
/// Once a checkout has been namespaced, later launches read the saved
/// original and ignore edits to the live manifest (for example from a
/// pull). Run restore before pulling to pick up upstream changes.
#[derive(Args, Debug)]
pub struct RestoreArgs {
    #[command(flatten)]
    pub workspace: WorkspaceArgs,
}

/// Execute the `restore` command.
pub fn execute(args: RestoreArgs, output: &OutputConfig) -> Result<()> {
    let set = args.workspace.load()?;
    let settings = args.workspace.settings();

    let outcome = restore_all(&set.repositories, &settings)?;

    for (repo, restored) in &outcome.succeeded {
        let line = if *restored {
            output.line(Status::Ok, format!("Restored {}", repo))
        } else {
            output.line(Status::Skipped, format!("{} was not namespaced", repo))
        };
        println!("{}", line);
    }
    for line in output.failure_lines(&outcome.failures) {
        eprintln!("{}", line);
    }

    Ok(())
}
