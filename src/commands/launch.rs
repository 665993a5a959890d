//! # Launch-All Command Implementation
//!
//! Creates the shared network, namespaces every repository's manifest against
//! a fresh service inventory, and starts every repository detached.
//!
//! Only configuration and network failures stop the run. Repositories that
//! fail to scan, namespace, or start are listed at the end and the command
//! still exits successfully.

use anyhow::{Context, Result};
use clap::Args;
use std::time::Instant;

use multi_compose::docker::NetworkStatus;
use multi_compose::launch::launch_all;
use multi_compose::output::{OutputConfig, Status};
use multi_compose::runtime::DockerCli;

use super::WorkspaceArgs;

/// Namespace every manifest and start all services
#[derive(Args, Debug)]
pub struct LaunchArgs {
    #[command(flatten)]
    pub workspace: WorkspaceArgs,
}

/// Execute the `launch-all` command.
pub fn execute(args: LaunchArgs, output: &OutputConfig) -> Result<()> {
    let start_time = Instant::now();
    let set = args.workspace.load()?;
    let settings = args.workspace.settings();
    let ops = DockerCli::new(&settings);

    let report = launch_all(&set.repositories, &settings, &ops)
        .context("Launch aborted before any repository was started")?;

    let network_note = match report.network {
        NetworkStatus::Created => format!("Created network {}", settings.network),
        NetworkStatus::AlreadyExists => format!("Using existing network {}", settings.network),
    };
    println!("{}", output.line(Status::Info, network_note));

    if let Some(err) = &report.discovery_error {
        eprintln!(
            "{}",
            output.line(Status::Info, "Some repositories could not be scanned:")
        );
        for line in output.failure_lines(err.failures()) {
            eprintln!("  {}", line);
        }
    }

    for (repo, namespaced) in &report.outcome.succeeded {
        println!(
            "{}",
            output.line(
                Status::Ok,
                format!("Started {} ({})", repo, namespaced.services.join(", "))
            )
        );
    }
    for line in output.failure_lines(&report.outcome.failures) {
        eprintln!("{}", line);
    }

    println!();
    println!(
        "{} started, {} failed in {:.2}s",
        report.outcome.succeeded.len(),
        report.outcome.failures.len(),
        start_time.elapsed().as_secs_f64()
    );

    Ok(())
}
