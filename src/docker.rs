//! Thin wrappers around the container engine and compose CLIs.
//!
//! Each call is one blocking process invocation with no timeout and no retry.
//! Output is captured and folded into the error on failure.

use std::path::Path;
use std::process::{Command, Output};

use log::debug;

use crate::error::{Error, Result};

/// Result of ensuring the shared network exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkStatus {
    Created,
    AlreadyExists,
}

/// `docker network create <name>`, treating "already exists" as success.
pub fn create_network(docker: &str, name: &str) -> Result<NetworkStatus> {
    let display = format!("{} network create {}", docker, name);
    let output = spawn(Command::new(docker).args(["network", "create", name]), &display)?;

    if output.status.success() {
        return Ok(NetworkStatus::Created);
    }

    let combined = combined_output(&output);
    if combined.contains("already exists") {
        return Ok(NetworkStatus::AlreadyExists);
    }

    Err(Error::Process {
        command: display,
        message: format!("{}: {}", output.status, combined.trim()),
    })
}

/// `<compose> up -d [service]` inside `project_dir`.
pub fn compose_up(compose: &[String], project_dir: &Path, service: Option<&str>) -> Result<()> {
    let (program, leading) = compose.split_first().ok_or_else(|| Error::Process {
        command: String::new(),
        message: "no compose command configured".to_string(),
    })?;

    let mut args: Vec<&str> = leading.iter().map(String::as_str).collect();
    args.extend(["up", "-d"]);
    args.extend(service);

    let display = format!("{} {}", program, args.join(" "));
    let output = spawn(
        Command::new(program).args(&args).current_dir(project_dir),
        &display,
    )?;

    if !output.status.success() {
        return Err(Error::Process {
            command: display,
            message: format!("{}: {}", output.status, combined_output(&output).trim()),
        });
    }
    Ok(())
}

fn spawn(command: &mut Command, display: &str) -> Result<Output> {
    debug!("Running `{}`", display);
    command.output().map_err(|e| Error::Process {
        command: display.to_string(),
        message: e.to_string(),
    })
}

fn combined_output(output: &Output) -> String {
    let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
    text.push_str(&String::from_utf8_lossy(&output.stderr));
    text
}
