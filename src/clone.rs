//! # Repository Acquisition
//!
//! Clones every repository of the set into `<download_dir>/<short name>`
//! concurrently. Checkouts that already exist are left alone. The access
//! token is embedded in the clone URL, so it is scrubbed from every message
//! that leaves this module.

use std::fs;

use log::{error, info};

use crate::config::{RepositorySet, Settings};
use crate::error::{Error, Result};
use crate::fanout::{self, Outcome};
use crate::git;
use crate::runtime::GitOperations;

/// Result of acquiring one repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloneStatus {
    Cloned,
    AlreadyPresent,
}

fn redact_error(err: Error, token: Option<&str>) -> Error {
    match err {
        Error::Process { command, message } => Error::Process {
            command: git::redact(&command, token),
            message: git::redact(&message, token),
        },
        other => other,
    }
}

/// Clones every repository that is not already checked out.
pub fn clone_all(
    set: &RepositorySet,
    settings: &Settings,
    git_ops: &dyn GitOperations,
) -> Result<Outcome<CloneStatus>> {
    fs::create_dir_all(&settings.download_dir)?;
    let token = set.token.as_deref();

    fanout::for_each_repository(&set.repositories, |repo| {
        let target = repo.checkout_dir(&settings.download_dir);
        if target.exists() {
            info!("{} already present at {}", repo, target.display());
            return Ok(CloneStatus::AlreadyPresent);
        }

        info!("Cloning repository: {}", repo);
        let url = git::clone_url(repo.id(), token);
        match git_ops.clone_repo(&url, &target) {
            Ok(()) => {
                info!("Repository cloned: {}", repo);
                Ok(CloneStatus::Cloned)
            }
            Err(e) => {
                let e = redact_error(e, token);
                error!("Failed to clone repository {}: {}", repo, e);
                Err(e)
            }
        }
    })
}
