//! # Launch
//!
//! `launch_all` brings the whole repository set up on one shared network:
//!
//! 1.  **Network**: create the shared network once. "Already exists" counts
//!     as success; any other failure aborts the run before any repository is
//!     touched.
//! 2.  **Discovery**: build a fresh inventory. Repositories that cannot be
//!     scanned are reported, and the rest still launch with the partial
//!     inventory.
//! 3.  **Fan-out**: for every repository concurrently, namespace and persist
//!     its manifest, then run `compose up -d` in its checkout. A failure is
//!     logged against that repository and never cancels its siblings.

use log::{error, info, warn};

use crate::config::Settings;
use crate::discovery::{self, Inventory};
use crate::docker::NetworkStatus;
use crate::error::{Error, Result};
use crate::fanout::{self, Outcome};
use crate::namespace::{namespace_repository, Namespaced};
use crate::repository::RepositoryRef;
use crate::runtime::ContainerOperations;

/// What happened during `launch_all`.
#[derive(Debug)]
pub struct LaunchReport {
    pub network: NetworkStatus,
    /// Aggregate of repositories whose manifests could not be scanned.
    pub discovery_error: Option<Error>,
    /// Per-repository launch results.
    pub outcome: Outcome<Namespaced>,
}

/// Creates the shared network, tolerating an existing one.
pub fn ensure_network(ops: &dyn ContainerOperations, network: &str) -> Result<NetworkStatus> {
    let status = ops.create_network(network)?;
    match status {
        NetworkStatus::Created => info!("Created network {}", network),
        NetworkStatus::AlreadyExists => info!("Network {} already exists", network),
    }
    Ok(status)
}

/// Namespaces one repository and starts it.
pub fn launch_repository(
    repo: &RepositoryRef,
    inventory: &Inventory,
    settings: &Settings,
    ops: &dyn ContainerOperations,
) -> Result<Namespaced> {
    let namespaced = namespace_repository(repo, inventory, settings)?;
    ops.compose_up(&repo.checkout_dir(&settings.download_dir), None)?;
    Ok(namespaced)
}

/// Namespaces and starts every repository.
///
/// Returns `Err` only for the fatal cases: the shared network could not be
/// created, or the fan-out could not start.
pub fn launch_all(
    repos: &[RepositoryRef],
    settings: &Settings,
    ops: &dyn ContainerOperations,
) -> Result<LaunchReport> {
    let network = ensure_network(ops, &settings.network)?;

    let discovery = discovery::discover(repos, settings)?;
    if let Some(err) = &discovery.error {
        warn!("Launching with a partial service inventory: {}", err);
    }
    let inventory = discovery.inventory;

    let outcome = fanout::for_each_repository(repos, |repo| {
        match launch_repository(repo, &inventory, settings, ops) {
            Ok(namespaced) => {
                info!("Started {} ({} services)", repo, namespaced.services.len());
                Ok(namespaced)
            }
            Err(e) => {
                error!("Failed to launch {}: {}", repo, e);
                Err(e)
            }
        }
    })?;

    Ok(LaunchReport {
        network,
        discovery_error: discovery.error,
        outcome,
    })
}
