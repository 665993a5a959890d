//! # Target Service Runner
//!
//! Starts a single service by its bare name. The same bare name may be
//! declared by several repositories; the service is started in every one of
//! them. Once a checkout has been namespaced its live manifest only knows the
//! prefixed name, so that is what gets passed to compose.

use log::{error, info, warn};

use crate::config::Settings;
use crate::discovery;
use crate::error::{Error, Result};
use crate::fanout::{self, Outcome};
use crate::manifest::ManifestPaths;
use crate::repository::RepositoryRef;
use crate::runtime::ContainerOperations;

/// Compose service name to start for `service` in `repo`.
pub fn compose_service_name(repo: &RepositoryRef, service: &str, settings: &Settings) -> String {
    if ManifestPaths::new(repo, settings).is_namespaced() {
        repo.namespaced(service)
    } else {
        service.to_string()
    }
}

/// Starts `service` in every repository that declares it.
///
/// Discovery must succeed for every repository; after that, a failure to
/// start the service in one repository is logged and reported in the
/// returned outcome without affecting the others. Each successful entry
/// carries the compose service name that was started.
pub fn run_service(
    repos: &[RepositoryRef],
    settings: &Settings,
    ops: &dyn ContainerOperations,
    service: &str,
) -> Result<Outcome<String>> {
    if service.trim().is_empty() {
        return Err(Error::ConfigParse {
            message: "a service name is required".to_string(),
            hint: Some("Run 'multi-compose list-services' to see what is available".to_string()),
        });
    }

    let inventory = discovery::discover(repos, settings)?.into_result()?;
    let owners: Vec<RepositoryRef> = inventory
        .owners_of(service)
        .map(|record| record.repository.clone())
        .collect();

    if owners.is_empty() {
        warn!("No repository declares a service named '{}'", service);
        return Ok(Outcome::default());
    }

    fanout::for_each_repository(&owners, |repo| {
        let name = compose_service_name(repo, service, settings);
        info!("Starting service '{}' in {}", name, repo);
        match ops.compose_up(&repo.checkout_dir(&settings.download_dir), Some(name.as_str())) {
            Ok(()) => Ok(name),
            Err(e) => {
                error!("Failed to run service '{}' in {}: {}", service, repo, e);
                Err(e)
            }
        }
    })
}
