//! # Service Discovery
//!
//! Discovery reads every repository's compose manifest and collects the
//! service names it declares into one inventory.
//!
//! ## Process
//!
//! 1.  **Scan (`scan_repository`)**: read `<download_dir>/<short>/<manifest>`
//!     (or its pristine copy, once namespaced) and return one `ServiceRecord`
//!     per key of `services`.
//!
//! 2.  **Fan-out (`discover`)**: scan every repository concurrently. A failing
//!     repository never hides another repository's services: the call returns
//!     the partial inventory together with one aggregate error naming every
//!     repository that could not be scanned. Callers decide whether a partial
//!     inventory is good enough.

use log::{debug, info};

use crate::config::Settings;
use crate::document::{Document, Mapping};
use crate::error::{Error, Result};
use crate::fanout;
use crate::manifest::ManifestPaths;
use crate::repository::{RepositoryRef, ServiceRecord};

/// Services discovered across the repository set, sorted by repository and
/// then service name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inventory {
    records: Vec<ServiceRecord>,
}

impl Inventory {
    pub fn from_records(mut records: Vec<ServiceRecord>) -> Self {
        records.sort();
        records.dedup();
        Self { records }
    }

    pub fn records(&self) -> &[ServiceRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Every record whose bare service name is `service`.
    pub fn owners_of<'a>(&'a self, service: &'a str) -> impl Iterator<Item = &'a ServiceRecord> {
        self.records.iter().filter(move |r| r.service == service)
    }

    /// Every record declared by a repository other than `repo`.
    pub fn excluding<'a>(
        &'a self,
        repo: &'a RepositoryRef,
    ) -> impl Iterator<Item = &'a ServiceRecord> {
        self.records.iter().filter(move |r| &r.repository != repo)
    }
}

/// The result of a discovery fan-out.
#[derive(Debug)]
pub struct Discovery {
    /// Services from every repository that scanned successfully.
    pub inventory: Inventory,
    /// Aggregate of every repository that failed, if any did.
    pub error: Option<Error>,
}

impl Discovery {
    /// Fails unless every repository scanned successfully.
    pub fn into_result(self) -> Result<Inventory> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(self.inventory),
        }
    }
}

/// Reads the `services` mapping of a manifest, rejecting any other shape.
pub(crate) fn services_of<'a>(doc: &'a Document, paths: &ManifestPaths) -> Result<&'a Mapping> {
    let root = doc.as_mapping().ok_or_else(|| {
        Error::schema(
            paths.source(),
            format!("manifest must be a mapping, found {}", doc.kind()),
        )
    })?;
    let services = root
        .get("services")
        .ok_or_else(|| Error::schema(paths.source(), "no services found"))?;
    services.as_mapping().ok_or_else(|| {
        Error::schema(
            paths.source(),
            format!("services must be a mapping, found {}", services.kind()),
        )
    })
}

/// Lists the services one repository declares.
pub fn scan_repository(repo: &RepositoryRef, settings: &Settings) -> Result<Vec<ServiceRecord>> {
    let paths = ManifestPaths::new(repo, settings);
    let doc = paths.load()?;
    let services = services_of(&doc, &paths)?;

    debug!(
        "{} declares {} service(s) in {}",
        repo,
        services.len(),
        paths.source().display()
    );

    Ok(services
        .keys()
        .map(|name| ServiceRecord::new(repo.clone(), name.clone()))
        .collect())
}

/// Scans every repository concurrently and merges the results.
///
/// Only a failure to start the fan-out itself is returned as `Err`;
/// per-repository failures are reported through [`Discovery::error`].
pub fn discover(repos: &[RepositoryRef], settings: &Settings) -> Result<Discovery> {
    let outcome = fanout::for_each_repository(repos, |repo| scan_repository(repo, settings))?;
    let (found, error) = outcome.split();

    let inventory = Inventory::from_records(found.into_iter().flat_map(|(_, r)| r).collect());
    info!(
        "Discovered {} service(s) across {} repositories",
        inventory.len(),
        repos.len()
    );

    Ok(Discovery { inventory, error })
}
