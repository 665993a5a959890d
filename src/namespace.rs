//! # Manifest Namespacing
//!
//! Rewrites one repository's compose manifest so it can run next to every
//! other repository's services without name collisions:
//!
//! - every service `s` is renamed to `<short>_<s>`;
//! - `depends_on` entries are renamed the same way (dependencies are always
//!   local to the repository);
//! - every service receives `<NAME>_URL=http://<service>:port` for each
//!   service declared by *another* repository;
//! - the shared network is declared at the top level and attached to every
//!   service.
//!
//! Fields the engine does not interpret pass through untouched. Services are
//! visited in sorted order, existing list entries keep their positions and
//! synthesized entries are sorted by service name, so the output is the same
//! bytes every time for the same input.
//!
//! Peer URLs are appended after a service's own environment entries, so a
//! peer URL wins over a value the service sets for the same variable.
//!
//! Rewriting is repeatable: the engine never attaches the shared network twice
//! and never appends a peer entry the service already carries verbatim, and
//! [`namespace_repository`] always starts from the pristine manifest (see
//! [`crate::manifest`]).
//!
//! The URL port is the literal placeholder `port`; nothing resolves it to a
//! published port.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use log::{debug, info, warn};

use crate::config::Settings;
use crate::defaults::PORT_PLACEHOLDER;
use crate::discovery::Inventory;
use crate::document::{Document, Mapping};
use crate::error::{Error, Result};
use crate::manifest::ManifestPaths;
use crate::repository::RepositoryRef;

/// Environment variable name peers use to find `service`.
pub fn url_variable(service: &str) -> String {
    format!("{}_URL", service.replace('-', "_").to_uppercase())
}

/// `NAME=http://<service>:port`.
pub fn url_entry(service: &str) -> String {
    format!(
        "{}=http://{}:{}",
        url_variable(service),
        service,
        PORT_PLACEHOLDER
    )
}

/// Rewrites manifests for one repository against a fixed inventory.
#[derive(Debug)]
pub struct Namespacer<'a> {
    repo: &'a RepositoryRef,
    network: &'a str,
    /// `NAME=URL` for every peer service, sorted by service name.
    peers: Vec<String>,
}

impl<'a> Namespacer<'a> {
    pub fn new(repo: &'a RepositoryRef, inventory: &Inventory, network: &'a str) -> Self {
        let mut services: Vec<&str> = inventory
            .excluding(repo)
            .map(|r| r.service.as_str())
            .collect();
        services.sort_unstable();

        let mut seen = HashSet::new();
        let peers = services
            .into_iter()
            .filter(|service| seen.insert(url_variable(service)))
            .map(url_entry)
            .collect();

        Self {
            repo,
            network,
            peers,
        }
    }

    /// Rewrites a whole manifest. `origin` is only used in error messages.
    pub fn apply(&self, doc: Document, origin: &Path) -> Result<Document> {
        let mut root = match doc {
            Document::Mapping(root) => root,
            other => {
                return Err(Error::schema(
                    origin,
                    format!("manifest must be a mapping, found {}", other.kind()),
                ))
            }
        };

        let services = match root.remove("services") {
            Some(Document::Mapping(services)) => services,
            Some(other) => {
                return Err(Error::schema(
                    origin,
                    format!("services must be a mapping, found {}", other.kind()),
                ))
            }
            None => return Err(Error::schema(origin, "no services found")),
        };

        let mut renamed = Mapping::new();
        for (name, definition) in services {
            let definition = match definition {
                Document::Mapping(definition) => definition,
                other => {
                    return Err(Error::schema(
                        origin,
                        format!("services.{} must be a mapping, found {}", name, other.kind()),
                    ))
                }
            };
            let rewritten = self.rewrite_service(&name, definition, origin)?;
            renamed.insert(self.repo.namespaced(&name), Document::Mapping(rewritten));
        }

        self.declare_network(&mut root, origin)?;
        root.insert("services".to_string(), Document::Mapping(renamed));
        Ok(Document::Mapping(root))
    }

    fn rewrite_service(&self, name: &str, mut service: Mapping, origin: &Path) -> Result<Mapping> {
        if let Some(deps) = service.get_mut("depends_on") {
            self.rewrite_depends_on(name, deps, origin)?;
        }
        self.add_peer_environment(name, &mut service, origin)?;
        self.attach_network(name, &mut service, origin)?;
        Ok(service)
    }

    fn rewrite_depends_on(&self, name: &str, deps: &mut Document, origin: &Path) -> Result<()> {
        let entries = match deps {
            Document::Null => return Ok(()),
            Document::Sequence(entries) => entries,
            other => {
                return Err(Error::schema(
                    origin,
                    format!(
                        "services.{}.depends_on must be a sequence of service names, found {}",
                        name,
                        other.kind()
                    ),
                ))
            }
        };

        for entry in entries.iter_mut() {
            let target = entry.as_str().ok_or_else(|| {
                Error::schema(
                    origin,
                    format!(
                        "services.{}.depends_on entries must be strings, found {}",
                        name,
                        entry.kind()
                    ),
                )
            })?;
            *entry = Document::String(self.repo.namespaced(target));
        }
        Ok(())
    }

    fn add_peer_environment(&self, name: &str, service: &mut Mapping, origin: &Path) -> Result<()> {
        let written = service.get("environment").cloned();
        let environment = service
            .entry("environment".to_string())
            .or_insert(Document::Null);
        if environment.is_null() {
            *environment = Document::Sequence(Vec::new());
        }

        let entries = match environment {
            Document::Sequence(entries) => entries,
            Document::Mapping(_) => {
                return Err(Error::schema(
                    origin,
                    format!(
                        "services.{}.environment uses the mapping form, which is not supported; \
                         use a list of NAME=VALUE entries",
                        name
                    ),
                ))
            }
            other => {
                return Err(Error::schema(
                    origin,
                    format!(
                        "services.{}.environment must be a sequence, found {}",
                        name,
                        other.kind()
                    ),
                ))
            }
        };

        let mut present = HashSet::new();
        for entry in entries.iter() {
            let text = entry.as_str().ok_or_else(|| {
                Error::schema(
                    origin,
                    format!(
                        "services.{}.environment entries must be strings, found {}",
                        name,
                        entry.kind()
                    ),
                )
            })?;
            present.insert(text.to_string());
        }

        // Appended after the service's own entries, so on a shared NAME the
        // peer URL is the one compose uses.
        for entry in &self.peers {
            if !present.contains(entry) {
                entries.push(Document::String(entry.clone()));
            }
        }

        if entries.is_empty() {
            match written {
                None => {
                    service.remove("environment");
                }
                Some(original) => {
                    service.insert("environment".to_string(), original);
                }
            }
        }
        Ok(())
    }

    fn attach_network(&self, name: &str, service: &mut Mapping, origin: &Path) -> Result<()> {
        let networks = service
            .entry("networks".to_string())
            .or_insert(Document::Null);
        if networks.is_null() {
            *networks = Document::Sequence(Vec::new());
        }

        let entries = match networks {
            Document::Sequence(entries) => entries,
            other => {
                return Err(Error::schema(
                    origin,
                    format!(
                        "services.{}.networks must be a sequence, found {}",
                        name,
                        other.kind()
                    ),
                ))
            }
        };

        let mut attached = false;
        for entry in entries.iter() {
            let network = entry.as_str().ok_or_else(|| {
                Error::schema(
                    origin,
                    format!(
                        "services.{}.networks entries must be strings, found {}",
                        name,
                        entry.kind()
                    ),
                )
            })?;
            attached |= network == self.network;
        }
        if !attached {
            entries.push(Document::from(self.network));
        }
        Ok(())
    }

    fn declare_network(&self, root: &mut Mapping, origin: &Path) -> Result<()> {
        let networks = root
            .entry("networks".to_string())
            .or_insert(Document::Null);
        if networks.is_null() {
            *networks = Document::Mapping(Mapping::new());
        }

        let kind = networks.kind();
        let declared = networks.as_mapping_mut().ok_or_else(|| {
            Error::schema(origin, format!("networks must be a mapping, found {}", kind))
        })?;
        declared
            .entry(self.network.to_string())
            .or_insert(Document::Null);
        Ok(())
    }
}

/// Services in an already-namespaced live manifest that lack the repository
/// prefix. A non-empty result means the live file was replaced after the last
/// rewrite, for example by a pull. Unreadable live files count as unchanged.
pub fn unprefixed_live_services(repo: &RepositoryRef, paths: &ManifestPaths) -> Vec<String> {
    if !paths.is_namespaced() {
        return Vec::new();
    }
    let live = match fs::read_to_string(paths.live())
        .ok()
        .and_then(|content| Document::parse(&content, paths.live()).ok())
    {
        Some(live) => live,
        None => return Vec::new(),
    };

    let prefix = repo.namespaced("");
    live.get("services")
        .and_then(Document::as_mapping)
        .map(|services| {
            services
                .keys()
                .filter(|name| !name.starts_with(&prefix))
                .cloned()
                .collect()
        })
        .unwrap_or_default()
}

/// A manifest that has been rewritten and written back.
#[derive(Debug, Clone)]
pub struct Namespaced {
    pub paths: ManifestPaths,
    /// Namespaced service names, sorted.
    pub services: Vec<String>,
}

/// Loads, rewrites, and persists one repository's manifest.
///
/// The manifest is transformed entirely in memory first; nothing is written
/// if any part of it fails validation.
pub fn namespace_repository(
    repo: &RepositoryRef,
    inventory: &Inventory,
    settings: &Settings,
) -> Result<Namespaced> {
    let paths = ManifestPaths::new(repo, settings);
    let replaced = unprefixed_live_services(repo, &paths);
    if !replaced.is_empty() {
        warn!(
            "{} has changed since it was namespaced (service(s) {} are not prefixed); \
             these edits are ignored in favour of {}. Run 'multi-compose restore' first to pick them up",
            paths.live().display(),
            replaced.join(", "),
            paths.pristine().display()
        );
    }
    let doc = paths.load()?;

    let rewritten = Namespacer::new(repo, inventory, &settings.network).apply(doc, paths.source())?;
    let services: Vec<String> = rewritten
        .get("services")
        .and_then(Document::as_mapping)
        .map(|s| s.keys().cloned().collect())
        .unwrap_or_default();

    let rendered = rewritten.to_yaml_string()?;
    paths.persist(&rendered)?;

    debug!("Rewrote {}", paths.live().display());
    info!("Namespaced {} service(s) for {}", services.len(), repo);

    Ok(Namespaced { paths, services })
}
