//! # External Collaborators
//!
//! The phases never spawn processes directly. They go through two traits:
//!
//! - **`ContainerOperations`**: shared network creation and `compose up`.
//! - **`GitOperations`**: fetching a repository into a local directory.
//!
//! `DockerCli` and `SystemGit` are the process-backed implementations used by
//! the binary. Tests swap in recording mocks so the phases can be exercised
//! without a container engine or network access.

use std::path::Path;

use crate::config::Settings;
use crate::docker::{self, NetworkStatus};
use crate::error::Result;

/// Container engine and compose operations.
pub trait ContainerOperations: Send + Sync {
    /// Creates the named network. An existing network is not an error.
    fn create_network(&self, name: &str) -> Result<NetworkStatus>;

    /// Starts the project in `project_dir` detached, optionally limited to
    /// one service.
    fn compose_up(&self, project_dir: &Path, service: Option<&str>) -> Result<()>;
}

/// Trait for git operations - allows mocking in tests
pub trait GitOperations: Send + Sync {
    /// Clones `url` into `target_dir`.
    fn clone_repo(&self, url: &str, target_dir: &Path) -> Result<()>;
}

/// `ContainerOperations` backed by the `docker` and compose CLIs.
#[derive(Debug, Clone)]
pub struct DockerCli {
    docker: String,
    compose: Vec<String>,
}

impl DockerCli {
    pub fn new(settings: &Settings) -> Self {
        Self {
            docker: settings.docker_command.clone(),
            compose: settings.compose_command.clone(),
        }
    }
}

impl ContainerOperations for DockerCli {
    fn create_network(&self, name: &str) -> Result<NetworkStatus> {
        docker::create_network(&self.docker, name)
    }

    fn compose_up(&self, project_dir: &Path, service: Option<&str>) -> Result<()> {
        docker::compose_up(&self.compose, project_dir, service)
    }
}

/// `GitOperations` backed by the system `git` command.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemGit;

impl GitOperations for SystemGit {
    fn clone_repo(&self, url: &str, target_dir: &Path) -> Result<()> {
        crate::git::clone(url, target_dir)
    }
}
