//! # CLI Command Implementations
//!
//! This module contains the implementation for each subcommand of the
//! `multi-compose` command-line tool. Each subcommand lives in its own file
//! with an `Args` struct derived with `clap` and an `execute` function that
//! calls into the `multi_compose` library.
//!
//! Commands that work on the repository set flatten [`WorkspaceArgs`], which
//! carries the repository set path and the run settings.

pub mod clone;
pub mod completions;
pub mod launch;
pub mod list;
pub mod restore;
pub mod run;

use anyhow::Result;
use clap::Args;
use std::path::{Path, PathBuf};

use multi_compose::config::{self, split_command, RepositorySet, Settings};
use multi_compose::defaults::{
    DEFAULT_COMPOSE_COMMAND, DEFAULT_CONFIG_FILENAME, DEFAULT_DOCKER_COMMAND,
    DEFAULT_DOWNLOAD_DIR, DEFAULT_MANIFEST_FILENAME, DEFAULT_NETWORK,
};

/// Repository set location and run settings shared by most commands.
#[derive(Args, Debug)]
pub struct WorkspaceArgs {
    /// Path to the repository set file.
    #[arg(
        short,
        long,
        value_name = "FILE",
        env = "MULTI_COMPOSE_CONFIG",
        default_value = DEFAULT_CONFIG_FILENAME
    )]
    pub config: PathBuf,

    /// Directory holding one checkout per repository.
    #[arg(
        long,
        value_name = "DIR",
        env = "MULTI_COMPOSE_DOWNLOAD_DIR",
        default_value = DEFAULT_DOWNLOAD_DIR
    )]
    pub download_dir: PathBuf,

    /// Compose manifest file name inside each checkout.
    #[arg(long, value_name = "FILE", default_value = DEFAULT_MANIFEST_FILENAME)]
    pub manifest: String,

    /// Network shared by every namespaced service.
    #[arg(
        long,
        value_name = "NAME",
        env = "MULTI_COMPOSE_NETWORK",
        default_value = DEFAULT_NETWORK
    )]
    pub network: String,

    /// Compose command, e.g. "docker compose".
    #[arg(long, value_name = "CMD", default_value = DEFAULT_COMPOSE_COMMAND)]
    pub compose_command: String,

    /// Container engine command used to create the network.
    #[arg(long, value_name = "CMD", default_value = DEFAULT_DOCKER_COMMAND)]
    pub docker_command: String,
}

impl WorkspaceArgs {
    pub fn settings(&self) -> Settings {
        Settings {
            download_dir: self.download_dir.clone(),
            manifest_name: self.manifest.clone(),
            network: self.network.clone(),
            compose_command: split_command(&self.compose_command),
            docker_command: self.docker_command.clone(),
        }
    }

    /// Loads the repository set. Any failure here is fatal for the run.
    pub fn load(&self) -> Result<RepositorySet> {
        if !self.config.exists() {
            return Err(config_not_found(&self.config));
        }
        config::from_file(&self.config).map_err(|e| {
            anyhow::anyhow!(
                "Failed to load configuration from {}: {}",
                self.config.display(),
                e
            )
        })
    }
}

/// Generate an error for when the repository set file is not found.
pub fn config_not_found(path: &Path) -> anyhow::Error {
    anyhow::anyhow!(
        "Configuration file not found: {path}\n\n\
         hint: Create a repos.yaml listing 'repositories:' and a 'token:'\n\
         hint: Use -c/--config to specify a different path\n\
         hint: Set MULTI_COMPOSE_CONFIG environment variable",
        path = path.display()
    )
}
