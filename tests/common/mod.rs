//! Shared test utilities for the end-to-end tests.
//!
//! ## Usage
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = Workspace::new()
//!         .with_repositories(&["acme/api.git"])
//!         .with_manifest("api", "services:\n  api: {}\n");
//!     fixture.command("list-services").assert().success();
//! }
//! ```

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use assert_fs::prelude::*;
use assert_fs::TempDir;
use std::path::PathBuf;

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    pub use super::Workspace;
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    pub use predicates::prelude::*;
}

/// A temporary directory holding a repository set file and a download
/// directory with one checkout per repository.
pub struct Workspace {
    pub temp: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        let temp = TempDir::new().unwrap();
        temp.child("downloads").create_dir_all().unwrap();
        Self { temp }
    }

    /// Writes `repos.yaml` listing `ids`.
    pub fn with_repositories(self, ids: &[&str]) -> Self {
        let mut yaml = String::from("repositories:");
        if ids.is_empty() {
            yaml.push_str(" []");
        }
        yaml.push('\n');
        for id in ids {
            yaml.push_str(&format!("  - {}\n", id));
        }
        yaml.push_str("token: test-token\n");
        self.temp.child("repos.yaml").write_str(&yaml).unwrap();
        self
    }

    /// Writes `downloads/<short>/docker-compose.yml`.
    pub fn with_manifest(self, short: &str, content: &str) -> Self {
        self.temp
            .child("downloads")
            .child(short)
            .child("docker-compose.yml")
            .write_str(content)
            .unwrap();
        self
    }

    pub fn config_path(&self) -> PathBuf {
        self.temp.child("repos.yaml").path().to_path_buf()
    }

    pub fn download_dir(&self) -> PathBuf {
        self.temp.child("downloads").path().to_path_buf()
    }

    pub fn manifest(&self, short: &str) -> PathBuf {
        self.download_dir().join(short).join("docker-compose.yml")
    }

    /// The binary with `--config` and `--download-dir` pointing into this
    /// workspace, colours off, and logging quiet.
    pub fn command(&self, subcommand: &str) -> Command {
        let mut cmd = cargo_bin_cmd!("multi-compose");
        cmd.current_dir(self.temp.path())
            .env_remove("MULTI_COMPOSE_CONFIG")
            .env_remove("MULTI_COMPOSE_DOWNLOAD_DIR")
            .env_remove("MULTI_COMPOSE_NETWORK")
            .arg(subcommand)
            .arg("--color")
            .arg("never")
            .arg("--log-level")
            .arg("error")
            .arg("--config")
            .arg(self.config_path())
            .arg("--download-dir")
            .arg(self.download_dir());
        cmd
    }
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new()
    }
}
