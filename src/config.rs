//! # Configuration
//!
//! Two kinds of configuration drive a run:
//!
//! - **`RepositorySet`**: the repositories to coordinate and the access token
//!   used to fetch them, loaded once per run from a YAML file such as:
//!
//!   ```yaml
//!   repositories:
//!     - acme/api.git
//!     - acme/web.git
//!   token: ghp_xxx
//!   ```
//!
//! - **`Settings`**: paths and names (download directory, manifest file name,
//!   shared network, external commands). These are passed explicitly into
//!   every component instead of living in process-wide constants.
//!
//! Loading validates the set up front: every identifier must yield a short
//! name, and short names must be unique because they partition the service
//! namespace.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::defaults;
use crate::error::{Error, Result};
use crate::repository::RepositoryRef;

/// On-disk shape of the repository set file.
#[derive(Debug, Deserialize)]
struct RawRepositorySet {
    #[serde(default)]
    repositories: Vec<String>,
    #[serde(default)]
    token: Option<String>,
}

/// The validated, ordered set of repositories for one run.
#[derive(Clone)]
pub struct RepositorySet {
    pub repositories: Vec<RepositoryRef>,
    /// Credential for authenticated fetches. Empty tokens are stored as `None`.
    pub token: Option<String>,
}

impl fmt::Debug for RepositorySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RepositorySet")
            .field("repositories", &self.repositories)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl RepositorySet {
    /// Builds a set from identifiers, applying the same validation as
    /// [`parse`].
    pub fn new<I, S>(ids: I, token: Option<String>) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut repositories = Vec::new();
        let mut seen: HashMap<String, String> = HashMap::new();

        for id in ids {
            let id = id.into();
            let repo = RepositoryRef::new(id.clone()).ok_or_else(|| Error::ConfigParse {
                message: format!("cannot derive a repository name from '{}'", id),
                hint: Some("Use identifiers of the form 'owner/name.git'".to_string()),
            })?;
            if let Some(previous) = seen.insert(repo.short_name().to_string(), id.clone()) {
                return Err(Error::ConfigParse {
                    message: format!(
                        "repositories '{}' and '{}' share the name '{}'",
                        previous,
                        id,
                        repo.short_name()
                    ),
                    hint: Some(
                        "Repository names prefix their services and must be unique".to_string(),
                    ),
                });
            }
            repositories.push(repo);
        }

        if repositories.is_empty() {
            return Err(Error::ConfigParse {
                message: "no repositories listed".to_string(),
                hint: Some("Add entries under 'repositories:'".to_string()),
            });
        }

        Ok(Self {
            repositories,
            token: token.filter(|t| !t.trim().is_empty()),
        })
    }

    pub fn len(&self) -> usize {
        self.repositories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.repositories.is_empty()
    }
}

/// Parses a repository set from YAML text.
pub fn parse(yaml_content: &str) -> Result<RepositorySet> {
    let raw: RawRepositorySet =
        serde_yaml::from_str(yaml_content).map_err(|e| Error::ConfigParse {
            message: e.to_string(),
            hint: None,
        })?;
    RepositorySet::new(raw.repositories, raw.token)
}

/// Loads a repository set from a file.
pub fn from_file<P: AsRef<Path>>(path: P) -> Result<RepositorySet> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| Error::ConfigParse {
        message: format!("cannot read {}: {}", path.display(), e),
        hint: Some("Use -c/--config to point at the repository set file".to_string()),
    })?;
    parse(&content)
}

/// Paths and names shared by every phase of a run.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Directory holding one checkout per repository.
    pub download_dir: PathBuf,
    /// File name of the compose manifest inside each checkout.
    pub manifest_name: String,
    /// Shared network attached to every namespaced service.
    pub network: String,
    /// Compose program and leading arguments, e.g. `["docker", "compose"]`.
    pub compose_command: Vec<String>,
    /// Container engine program used for network management.
    pub docker_command: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            download_dir: PathBuf::from(defaults::DEFAULT_DOWNLOAD_DIR),
            manifest_name: defaults::DEFAULT_MANIFEST_FILENAME.to_string(),
            network: defaults::DEFAULT_NETWORK.to_string(),
            compose_command: split_command(defaults::DEFAULT_COMPOSE_COMMAND),
            docker_command: defaults::DEFAULT_DOCKER_COMMAND.to_string(),
        }
    }
}

impl Settings {
    pub fn with_download_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.download_dir = dir.into();
        self
    }
}

/// Splits a command line such as `docker compose` on whitespace.
pub fn split_command(command: &str) -> Vec<String> {
    command.split_whitespace().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_repository_set() {
        let set = parse(
            r#"
repositories:
  - acme/api.git
  - acme/web.git
token: secret
"#,
        )
        .unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.repositories[0].short_name(), "api");
        assert_eq!(set.repositories[1].id(), "acme/web.git");
        assert_eq!(set.token.as_deref(), Some("secret"));
    }

    #[test]
    fn test_order_is_preserved() {
        let set = RepositorySet::new(["z/zed.git", "a/alpha.git", "m/mid.git"], None).unwrap();
        let names: Vec<_> = set.repositories.iter().map(|r| r.short_name()).collect();
        assert_eq!(names, vec!["zed", "alpha", "mid"]);
    }

    #[test]
    fn test_missing_token_is_none() {
        let set = parse("repositories: [acme/api.git]\n").unwrap();
        assert!(set.token.is_none());
        let set = parse("repositories: [acme/api.git]\ntoken: ''\n").unwrap();
        assert!(set.token.is_none());
    }

    #[test]
    fn test_duplicate_short_names_rejected() {
        let err = parse("repositories: [acme/api.git, other/API]\n").unwrap_err();
        match err {
            Error::ConfigParse { message, .. } => assert!(message.contains("share the name 'api'")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_empty_set_rejected() {
        assert!(matches!(
            parse("repositories: []\n"),
            Err(Error::ConfigParse { .. })
        ));
    }

    #[test]
    fn test_unusable_identifier_rejected() {
        assert!(matches!(
            parse("repositories: ['acme/']\n"),
            Err(Error::ConfigParse { .. })
        ));
    }

    #[test]
    fn test_wrong_shape_rejected() {
        assert!(matches!(
            parse("repositories: acme/api.git\n"),
            Err(Error::ConfigParse { .. })
        ));
    }

    #[test]
    fn test_from_file_missing() {
        let err = from_file("/nonexistent/repos.yaml").unwrap_err();
        assert!(err.to_string().contains("cannot read"));
    }

    #[test]
    fn test_debug_redacts_token() {
        let set = RepositorySet::new(["acme/api.git"], Some("hunter2".to_string())).unwrap();
        let debug = format!("{:?}", set);
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_split_command() {
        assert_eq!(split_command("docker compose"), vec!["docker", "compose"]);
        assert_eq!(split_command("docker-compose"), vec!["docker-compose"]);
    }

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.manifest_name, "docker-compose.yml");
        assert_eq!(settings.network, "common_network");
        assert_eq!(settings.download_dir, PathBuf::from("downloads"));
    }
}
