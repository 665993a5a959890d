//! # Manifest Files
//!
//! Every repository checkout carries one compose manifest. Namespacing rewrites
//! it in place, so the first rewrite keeps a byte-for-byte pristine copy next to
//! it (`docker-compose.yml` -> `docker-compose.orig.yml`). Every later read goes
//! through [`ManifestPaths::source`], which prefers the pristine copy. A second
//! run therefore starts again from the repository's own declarations instead of
//! re-prefixing already-namespaced services.

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

use crate::config::Settings;
use crate::document::Document;
use crate::error::{Error, Result};
use crate::fanout::{self, Outcome};
use crate::repository::RepositoryRef;

const PRISTINE_MARKER: &str = "orig";

/// Locations of one repository's live and pristine manifests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestPaths {
    live: PathBuf,
    pristine: PathBuf,
}

impl ManifestPaths {
    pub fn new(repo: &RepositoryRef, settings: &Settings) -> Self {
        let dir = repo.checkout_dir(&settings.download_dir);
        Self::in_dir(&dir, &settings.manifest_name)
    }

    pub fn in_dir(dir: &Path, manifest_name: &str) -> Self {
        let live = dir.join(manifest_name);
        let pristine = dir.join(pristine_name(manifest_name));
        Self { live, pristine }
    }

    /// The manifest compose reads.
    pub fn live(&self) -> &Path {
        &self.live
    }

    /// The untouched copy saved before the first rewrite.
    pub fn pristine(&self) -> &Path {
        &self.pristine
    }

    /// Whether the live manifest has already been rewritten.
    pub fn is_namespaced(&self) -> bool {
        self.pristine.is_file()
    }

    /// The manifest holding the repository's own declarations.
    pub fn source(&self) -> &Path {
        if self.is_namespaced() {
            &self.pristine
        } else {
            &self.live
        }
    }

    /// Reads and parses the source manifest.
    pub fn load(&self) -> Result<Document> {
        let path = self.source();
        if !path.is_file() {
            return Err(Error::NotFound {
                path: self.live.clone(),
            });
        }
        let content = fs::read_to_string(path)?;
        Document::parse(&content, path)
    }

    /// Writes a rewritten manifest over the live file, saving the pristine
    /// copy first if this is the first rewrite.
    pub fn persist(&self, rendered: &str) -> Result<()> {
        if !self.is_namespaced() {
            debug!(
                "Saving pristine manifest {} -> {}",
                self.live.display(),
                self.pristine.display()
            );
            fs::copy(&self.live, &self.pristine)?;
        }
        fs::write(&self.live, rendered)?;
        Ok(())
    }

    /// Puts the pristine manifest back. Returns `false` when there was
    /// nothing to restore.
    pub fn restore(&self) -> Result<bool> {
        if !self.is_namespaced() {
            return Ok(false);
        }
        fs::copy(&self.pristine, &self.live)?;
        fs::remove_file(&self.pristine)?;
        Ok(true)
    }
}

/// Restores the pristine manifest of every repository that has one.
pub fn restore_all(repos: &[RepositoryRef], settings: &Settings) -> Result<Outcome<bool>> {
    fanout::for_each_repository(repos, |repo| ManifestPaths::new(repo, settings).restore())
}

fn pristine_name(manifest_name: &str) -> String {
    let path = Path::new(manifest_name);
    match (
        path.file_stem().and_then(|s| s.to_str()),
        path.extension().and_then(|s| s.to_str()),
    ) {
        (Some(stem), Some(ext)) => format!("{}.{}.{}", stem, PRISTINE_MARKER, ext),
        _ => format!("{}.{}", manifest_name, PRISTINE_MARKER),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_pristine_name() {
        assert_eq!(pristine_name("docker-compose.yml"), "docker-compose.orig.yml");
        assert_eq!(pristine_name("compose.yaml"), "compose.orig.yaml");
        assert_eq!(pristine_name("Composefile"), "Composefile.orig");
    }

    #[test]
    fn test_paths_follow_settings() {
        let repo = RepositoryRef::new("acme/api.git").unwrap();
        let settings = Settings::default().with_download_dir("/srv/checkouts");
        let paths = ManifestPaths::new(&repo, &settings);
        assert_eq!(paths.live(), Path::new("/srv/checkouts/api/docker-compose.yml"));
        assert_eq!(
            paths.pristine(),
            Path::new("/srv/checkouts/api/docker-compose.orig.yml")
        );
    }

    #[test]
    fn test_load_missing_is_not_found() {
        let temp = TempDir::new().unwrap();
        let paths = ManifestPaths::in_dir(temp.path(), "docker-compose.yml");
        assert!(matches!(paths.load(), Err(Error::NotFound { .. })));
    }

    #[test]
    fn test_persist_keeps_pristine_copy_once() {
        let temp = TempDir::new().unwrap();
        let paths = ManifestPaths::in_dir(temp.path(), "docker-compose.yml");
        fs::write(paths.live(), "services:\n  api: {}\n").unwrap();

        paths.persist("first\n").unwrap();
        assert!(paths.is_namespaced());
        assert_eq!(fs::read_to_string(paths.pristine()).unwrap(), "services:\n  api: {}\n");
        assert_eq!(fs::read_to_string(paths.live()).unwrap(), "first\n");

        paths.persist("second\n").unwrap();
        assert_eq!(fs::read_to_string(paths.pristine()).unwrap(), "services:\n  api: {}\n");
        assert_eq!(fs::read_to_string(paths.live()).unwrap(), "second\n");
    }

    #[test]
    fn test_load_prefers_pristine() {
        let temp = TempDir::new().unwrap();
        let paths = ManifestPaths::in_dir(temp.path(), "docker-compose.yml");
        fs::write(paths.live(), "services:\n  api: {}\n").unwrap();
        paths.persist("services:\n  x_api: {}\n").unwrap();

        assert_eq!(paths.source(), paths.pristine());
        let doc = paths.load().unwrap();
        assert!(doc.get("services").unwrap().get("api").is_some());
    }

    #[test]
    fn test_restore_all() {
        let temp = TempDir::new().unwrap();
        let settings = Settings::default().with_download_dir(temp.path());
        let a = RepositoryRef::new("x/a.git").unwrap();
        let b = RepositoryRef::new("x/b.git").unwrap();
        for repo in [&a, &b] {
            let dir = repo.checkout_dir(temp.path());
            fs::create_dir_all(&dir).unwrap();
            fs::write(dir.join("docker-compose.yml"), "services: {}\n").unwrap();
        }
        ManifestPaths::new(&a, &settings).persist("rewritten\n").unwrap();

        let outcome = restore_all(&[a, b], &settings).unwrap();
        let restored: Vec<_> = outcome.succeeded.iter().map(|(_, r)| *r).collect();
        assert_eq!(restored, vec![true, false]);
    }

    #[test]
    fn test_restore() {
        let temp = TempDir::new().unwrap();
        let paths = ManifestPaths::in_dir(temp.path(), "docker-compose.yml");
        fs::write(paths.live(), "original\n").unwrap();
        assert!(!paths.restore().unwrap());

        paths.persist("rewritten\n").unwrap();
        assert!(paths.restore().unwrap());
        assert_eq!(fs::read_to_string(paths.live()).unwrap(), "original\n");
        assert!(!paths.pristine().exists());
    }
}
