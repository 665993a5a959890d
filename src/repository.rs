//! # Repository References
//!
//! A repository is identified by the string written in the repository set
//! (usually `owner/name.git`). Its *short name* is the last path component
//! with the version-control suffix removed, lowercased. The short name names
//! the checkout directory and is the prefix used to namespace its services.

use std::fmt;
use std::path::{Path, PathBuf};

const VCS_SUFFIX: &str = ".git";

/// An entry of the repository set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RepositoryRef {
    id: String,
    short_name: String,
}

impl RepositoryRef {
    /// Builds a reference from an identifier. Returns `None` when no usable
    /// short name can be derived (empty identifier, trailing slash, `.git`).
    pub fn new(id: impl Into<String>) -> Option<Self> {
        let id = id.into();
        let short_name = short_name_of(&id)?;
        Some(Self { id, short_name })
    }

    /// The identifier as written in the repository set.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The namespacing prefix and checkout directory name.
    pub fn short_name(&self) -> &str {
        &self.short_name
    }

    /// The checkout directory for this repository under `base_dir`.
    pub fn checkout_dir(&self, base_dir: &Path) -> PathBuf {
        base_dir.join(&self.short_name)
    }

    /// `<short>_<service>`.
    pub fn namespaced(&self, service: &str) -> String {
        format!("{}_{}", self.short_name, service)
    }
}

impl fmt::Display for RepositoryRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

fn short_name_of(id: &str) -> Option<String> {
    let base = id.trim().rsplit('/').next()?;
    let base = base.strip_suffix(VCS_SUFFIX).unwrap_or(base);
    if base.is_empty() {
        None
    } else {
        Some(base.to_lowercase())
    }
}

/// A service as declared by one repository, before namespacing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ServiceRecord {
    pub repository: RepositoryRef,
    pub service: String,
}

impl ServiceRecord {
    pub fn new(repository: RepositoryRef, service: impl Into<String>) -> Self {
        Self {
            repository,
            service: service.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_name_strips_owner_and_suffix() {
        let repo = RepositoryRef::new("acme/billing-api.git").unwrap();
        assert_eq!(repo.id(), "acme/billing-api.git");
        assert_eq!(repo.short_name(), "billing-api");
    }

    #[test]
    fn test_short_name_without_suffix() {
        let repo = RepositoryRef::new("acme/web").unwrap();
        assert_eq!(repo.short_name(), "web");
    }

    #[test]
    fn test_short_name_is_lowercased() {
        let repo = RepositoryRef::new("Acme/A.git").unwrap();
        assert_eq!(repo.short_name(), "a");
        assert_eq!(repo.namespaced("api"), "a_api");
    }

    #[test]
    fn test_unusable_identifiers() {
        assert!(RepositoryRef::new("").is_none());
        assert!(RepositoryRef::new("acme/").is_none());
        assert!(RepositoryRef::new("acme/.git").is_none());
    }

    #[test]
    fn test_checkout_dir() {
        let repo = RepositoryRef::new("acme/db.git").unwrap();
        assert_eq!(
            repo.checkout_dir(Path::new("downloads")),
            PathBuf::from("downloads/db")
        );
    }

    #[test]
    fn test_records_order_by_repository_then_service() {
        let a = RepositoryRef::new("acme/a.git").unwrap();
        let b = RepositoryRef::new("acme/b.git").unwrap();
        let mut records = vec![
            ServiceRecord::new(b.clone(), "api"),
            ServiceRecord::new(a.clone(), "web"),
            ServiceRecord::new(a.clone(), "db"),
        ];
        records.sort();
        let names: Vec<_> = records
            .iter()
            .map(|r| (r.repository.short_name(), r.service.as_str()))
            .collect();
        assert_eq!(names, vec![("a", "db"), ("a", "web"), ("b", "api")]);
    }
}
