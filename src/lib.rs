//! # Multi-Compose Library
//!
//! This library coordinates a set of independently maintained repositories,
//! each with its own docker-compose manifest, into one local multi-service
//! environment. It is used by the `multi-compose` command-line tool.
//!
//! ## Quick Example
//!
//! ```
//! use std::path::Path;
//! use multi_compose::discovery::Inventory;
//! use multi_compose::document::Document;
//! use multi_compose::namespace::Namespacer;
//! use multi_compose::repository::{RepositoryRef, ServiceRecord};
//!
//! let a = RepositoryRef::new("acme/a.git").unwrap();
//! let b = RepositoryRef::new("acme/b.git").unwrap();
//! let inventory = Inventory::from_records(vec![
//!     ServiceRecord::new(a.clone(), "api"),
//!     ServiceRecord::new(b.clone(), "web"),
//! ]);
//!
//! let manifest = Document::parse("services:\n  api:\n    image: api\n", Path::new("a.yml")).unwrap();
//! let rewritten = Namespacer::new(&a, &inventory, "common_network")
//!     .apply(manifest, Path::new("a.yml"))
//!     .unwrap();
//!
//! let api = rewritten.get("services").unwrap().get("a_api").unwrap();
//! assert_eq!(
//!     api.get("environment").unwrap().as_sequence().unwrap()[0].as_str(),
//!     Some("WEB_URL=http://web:port")
//! );
//! ```
//!
//! ## Core Concepts
//!
//! - **Documents (`document`)**: a tagged tree that loads a manifest without
//!   losing fields the engine does not understand.
//! - **Discovery (`discovery`)**: lists the services every repository declares.
//! - **Namespacing (`namespace`)**: renames services to `<repo>_<service>`,
//!   rewrites `depends_on`, injects `<NAME>_URL` variables for peer services,
//!   and attaches the shared network.
//! - **Fan-out (`fanout`)**: runs one task per repository concurrently and
//!   collects successes and failures without letting one repository block
//!   another.
//! - **Runtime (`runtime`, `docker`, `git`)**: the external CLIs behind traits.
//!
//! ## Execution Flow
//!
//! 1.  **Clone**: fetch every repository into the download directory.
//! 2.  **Network**: create the shared network (fatal on failure).
//! 3.  **Discover**: scan every manifest for service names.
//! 4.  **Namespace**: rewrite every manifest against the full inventory.
//! 5.  **Launch**: `compose up -d` in every checkout.

pub mod clone;
pub mod config;
pub mod defaults;
pub mod discovery;
pub mod docker;
pub mod document;
pub mod error;
pub mod fanout;
pub mod git;
pub mod launch;
pub mod manifest;
pub mod namespace;
pub mod output;
pub mod repository;
pub mod runner;
pub mod runtime;

#[cfg(test)]
mod namespace_proptest;
