//! # Error Handling
//!
//! This module defines the centralized error type for `multi-compose`. It uses
//! `thiserror` to build a single `Error` enum covering every failure a phase
//! can produce, so that per-repository failures can be collected, attributed,
//! and reported together.
//!
//! ## Taxonomy
//!
//! - **`NotFound`**: an expected file (usually a compose manifest) is absent.
//! - **`Parse`**: a structured document could not be parsed.
//! - **`Schema`**: a document parsed, but its shape violates the recognized
//!   contract (wrong field types, map-style `environment`, and so on).
//! - **`Process`**: an external command exited non-zero or could not be spawned.
//! - **`Aggregate`**: the joined failures of one fan-out phase, one entry per
//!   failing repository.
//!
//! Configuration problems are reported through `ConfigParse`, which is always
//! fatal for the run.

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Main error type for multi-compose operations
#[derive(Error, Debug)]
pub enum Error {
    /// An expected file or resource does not exist.
    #[error("Not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// A structured document could not be parsed.
    #[error("Parse error in {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    /// A document is well-formed but does not have the expected shape.
    #[error("Schema error in {}: {message}", path.display())]
    Schema { path: PathBuf, message: String },

    /// An external command failed to start or exited unsuccessfully.
    #[error("Command `{command}` failed: {message}")]
    Process { command: String, message: String },

    /// The repository set file is missing, malformed, or inconsistent.
    #[error("Configuration error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    ConfigParse {
        message: String,
        /// Optional hint for how to fix the configuration issue
        hint: Option<String>,
    },

    /// Every failure from one fan-out phase.
    #[error("{}", render_failures(failures))]
    Aggregate { failures: Vec<RepoFailure> },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A YAML error, wrapped from `serde_yaml::Error`.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The worker pool for a fan-out phase could not be created.
    #[error("Thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl Error {
    pub(crate) fn schema(path: &Path, message: impl Into<String>) -> Self {
        Error::Schema {
            path: path.to_path_buf(),
            message: message.into(),
        }
    }

    pub(crate) fn parse(path: &Path, message: impl Into<String>) -> Self {
        Error::Parse {
            path: path.to_path_buf(),
            message: message.into(),
        }
    }

    /// Returns the per-repository failures when this is an aggregate.
    pub fn failures(&self) -> &[RepoFailure] {
        match self {
            Error::Aggregate { failures } => failures,
            _ => &[],
        }
    }
}

/// One repository's failure inside a fan-out phase.
#[derive(Debug)]
pub struct RepoFailure {
    /// The repository identifier as written in the repository set.
    pub repository: String,
    pub error: Error,
}

impl fmt::Display for RepoFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.repository, self.error)
    }
}

fn render_failures(failures: &[RepoFailure]) -> String {
    let mut out = match failures.len() {
        1 => "1 repository failed:".to_string(),
        n => format!("{} repositories failed:", n),
    };
    for failure in failures {
        out.push_str("\n  - ");
        out.push_str(&failure.to_string());
    }
    out
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
