//! # Per-Repository Fan-out
//!
//! Every phase (clone, discovery, launch) runs the same operation once per
//! repository, concurrently, with failures isolated to the repository that
//! produced them. This module is the task group those phases share.
//!
//! Each phase gets its own `rayon` pool sized to the repository count, so the
//! fan-out width is the number of repositories: tasks spend most of their time
//! blocked on external processes and would otherwise queue behind each other on
//! a CPU-sized pool. Results come back in submission order regardless of which
//! task finished first.

use log::debug;
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;

use crate::error::{Error, RepoFailure, Result};
use crate::repository::RepositoryRef;

/// The joined result of one phase.
#[derive(Debug)]
pub struct Outcome<T> {
    /// Successful repositories with their values, in submission order.
    pub succeeded: Vec<(RepositoryRef, T)>,
    /// Failing repositories with their errors, in submission order.
    pub failures: Vec<RepoFailure>,
}

impl<T> Default for Outcome<T> {
    fn default() -> Self {
        Self {
            succeeded: Vec::new(),
            failures: Vec::new(),
        }
    }
}

impl<T> Outcome<T> {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Splits into the successful values and, if anything failed, one
    /// aggregate error describing every failure.
    pub fn split(self) -> (Vec<(RepositoryRef, T)>, Option<Error>) {
        let error = if self.failures.is_empty() {
            None
        } else {
            Some(Error::Aggregate {
                failures: self.failures,
            })
        };
        (self.succeeded, error)
    }

    /// Fails with the aggregate error if any repository failed.
    pub fn into_result(self) -> Result<Vec<(RepositoryRef, T)>> {
        match self.split() {
            (values, None) => Ok(values),
            (_, Some(err)) => Err(err),
        }
    }
}

/// Runs `task` once per repository concurrently and waits for all of them.
///
/// Only building the worker pool can fail the call itself; task errors are
/// collected into the returned [`Outcome`].
pub fn for_each_repository<T, F>(repos: &[RepositoryRef], task: F) -> Result<Outcome<T>>
where
    T: Send,
    F: Fn(&RepositoryRef) -> Result<T> + Sync,
{
    if repos.is_empty() {
        return Ok(Outcome::default());
    }

    let pool = ThreadPoolBuilder::new()
        .num_threads(repos.len())
        .thread_name(|i| format!("repo-worker-{}", i))
        .build()?;

    debug!("Fanning out over {} repositories", repos.len());

    let results: Vec<(&RepositoryRef, Result<T>)> = pool.install(|| {
        repos
            .par_iter()
            .with_max_len(1)
            .map(|repo| (repo, task(repo)))
            .collect()
    });

    let mut outcome = Outcome::default();
    for (repo, result) in results {
        match result {
            Ok(value) => outcome.succeeded.push((repo.clone(), value)),
            Err(error) => outcome.failures.push(RepoFailure {
                repository: repo.id().to_string(),
                error,
            }),
        }
    }
    Ok(outcome)
}
