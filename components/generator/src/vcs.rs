//! Version-control port.
//!
//! The generator never talks to git directly. It is written against the
//! [`VersionControl`] capability set below; the kernel supplies a git CLI
//! adapter and the tests use the in-memory `MemoryVcs`.

use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;

/// Errors reported by a version-control backend.
#[derive(Debug, Error)]
pub enum VcsError {
    /// The backend process could not be started.
    #[error("failed to spawn `{command}`: {source}")]
    Spawn {
        /// Command line that was attempted.
        command: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The backend ran but reported failure.
    #[error("`{command}` failed ({status}): {stderr}")]
    CommandFailed {
        /// Command line that failed.
        command: String,
        /// Exit status description.
        status: String,
        /// Captured standard error, trimmed.
        stderr: String,
    },
    /// The repository directory does not exist.
    #[error("repository directory not found: {}", .0.display())]
    MissingDirectory(PathBuf),
    /// The backend refused the operation for a domain reason.
    #[error("operation rejected: {0}")]
    Rejected(String),
}

/// Result of merging one branch into the checked-out branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    /// The merge completed without intervention.
    Clean,
    /// The merge stopped with unresolved paths, relative to the repository root.
    Conflicted(Vec<String>),
}

impl MergeOutcome {
    /// Whether the merge left conflicts behind.
    #[must_use]
    pub const fn is_conflicted(&self) -> bool {
        matches!(self, Self::Conflicted(_))
    }
}

/// Capability set the generator needs from a version-control engine.
///
/// All paths are relative to the repository root. Implementations must be
/// usable from a single task issuing one call at a time.
#[async_trait]
pub trait VersionControl: Send + Sync {
    /// Whether the working directory already holds a repository.
    async fn is_repository(&self) -> Result<bool, VcsError>;

    /// Initializes an empty repository.
    async fn init(&self) -> Result<(), VcsError>;

    /// Names of all local branches that currently exist.
    async fn list_local_branches(&self) -> Result<Vec<String>, VcsError>;

    /// Creates `name` at the current HEAD and checks it out.
    async fn checkout_new(&self, name: &str) -> Result<(), VcsError>;

    /// Checks out an existing branch.
    async fn checkout(&self, name: &str) -> Result<(), VcsError>;

    /// Merges `source` into `destination`, which must be checked out.
    async fn merge_into(&self, source: &str, destination: &str)
    -> Result<MergeOutcome, VcsError>;

    /// Rebases the checked-out branch onto `onto`.
    async fn rebase(&self, onto: &str) -> Result<(), VcsError>;

    /// Abandons an in-progress rebase and restores the original branch.
    async fn abort_rebase(&self) -> Result<(), VcsError>;

    /// Paths with unresolved conflicts.
    async fn diff_conflicted(&self) -> Result<Vec<String>, VcsError>;

    /// Resolves `path` with the checked-out side's version and stages it.
    async fn stage_ours(&self, path: &str) -> Result<(), VcsError>;

    /// Removes `path` from the working tree and the index.
    async fn remove(&self, path: &str) -> Result<(), VcsError>;

    /// Stages the working-tree content of `path`.
    async fn stage(&self, path: &str) -> Result<(), VcsError>;

    /// Records a commit on the checked-out branch, even if nothing changed.
    async fn commit(&self, message: &str) -> Result<(), VcsError>;

    /// Deletes a local branch that is not checked out.
    async fn delete_local_branch(&self, name: &str) -> Result<(), VcsError>;
}
