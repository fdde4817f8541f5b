//! Merge/Rebase Coordinator
//!
//! Integrates two randomly chosen branches at the start of a step.
//!
//! Merge conflicts are resolved in place: every conflicted path takes the
//! destination's version, or is removed when that version cannot be staged,
//! and a single commit concludes the merge. A merge step therefore never
//! leaves the repository mid-conflict. Rebase failures are governed by
//! [`RebaseConflictPolicy`].

use rand::Rng;
use tracing::{debug, info, warn};

use crate::domain::{GeneratorConfig, GeneratorError, RebaseConflictPolicy};
use crate::topology::pick_distinct_pair;
use crate::vcs::{MergeOutcome, VersionControl};

/// Integration strategy chosen for a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegrationAction {
    /// Merge one branch into another.
    Merge,
    /// Rebase one branch onto another.
    Rebase,
}

impl IntegrationAction {
    /// Chooses among the enabled strategies.
    ///
    /// A fair coin decides when both are enabled; no draw is taken otherwise.
    pub fn choose<R: Rng>(allow_merge: bool, allow_rebase: bool, rng: &mut R) -> Option<Self> {
        match (allow_merge, allow_rebase) {
            (true, true) => Some(if rng.random::<f64>() < 0.5 {
                Self::Merge
            } else {
                Self::Rebase
            }),
            (true, false) => Some(Self::Merge),
            (false, true) => Some(Self::Rebase),
            (false, false) => None,
        }
    }
}

/// How a conflicted path was settled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConflictResolution {
    /// The destination's version was staged.
    KeptOurs(String),
    /// The path was removed from the tree and the index.
    Removed(String),
}

impl ConflictResolution {
    /// Path that was in conflict.
    #[must_use]
    pub fn path(&self) -> &str {
        match self {
            Self::KeptOurs(p) | Self::Removed(p) => p,
        }
    }
}

/// Integration performed by a step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Integration {
    /// `source` was merged into `destination`.
    Merged {
        /// Branch merged in.
        source: String,
        /// Branch merged into.
        destination: String,
        /// Resolutions, in conflict-report order. Empty for a clean merge.
        conflicts: Vec<ConflictResolution>,
        /// Whether `source` was deleted afterwards.
        deleted_source: bool,
    },
    /// `branch` was rebased onto `onto`.
    Rebased {
        /// Branch rewritten.
        branch: String,
        /// New upstream.
        onto: String,
    },
    /// The rebase failed and was abandoned.
    RebaseAborted {
        /// Branch left untouched.
        branch: String,
        /// Upstream that was attempted.
        onto: String,
    },
}

/// Commit message concluding a conflicted merge.
#[must_use]
pub fn conflict_commit_message(source: &str, destination: &str, paths: &[String]) -> String {
    format!(
        "merge '{source}' into '{destination}'\n\nMerge conflicts:\n{}",
        paths.join("\n")
    )
}

/// Merge and rebase decisions bound to a configuration and a backend.
pub struct MergeRebaseCoordinator<'a, V: ?Sized> {
    config: &'a GeneratorConfig,
    vcs: &'a V,
}

impl<'a, V> MergeRebaseCoordinator<'a, V>
where
    V: VersionControl + ?Sized,
{
    /// Creates a coordinator.
    #[must_use]
    pub const fn new(config: &'a GeneratorConfig, vcs: &'a V) -> Self {
        Self { config, vcs }
    }

    /// Merges or rebases two distinct branches, if possible.
    ///
    /// Returns `None` with fewer than two branches or when both strategies
    /// are disabled.
    ///
    /// # Errors
    /// Propagates backend failures, and rebase failures under
    /// [`RebaseConflictPolicy::Fail`].
    pub async fn maybe_integrate<R: Rng>(
        &self,
        p_delete_after_merge: f64,
        rng: &mut R,
    ) -> Result<Option<Integration>, GeneratorError> {
        let branches = self.vcs.list_local_branches().await?;
        if branches.len() < 2 {
            debug!(branches = branches.len(), "not enough branches to integrate");
            return Ok(None);
        }

        let Some(action) =
            IntegrationAction::choose(self.config.allow_merge, self.config.allow_rebase, rng)
        else {
            debug!("merge and rebase are both disabled");
            return Ok(None);
        };

        let integration = match action {
            IntegrationAction::Merge => {
                debug!("merging branch");
                self.merge_branch(&branches, p_delete_after_merge, rng)
                    .await?
            }
            IntegrationAction::Rebase => {
                debug!("rebasing branch");
                self.rebase_branch(&branches, rng).await?
            }
        };
        Ok(Some(integration))
    }

    /// Merges one branch of `branches` into another.
    ///
    /// With probability `p_delete_after_merge`, and only while more than
    /// `min_tree_width` branches exist, the source branch is deleted
    /// afterwards.
    ///
    /// # Errors
    /// Propagates backend failures other than the merge conflict itself.
    pub async fn merge_branch<R: Rng>(
        &self,
        branches: &[String],
        p_delete_after_merge: f64,
        rng: &mut R,
    ) -> Result<Integration, GeneratorError> {
        let (source, destination) = pick_distinct_pair(branches, rng)?;
        self.vcs.checkout(&destination).await?;
        debug!(%source, %destination, "merging branch '{source}' with '{destination}'");

        let conflicts = match self.vcs.merge_into(&source, &destination).await? {
            MergeOutcome::Clean => Vec::new(),
            MergeOutcome::Conflicted(paths) => {
                self.resolve_conflicts(&source, &destination, &paths)
                    .await?
            }
        };

        let wants_delete = rng.random::<f64>() < p_delete_after_merge;
        let deleted_source = wants_delete && branches.len() > self.config.min_tree_width;
        if deleted_source {
            self.vcs.checkout(&destination).await?;
            self.vcs.delete_local_branch(&source).await?;
            info!(branch = %source, "deleted merged branch {source}");
        } else if wants_delete {
            debug!(
                branch = %source,
                min_tree_width = self.config.min_tree_width,
                "keeping merged branch to stay at the minimum tree width"
            );
        }

        Ok(Integration::Merged {
            source,
            destination,
            conflicts,
            deleted_source,
        })
    }

    /// Settles every path in `paths` and commits the merge.
    async fn resolve_conflicts(
        &self,
        source: &str,
        destination: &str,
        paths: &[String],
    ) -> Result<Vec<ConflictResolution>, GeneratorError> {
        debug!(count = paths.len(), "merge conflicts");
        let mut resolutions = Vec::with_capacity(paths.len());
        for path in paths {
            debug!(%path, "resolving conflict for '{path}'");
            match self.vcs.stage_ours(path).await {
                Ok(()) => resolutions.push(ConflictResolution::KeptOurs(path.clone())),
                Err(err) => {
                    warn!(%path, error = %err, "cannot keep our version, removing");
                    self.vcs.remove(path).await?;
                    resolutions.push(ConflictResolution::Removed(path.clone()));
                }
            }
        }
        self.vcs
            .commit(&conflict_commit_message(source, destination, paths))
            .await?;
        Ok(resolutions)
    }

    /// Rebases one branch of `branches` onto another.
    ///
    /// # Errors
    /// Under [`RebaseConflictPolicy::Fail`] a failed rebase is returned as
    /// [`GeneratorError::Rebase`]; under `Abort` it is abandoned instead.
    pub async fn rebase_branch<R: Rng>(
        &self,
        branches: &[String],
        rng: &mut R,
    ) -> Result<Integration, GeneratorError> {
        let (branch, onto) = pick_distinct_pair(branches, rng)?;
        debug!(%branch, %onto, "rebasing branch '{branch}' onto '{onto}'");
        self.vcs.checkout(&branch).await?;

        match self.vcs.rebase(&onto).await {
            Ok(()) => Ok(Integration::Rebased { branch, onto }),
            Err(source) => match self.config.rebase_conflicts {
                RebaseConflictPolicy::Fail => Err(GeneratorError::Rebase {
                    branch,
                    onto,
                    source,
                }),
                RebaseConflictPolicy::Abort => {
                    warn!(%branch, %onto, error = %source, "rebase failed, aborting it");
                    self.vcs.abort_rebase().await?;
                    Ok(Integration::RebaseAborted { branch, onto })
                }
            },
        }
    }
}
