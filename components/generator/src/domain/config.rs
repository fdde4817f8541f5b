//! Run configuration.
//!
//! Both records are built once before generation and stay immutable for the
//! whole run. Range checks live in the kernel's settings layer; the generator
//! trusts what it is given.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default number of generation steps.
pub const DEFAULT_COMMIT_COUNT: u64 = 500;
/// Default upper bound on branch count considered when branching.
pub const DEFAULT_MAX_TREE_WIDTH: usize = 10;
/// Default lower bound guarding post-merge branch deletion.
pub const DEFAULT_MIN_TREE_WIDTH: usize = 1;

/// What to do when a rebase cannot be completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RebaseConflictPolicy {
    /// Propagate the failure and abort the run.
    #[default]
    Fail,
    /// Abort the rebase, restore the branch and continue.
    Abort,
}

/// Shape of the history to generate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Merge is available as an integration strategy.
    #[serde(default = "default_true")]
    pub allow_merge: bool,

    /// Rebase is available as an integration strategy.
    #[serde(default = "default_true")]
    pub allow_rebase: bool,

    /// Repository working directory.
    pub directory: PathBuf,

    /// Branches are only created while fewer than this many exist.
    #[serde(default = "default_max_tree_width")]
    pub max_tree_width: usize,

    /// Post-merge deletion never takes the branch count below this.
    #[serde(default = "default_min_tree_width")]
    pub min_tree_width: usize,

    /// Number of generation steps.
    #[serde(default = "default_commit_count")]
    pub commit_count: u64,

    /// Handling of failed rebases.
    #[serde(default)]
    pub rebase_conflicts: RebaseConflictPolicy,
}

impl GeneratorConfig {
    /// Creates a configuration with default widths and step count.
    #[must_use]
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            allow_merge: true,
            allow_rebase: true,
            directory: directory.into(),
            max_tree_width: DEFAULT_MAX_TREE_WIDTH,
            min_tree_width: DEFAULT_MIN_TREE_WIDTH,
            commit_count: DEFAULT_COMMIT_COUNT,
            rebase_conflicts: RebaseConflictPolicy::default(),
        }
    }

    /// Sets the number of generation steps.
    #[must_use]
    pub const fn with_commit_count(mut self, commit_count: u64) -> Self {
        self.commit_count = commit_count;
        self
    }

    /// Sets the tree width bounds.
    #[must_use]
    pub const fn with_tree_width(mut self, min: usize, max: usize) -> Self {
        self.min_tree_width = min;
        self.max_tree_width = max;
        self
    }

    /// Enables or disables the integration strategies.
    #[must_use]
    pub const fn with_integrations(mut self, allow_merge: bool, allow_rebase: bool) -> Self {
        self.allow_merge = allow_merge;
        self.allow_rebase = allow_rebase;
        self
    }

    /// Sets the failed-rebase policy.
    #[must_use]
    pub const fn with_rebase_conflicts(mut self, policy: RebaseConflictPolicy) -> Self {
        self.rebase_conflicts = policy;
        self
    }
}

/// Relative weights of the three file mutations.
///
/// Expected to sum to 1; not validated here.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FileProbabilities {
    /// Threshold for adding a file.
    #[serde(default = "default_add")]
    pub add: f64,
    /// Threshold width for editing a file.
    #[serde(default = "default_edit")]
    pub edit: f64,
    /// Threshold width for removing a file.
    #[serde(default = "default_remove")]
    pub remove: f64,
}

impl Default for FileProbabilities {
    fn default() -> Self {
        Self {
            add: default_add(),
            edit: default_edit(),
            remove: default_remove(),
        }
    }
}

impl FileProbabilities {
    /// Sum of the three weights.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.add + self.edit + self.remove
    }
}

/// Bernoulli thresholds driving every random decision.
///
/// Each value is compared against a uniform draw from `[0, 1)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProbabilityConfig {
    /// File mutation weights.
    #[serde(default)]
    pub files: FileProbabilities,
    /// Chance of creating a branch when below the maximum width.
    #[serde(default = "default_branch")]
    pub branch: f64,
    /// Chance of attempting an integration at the start of a step.
    #[serde(default = "default_merge")]
    pub merge: f64,
    /// Chance of deleting the source branch after a merge.
    #[serde(default = "default_delete_after_merge")]
    pub delete_after_merge: f64,
}

impl Default for ProbabilityConfig {
    fn default() -> Self {
        Self {
            files: FileProbabilities::default(),
            branch: default_branch(),
            merge: default_merge(),
            delete_after_merge: default_delete_after_merge(),
        }
    }
}

const fn default_true() -> bool {
    true
}

const fn default_max_tree_width() -> usize {
    DEFAULT_MAX_TREE_WIDTH
}

const fn default_min_tree_width() -> usize {
    DEFAULT_MIN_TREE_WIDTH
}

const fn default_commit_count() -> u64 {
    DEFAULT_COMMIT_COUNT
}

const fn default_add() -> f64 {
    0.3
}

const fn default_edit() -> f64 {
    0.6
}

const fn default_remove() -> f64 {
    0.1
}

const fn default_branch() -> f64 {
    0.3
}

const fn default_merge() -> f64 {
    0.3
}

const fn default_delete_after_merge() -> f64 {
    0.3
}
