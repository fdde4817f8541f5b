//! Branch topology policy.
//!
//! Decides whether a step grows the tree with a new branch or moves to an
//! existing one, and picks endpoints for merges and rebases. Picks are
//! uniform over the whole branch list, with no bias toward leaves.

use rand::Rng;
use tracing::info;

use crate::domain::{GeneratorError, NameKind};
use crate::naming::unique_name;
use crate::text::TextSampler;
use crate::vcs::VersionControl;

/// Branch creation and selection bound to a backend and a name source.
pub struct BranchTopology<'a, V: ?Sized, S: ?Sized> {
    vcs: &'a V,
    sampler: &'a S,
}

impl<'a, V, S> BranchTopology<'a, V, S>
where
    V: VersionControl + ?Sized,
    S: TextSampler + ?Sized,
{
    /// Creates a policy over the given collaborators.
    #[must_use]
    pub const fn new(vcs: &'a V, sampler: &'a S) -> Self {
        Self { vcs, sampler }
    }

    /// Creates a branch whose name is not in `existing` and checks it out.
    ///
    /// # Errors
    /// Returns `NamesExhausted` if no free name is sampled, or the backend
    /// failure.
    pub async fn create_branch<R: Rng>(
        &self,
        existing: &[String],
        rng: &mut R,
    ) -> Result<String, GeneratorError> {
        let name = unique_name(self.sampler, rng, NameKind::Branch, |candidate| {
            existing.iter().any(|b| b == candidate)
        })?;
        info!(branch = %name, "creating branch {name}");
        self.vcs.checkout_new(&name).await?;
        Ok(name)
    }

    /// Picks a branch uniformly from the current branch list.
    ///
    /// # Errors
    /// Returns `NoBranches` if the list is empty, or the backend failure.
    pub async fn pick_branch<R: Rng>(&self, rng: &mut R) -> Result<String, GeneratorError> {
        let branches = self.vcs.list_local_branches().await?;
        pick_from(&branches, rng).cloned()
    }
}

/// Whether a step should create a branch.
///
/// Always true for an empty tree. Otherwise true only below
/// `max_tree_width`, and then with probability `p_branch`. The draw is only
/// taken below the maximum.
pub fn should_create_branch<R: Rng>(
    branch_count: usize,
    max_tree_width: usize,
    p_branch: f64,
    rng: &mut R,
) -> bool {
    branch_count == 0 || (branch_count < max_tree_width && rng.random::<f64>() <= p_branch)
}

/// Uniform pick from `branches`.
///
/// # Errors
/// Returns `NoBranches` if the slice is empty.
pub fn pick_from<'b, R: Rng>(
    branches: &'b [String],
    rng: &mut R,
) -> Result<&'b String, GeneratorError> {
    if branches.is_empty() {
        return Err(GeneratorError::NoBranches);
    }
    Ok(&branches[rng.random_range(0..branches.len())])
}

/// Two distinct branches, drawn uniformly, redrawing the second while equal.
///
/// # Errors
/// Returns `NotEnoughBranches` with fewer than two branches.
pub fn pick_distinct_pair<R: Rng>(
    branches: &[String],
    rng: &mut R,
) -> Result<(String, String), GeneratorError> {
    if branches.len() < 2 {
        return Err(GeneratorError::NotEnoughBranches(branches.len()));
    }
    let first = pick_from(branches, rng)?;
    let mut second = pick_from(branches, rng)?;
    while second == first {
        second = pick_from(branches, rng)?;
    }
    Ok((first.clone(), second.clone()))
}
