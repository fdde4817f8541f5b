//! Add a file filled with sampled paragraphs.

use rand::Rng;
use std::collections::HashSet;
use tracing::info;

use super::{FileOperation, Workspace, commit_message, entry_names};
use crate::domain::{GeneratorError, NameKind};
use crate::naming::unique_name;
use crate::text::{TextSampler, TextUnit};
use crate::vcs::VersionControl;

/// Upper bound on the paragraphs written into a new file.
pub const MAX_PARAGRAPHS: usize = 10;

pub(super) async fn run<V, S, R>(
    workspace: &Workspace<'_, V, S>,
    rng: &mut R,
) -> Result<String, GeneratorError>
where
    V: VersionControl + ?Sized,
    S: TextSampler + ?Sized,
    R: Rng,
{
    // Hidden entries count as taken too.
    let taken: HashSet<String> = entry_names(workspace.directory()).await?.into_iter().collect();
    let name = unique_name(workspace.sampler, rng, NameKind::File, |candidate| {
        taken.contains(candidate)
    })?;
    info!(file = %name, "adding file {name}");

    let paragraphs = rng.random_range(1..=MAX_PARAGRAPHS);
    let body = workspace.sampler.sample(TextUnit::Paragraphs(paragraphs), rng);
    let path = workspace.path_of(&name);
    tokio::fs::write(&path, body)
        .await
        .map_err(|e| GeneratorError::io(&path, e))?;

    workspace.vcs.stage(&name).await?;
    workspace
        .vcs
        .commit(&commit_message(FileOperation::Add, &name))
        .await?;
    Ok(name)
}
