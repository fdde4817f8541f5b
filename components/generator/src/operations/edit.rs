//! Rewrite random line blocks of an existing file.

use rand::Rng;
use tracing::info;

use super::{FileOperation, Workspace, commit_message};
use crate::domain::{Block, GeneratorError, partition};
use crate::text::{TextSampler, TextUnit};
use crate::vcs::VersionControl;

pub(super) async fn run<V, S, R>(
    workspace: &Workspace<'_, V, S>,
    rng: &mut R,
) -> Result<String, GeneratorError>
where
    V: VersionControl + ?Sized,
    S: TextSampler + ?Sized,
    R: Rng,
{
    let name = workspace.choose_file(rng).await?;
    info!(file = %name, "editing file '{name}'");

    let path = workspace.path_of(&name);
    let content = tokio::fs::read_to_string(&path)
        .await
        .map_err(|e| GeneratorError::io(&path, e))?;
    let mut lines = split_lines(&content);
    let blocks = partition(lines.len(), rng);
    rewrite_blocks(&mut lines, &blocks, workspace.sampler, rng);
    tokio::fs::write(&path, lines.join("\n"))
        .await
        .map_err(|e| GeneratorError::io(&path, e))?;

    workspace.vcs.stage(&name).await?;
    workspace
        .vcs
        .commit(&commit_message(FileOperation::Edit, &name))
        .await?;
    Ok(name)
}

/// Splits on `\n` and `\r\n`. Always yields at least one line.
fn split_lines(content: &str) -> Vec<String> {
    content
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
        .collect()
}

/// Replaces every line inside each block with one fresh sentence.
fn rewrite_blocks<S, R>(lines: &mut [String], blocks: &[Block], sampler: &S, rng: &mut R)
where
    S: TextSampler + ?Sized,
    R: Rng,
{
    for block in blocks {
        for index in block.lines() {
            if let Some(line) = lines.get_mut(index) {
                *line = sampler.sample(TextUnit::Sentences(1), rng);
            }
        }
    }
}
