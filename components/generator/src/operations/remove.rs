//! Delete an existing file.

use rand::Rng;
use tracing::info;

use super::{FileOperation, Workspace, commit_message};
use crate::domain::GeneratorError;
use crate::text::TextSampler;
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
    info!(file = %name, "removing file {name}");
    workspace.vcs.remove(&name).await?;
    workspace
        .vcs
        .commit(&commit_message(FileOperation::Remove, &name))
        .await?;
    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MemoryVcs, ScriptedSampler, VcsCall};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[tokio::test]
    async fn removes_through_the_backend_then_commits() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("amet"), "text").unwrap();

        let vcs = MemoryVcs::new().with_working_tree(dir.path());
        let sampler = ScriptedSampler::new(["unused"]);
        let workspace = Workspace::new(dir.path(), &vcs, &sampler);
        let mut rng = StdRng::seed_from_u64(8);

        let name = run(&workspace, &mut rng).await.unwrap();
        assert_eq!(name, "amet");
        assert!(!dir.path().join("amet").exists());
        assert_eq!(
            vcs.calls(),
            vec![
                VcsCall::Remove("amet".into()),
                VcsCall::Commit("remove file amet".into())
            ]
        );
    }
}
