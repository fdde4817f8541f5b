//! Generator - the step loop
//!
//! Owns the configuration, both ports and the random source, and runs
//! `commit_count` steps strictly in sequence. Repository state is re-queried
//! before every decision that depends on it; nothing is cached across steps.

use rand::Rng;
use tracing::{debug, info, instrument};

use crate::domain::{GenerationReport, GeneratorConfig, GeneratorError, ProbabilityConfig};
use crate::merge::MergeRebaseCoordinator;
use crate::operations::Workspace;
use crate::selector::FileOperationSelector;
use crate::text::TextSampler;
use crate::topology::{BranchTopology, pick_from, should_create_branch};
use crate::vcs::VersionControl;

/// Stochastic history generator.
pub struct Generator<V, S, R> {
    config: GeneratorConfig,
    vcs: V,
    sampler: S,
    rng: R,
}

impl<V, S, R> Generator<V, S, R>
where
    V: VersionControl,
    S: TextSampler,
    R: Rng,
{
    /// Creates a generator. Nothing touches the repository until
    /// [`Self::generate`] runs.
    pub const fn new(config: GeneratorConfig, vcs: V, sampler: S, rng: R) -> Self {
        Self {
            config,
            vcs,
            sampler,
            rng,
        }
    }

    /// Run configuration.
    pub const fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Version-control backend.
    pub const fn vcs(&self) -> &V {
        &self.vcs
    }

    /// Runs every step and returns what happened.
    ///
    /// The repository is initialized first if the directory holds none.
    ///
    /// # Errors
    /// Returns the first failure of any step. The repository is left as it
    /// was at that point; nothing is rolled back.
    #[instrument(skip_all, fields(directory = %self.config.directory.display()))]
    pub async fn generate(
        &mut self,
        probabilities: &ProbabilityConfig,
    ) -> Result<GenerationReport, GeneratorError> {
        let Self {
            config,
            vcs,
            sampler,
            rng,
        } = self;

        ensure_repository(&*vcs).await?;

        let topology = BranchTopology::new(&*vcs, &*sampler);
        let coordinator = MergeRebaseCoordinator::new(config, &*vcs);
        let workspace = Workspace::new(&config.directory, &*vcs, &*sampler);
        let selector = FileOperationSelector::new(probabilities.files);
        let mut report = GenerationReport::default();

        info!(commit_count = config.commit_count, "generating history");
        for step in 1..=config.commit_count {
            if rng.random::<f64>() <= probabilities.merge {
                if let Some(integration) = coordinator
                    .maybe_integrate(probabilities.delete_after_merge, rng)
                    .await?
                {
                    report.record_integration(&integration);
                }
            }

            let branches = vcs.list_local_branches().await?;
            let branch = if should_create_branch(
                branches.len(),
                config.max_tree_width,
                probabilities.branch,
                rng,
            ) {
                report.branches_created += 1;
                topology.create_branch(&branches, rng).await?
            } else {
                let branch = pick_from(&branches, rng)?.clone();
                debug!(%branch, "switching branch");
                vcs.checkout(&branch).await?;
                branch
            };

            let file_count = workspace.files().await?.len();
            let operation = selector.select(file_count, rng);
            let change = operation.execute(&workspace, rng).await?;
            report.record_change(&change);
            report.steps += 1;

            info!(
                step,
                total = config.commit_count,
                %branch,
                operation = %change.operation,
                file = %change.name,
                "commit {step}/{}",
                config.commit_count
            );
        }

        info!(
            steps = report.steps,
            merges = report.merges,
            rebases = report.rebases,
            "history generated"
        );
        Ok(report)
    }
}

async fn ensure_repository<V: VersionControl + ?Sized>(vcs: &V) -> Result<(), GeneratorError> {
    if vcs.is_repository().await? {
        debug!("repository found");
    } else {
        info!("initializing repository");
        vcs.init().await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operations::list_files;
    use crate::testing::{MemoryVcs, ScriptedSampler, VcsCall};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const WORDS: [&str; 12] = [
        "lorem", "ipsum", "dolor", "sit", "amet", "consectetur", "adipiscing", "elit", "sed",
        "do", "eiusmod", "tempor",
    ];

    fn generator(
        config: GeneratorConfig,
        vcs: MemoryVcs,
        seed: u64,
    ) -> Generator<MemoryVcs, ScriptedSampler, StdRng> {
        Generator::new(
            config,
            vcs,
            ScriptedSampler::new(WORDS),
            StdRng::seed_from_u64(seed),
        )
    }

    #[tokio::test]
    async fn single_step_on_an_empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        let config = GeneratorConfig::new(dir.path()).with_commit_count(1);
        let mut generator = generator(config, MemoryVcs::new(), 1);

        let report = generator
            .generate(&ProbabilityConfig::default())
            .await
            .unwrap();

        let vcs = generator.vcs();
        assert_eq!(vcs.calls()[..2], [VcsCall::IsRepository, VcsCall::Init]);
        assert_eq!(vcs.branches().len(), 1);
        assert_eq!(list_files(dir.path()).await.unwrap().len(), 1);

        let commits = vcs.commits();
        assert_eq!(commits.len(), 1);
        assert!(commits[0].message.starts_with("add file "));
        assert_eq!(report.steps, 1);
        assert_eq!(report.files_added, 1);
        assert_eq!(report.branches_created, 1);
    }

    #[tokio::test]
    async fn existing_repository_is_not_reinitialized() {
        let dir = tempfile::tempdir().unwrap();
        let config = GeneratorConfig::new(dir.path()).with_commit_count(0);
        let vcs = MemoryVcs::new().with_branches(["main"]);
        let mut generator = generator(config, vcs, 1);

        let report = generator
            .generate(&ProbabilityConfig::default())
            .await
            .unwrap();
        assert_eq!(report, GenerationReport::default());
        assert_eq!(generator.vcs().calls(), vec![VcsCall::IsRepository]);
    }

    #[tokio::test]
    async fn merge_only_never_rebases() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("one"), "a\nb\nc").unwrap();
        std::fs::write(dir.path().join("two"), "d\ne\nf").unwrap();
        let config = GeneratorConfig::new(dir.path())
            .with_commit_count(20)
            .with_integrations(true, false);
        let vcs = MemoryVcs::new()
            .with_branches(["main", "feature"])
            .with_working_tree(dir.path());
        let probabilities = ProbabilityConfig {
            merge: 1.0,
            delete_after_merge: 0.0,
            ..ProbabilityConfig::default()
        };
        let mut generator = generator(config, vcs, 42);

        let report = generator.generate(&probabilities).await.unwrap();

        let calls = generator.vcs().calls();
        assert!(calls.iter().any(|c| matches!(c, VcsCall::MergeInto { .. })));
        assert!(!calls.iter().any(|c| matches!(c, VcsCall::Rebase(_))));
        assert_eq!(report.rebases, 0);
        assert_eq!(report.merges, 20);
    }

    #[tokio::test]
    async fn disabled_integrations_leave_steps_unaffected() {
        let dir = tempfile::tempdir().unwrap();
        let config = GeneratorConfig::new(dir.path())
            .with_commit_count(10)
            .with_integrations(false, false);
        let vcs = MemoryVcs::new()
            .with_branches(["main", "feature"])
            .with_working_tree(dir.path());
        let probabilities = ProbabilityConfig {
            merge: 1.0,
            ..ProbabilityConfig::default()
        };
        let mut generator = generator(config, vcs, 7);

        let report = generator.generate(&probabilities).await.unwrap();

        let calls = generator.vcs().calls();
        assert!(!calls.iter().any(|c| matches!(
            c,
            VcsCall::MergeInto { .. } | VcsCall::Rebase(_)
        )));
        assert_eq!(report.steps, 10);
        assert_eq!(report.file_commits(), 10);
    }

    #[tokio::test]
    async fn width_and_commit_count_hold_over_a_long_run() {
        let dir = tempfile::tempdir().unwrap();
        let config = GeneratorConfig::new(dir.path())
            .with_commit_count(200)
            .with_tree_width(1, 3)
            .with_integrations(true, false);
        let vcs = MemoryVcs::new().with_working_tree(dir.path());
        let probabilities = ProbabilityConfig {
            branch: 0.9,
            ..ProbabilityConfig::default()
        };
        let mut generator = generator(config, vcs, 1234);

        let report = generator.generate(&probabilities).await.unwrap();

        let vcs = generator.vcs();
        assert!(vcs.branches().len() <= 3);
        let step_commits = vcs
            .commits()
            .iter()
            .filter(|c| !c.message.starts_with("merge "))
            .count();
        assert_eq!(step_commits, 200);
        assert_eq!(report.file_commits(), 200);
        assert!(report.branches_created <= 3 + report.branches_deleted);
    }

    #[tokio::test]
    async fn seeded_runs_are_reproducible() {
        async fn run(seed: u64) -> (Vec<VcsCall>, GenerationReport) {
            let dir = tempfile::tempdir().unwrap();
            let config = GeneratorConfig::new(dir.path()).with_commit_count(40);
            let vcs = MemoryVcs::new().with_working_tree(dir.path());
            let mut generator = generator(config, vcs, seed);
            let report = generator
                .generate(&ProbabilityConfig::default())
                .await
                .unwrap();
            (generator.vcs().calls(), report)
        }

        assert_eq!(run(99).await, run(99).await);
    }

    #[tokio::test]
    async fn first_failure_aborts_the_run() {
        let dir = tempfile::tempdir().unwrap();
        let config = GeneratorConfig::new(dir.path())
            .with_commit_count(50)
            .with_integrations(false, true);
        let vcs = MemoryVcs::new()
            .with_branches(["main", "feature"])
            .with_working_tree(dir.path())
            .with_failing_rebases(1);
        let probabilities = ProbabilityConfig {
            merge: 1.0,
            ..ProbabilityConfig::default()
        };
        let mut generator = generator(config, vcs, 3);

        let err = generator.generate(&probabilities).await.unwrap_err();
        assert!(matches!(err, GeneratorError::Rebase { .. }));
        assert!(generator.vcs().commits().is_empty());
    }
}
