//! Wires settings, the git adapter and the lorem sampler into a generator
//! run.

use anyhow::{Context, Result};
use generator::{GenerationReport, Generator};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use crate::infrastructure::config::Settings;
use crate::text::LoremSampler;
use crate::vcs::GitCli;

/// Random source for a run: seeded when a seed is configured, OS entropy
/// otherwise.
#[must_use]
pub fn rng_for(seed: Option<u64>) -> StdRng {
    seed.map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64)
}

/// Generates the configured history against real git.
///
/// # Errors
///
/// Returns the first step failure, with the repository directory as context.
pub async fn run(settings: &Settings) -> Result<GenerationReport> {
    let directory = &settings.generator.directory;
    info!(
        directory = %directory.display(),
        commit_count = settings.generator.commit_count,
        seed = ?settings.seed,
        "starting run"
    );

    let vcs = GitCli::new(directory, settings.git.clone());
    let mut generator = Generator::new(
        settings.generator.clone(),
        vcs,
        LoremSampler::new(),
        rng_for(settings.seed),
    );

    generator
        .generate(&settings.probabilities)
        .await
        .with_context(|| format!("Failed to generate history in {}", directory.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn seeded_rng_is_deterministic() {
        let a: u64 = rng_for(Some(5)).random();
        let b: u64 = rng_for(Some(5)).random();
        assert_eq!(a, b);
    }

    #[test]
    fn unseeded_rng_is_available() {
        let mut rng = rng_for(None);
        let draw: f64 = rng.random();
        assert!((0.0..1.0).contains(&draw));
    }
}
