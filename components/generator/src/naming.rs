//! Retry-until-unique name sampling.

use rand::Rng;

use crate::domain::{GeneratorError, NameKind};
use crate::text::{TextSampler, TextUnit};

/// Candidates tried before giving up.
pub const MAX_NAME_ATTEMPTS: usize = 1000;

/// Rejected candidates tolerated before names grow by one word.
pub const ATTEMPTS_PER_LENGTH: usize = 8;

/// Samples names until `is_taken` rejects none.
///
/// Names start as a single word. Every [`ATTEMPTS_PER_LENGTH`] rejections
/// the next candidates gain a word, joined with `-`, so a crowded namespace
/// moves on to compound names such as `lorem-ipsum`. Empty candidates are
/// skipped. The bound is only hit with a broken sampler.
///
/// # Errors
/// Returns `NamesExhausted` after [`MAX_NAME_ATTEMPTS`] rejected candidates.
pub fn unique_name<S, R, F>(
    sampler: &S,
    rng: &mut R,
    kind: NameKind,
    mut is_taken: F,
) -> Result<String, GeneratorError>
where
    S: TextSampler + ?Sized,
    R: Rng,
    F: FnMut(&str) -> bool,
{
    for attempt in 0..MAX_NAME_ATTEMPTS {
        let words = 1 + attempt / ATTEMPTS_PER_LENGTH;
        let candidate = sampler
            .sample(TextUnit::Words(words), rng)
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("-");
        if !candidate.is_empty() && !is_taken(&candidate) {
            return Ok(candidate);
        }
    }
    Err(GeneratorError::NamesExhausted {
        kind,
        attempts: MAX_NAME_ATTEMPTS,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedSampler;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn skips_taken_and_empty_candidates() {
        let sampler = ScriptedSampler::new(["alpha", " ", "alpha", "beta"]);
        let mut rng = StdRng::seed_from_u64(0);
        let name = unique_name(&sampler, &mut rng, NameKind::Branch, |c| c == "alpha").unwrap();
        assert_eq!(name, "beta");
    }

    #[test]
    fn crowded_namespace_falls_back_to_compound_names() {
        let sampler = ScriptedSampler::new(["lorem", "ipsum", "dolor"]);
        let mut rng = StdRng::seed_from_u64(0);
        let single = ["lorem", "ipsum", "dolor"];

        let name =
            unique_name(&sampler, &mut rng, NameKind::File, |c| single.contains(&c)).unwrap();

        assert_eq!(name.split('-').count(), 2, "{name}");
        assert!(name.split('-').all(|part| single.contains(&part)));
    }

    #[test]
    fn gives_up_when_everything_is_taken() {
        let sampler = ScriptedSampler::new(["same"]);
        let mut rng = StdRng::seed_from_u64(0);
        let err = unique_name(&sampler, &mut rng, NameKind::File, |_| true).unwrap_err();
        assert!(matches!(
            err,
            GeneratorError::NamesExhausted {
                kind: NameKind::File,
                attempts: MAX_NAME_ATTEMPTS
            }
        ));
    }
}
