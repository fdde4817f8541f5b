//! Lorem ipsum text sampler.
//!
//! Words are drawn uniformly from a fixed Latin vocabulary. Every entry is
//! lowercase ASCII, so any single word is also a valid branch and file name.

use generator::{TextSampler, TextUnit};
use rand::{Rng, RngCore};
use std::ops::RangeInclusive;

/// Latin vocabulary the sampler draws from.
pub const WORDS: &[&str] = &[
    "lorem", "ipsum", "dolor", "sit", "amet", "consectetur", "adipiscing", "elit", "sed", "do",
    "eiusmod", "tempor", "incididunt", "ut", "labore", "et", "dolore", "magna", "aliqua",
    "enim", "ad", "minim", "veniam", "quis", "nostrud", "exercitation", "ullamco", "laboris",
    "nisi", "aliquip", "ex", "ea", "commodo", "consequat", "duis", "aute", "irure", "in",
    "reprehenderit", "voluptate", "velit", "esse", "cillum", "fugiat", "nulla", "pariatur",
    "excepteur", "sint", "occaecat", "cupidatat", "non", "proident", "sunt", "culpa", "qui",
    "officia", "deserunt", "mollit", "anim", "id", "est", "laborum", "curabitur", "pretium",
    "tincidunt", "lacus", "gravida", "orci", "nullam", "varius", "turpis", "vitae", "mauris",
    "blandit", "aliquet", "fringilla", "porta", "viverra", "lectus", "semper", "vehicula",
    "sagittis", "faucibus", "feugiat", "pellentesque", "habitant", "morbi", "tristique",
    "senectus", "netus", "fames", "egestas", "vestibulum", "ante", "primis", "cubilia",
    "curae", "donec", "tellus", "rutrum", "mattis", "dictum", "sapien", "phasellus",
];

/// Words per sentence.
pub const SENTENCE_WORDS: RangeInclusive<usize> = 5..=15;
/// Sentences per paragraph.
pub const PARAGRAPH_SENTENCES: RangeInclusive<usize> = 3..=7;

/// [`TextSampler`] producing lorem ipsum.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoremSampler;

impl LoremSampler {
    /// Creates a sampler.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn word(rng: &mut dyn RngCore) -> &'static str {
        WORDS[rng.random_range(0..WORDS.len())]
    }

    fn words(count: usize, rng: &mut dyn RngCore) -> Vec<&'static str> {
        (0..count).map(|_| Self::word(rng)).collect()
    }

    fn sentence(rng: &mut dyn RngCore) -> String {
        let count = rng.random_range(SENTENCE_WORDS);
        let mut sentence = capitalize(&Self::words(count, rng).join(" "));
        sentence.push('.');
        sentence
    }

    fn sentences(count: usize, rng: &mut dyn RngCore) -> String {
        (0..count)
            .map(|_| Self::sentence(rng))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn paragraph(rng: &mut dyn RngCore) -> String {
        let count = rng.random_range(PARAGRAPH_SENTENCES);
        Self::sentences(count, rng)
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

impl TextSampler for LoremSampler {
    fn sample(&self, unit: TextUnit, rng: &mut dyn RngCore) -> String {
        match unit {
            TextUnit::Words(count) => Self::words(count, rng).join(" "),
            TextUnit::Sentences(count) => Self::sentences(count, rng),
            TextUnit::Paragraphs(count) => (0..count)
                .map(|_| Self::paragraph(rng))
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}
