//! Text source port.

use rand::RngCore;

/// Amount and shape of text requested from a [`TextSampler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextUnit {
    /// Space separated words.
    Words(usize),
    /// Sentences on a single line.
    Sentences(usize),
    /// Paragraphs, one per line.
    Paragraphs(usize),
}

/// Produces short random text. Used for file bodies, edited lines and names.
///
/// The random source is passed in so that a seeded run stays reproducible.
pub trait TextSampler: Send + Sync {
    /// Samples text of the requested shape.
    fn sample(&self, unit: TextUnit, rng: &mut dyn RngCore) -> String;
}
