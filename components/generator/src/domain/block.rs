//! Line blocks rewritten by an edit.

use rand::Rng;
use std::ops::Range;

/// Half-open range `[start, end)` of line indices.
///
/// `start` may exceed `end`, in which case the block covers nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    /// First line replaced.
    pub start: usize,
    /// One past the last line replaced.
    pub end: usize,
}

impl Block {
    /// Creates a block.
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Line indices covered by the block.
    #[must_use]
    pub const fn lines(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Whether the block covers no line.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

/// Splits `0..line_count` into a random sequence of blocks.
///
/// Both ends are drawn uniformly from `0..line_count`, independently, so
/// blocks may overlap, repeat or run backwards. Drawing stops once a block
/// ends at `line_count - 1`, which each draw does with probability
/// `1 / line_count`. The final line is therefore never inside a block.
pub fn partition<R: Rng>(line_count: usize, rng: &mut R) -> Vec<Block> {
    let mut blocks = Vec::new();
    if line_count == 0 {
        return blocks;
    }

    loop {
        let start = rng.random_range(0..line_count);
        let end = rng.random_range(0..line_count);
        blocks.push(Block::new(start, end));
        if end + 1 >= line_count {
            return blocks;
        }
    }
}
