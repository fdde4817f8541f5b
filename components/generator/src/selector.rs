//! File operation selection.
//!
//! Maps the working-tree file count and one uniform draw to the next
//! [`FileOperation`]. The whole decision table lives here.

use rand::Rng;

use crate::domain::FileProbabilities;
use crate::operations::FileOperation;

/// Picks the file mutation for a step.
#[derive(Debug, Clone, Copy)]
pub struct FileOperationSelector {
    probabilities: FileProbabilities,
}

impl FileOperationSelector {
    /// Creates a selector over the given weights.
    #[must_use]
    pub const fn new(probabilities: FileProbabilities) -> Self {
        Self { probabilities }
    }

    /// Selects an operation for a tree holding `file_count` files.
    ///
    /// No draw is taken when the tree is empty.
    pub fn select<R: Rng>(&self, file_count: usize, rng: &mut R) -> FileOperation {
        if file_count == 0 {
            return FileOperation::Add;
        }
        self.select_with_draw(file_count, rng.random::<f64>())
    }

    /// Deterministic core of [`Self::select`] for a given draw in `[0, 1)`.
    ///
    /// With a single file Remove is suppressed and half of its weight is
    /// folded into Add, so the expected file count keeps drifting upward.
    #[must_use]
    pub fn select_with_draw(&self, file_count: usize, draw: f64) -> FileOperation {
        let p = &self.probabilities;
        match file_count {
            0 => FileOperation::Add,
            1 => {
                if draw <= p.add + p.remove / 2.0 {
                    FileOperation::Add
                } else {
                    FileOperation::Edit
                }
            }
            _ => {
                if draw <= p.add {
                    FileOperation::Add
                } else if draw <= p.add + p.edit {
                    FileOperation::Edit
                } else {
                    FileOperation::Remove
                }
            }
        }
    }
}

impl Default for FileOperationSelector {
    fn default() -> Self {
        Self::new(FileProbabilities::default())
    }
}
