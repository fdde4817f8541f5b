//! Generator errors.
//!
//! Merge conflicts never show up here: they are resolved in place by the
//! coordinator. Everything below is fatal to the run.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use crate::vcs::VcsError;

/// Namespace a generated name has to be unique in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameKind {
    /// Local branch names.
    Branch,
    /// Entries of the working directory.
    File,
}

impl fmt::Display for NameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Branch => write!(f, "branch"),
            Self::File => write!(f, "file"),
        }
    }
}

/// Errors that abort a generation run.
#[derive(Debug, Error)]
pub enum GeneratorError {
    /// The version-control backend failed.
    #[error("version control failure: {0}")]
    Vcs(#[from] VcsError),

    /// Reading or writing the working tree failed.
    #[error("I/O failure on {}: {source}", path.display())]
    Io {
        /// Path being accessed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A rebase failed under [`crate::RebaseConflictPolicy::Fail`].
    #[error("rebase of '{branch}' onto '{onto}' failed: {source}")]
    Rebase {
        /// Branch being rebased.
        branch: String,
        /// Upstream it was rebased onto.
        onto: String,
        /// Backend failure.
        #[source]
        source: VcsError,
    },

    /// A branch had to be picked but none exist.
    #[error("no local branches to pick from")]
    NoBranches,

    /// Two distinct branches were needed.
    #[error("at least two branches are required, found {0}")]
    NotEnoughBranches(usize),

    /// An existing file had to be picked but the working tree is empty.
    #[error("no files to pick from in {}", .0.display())]
    NoFiles(PathBuf),

    /// Every sampled candidate was already taken.
    #[error("no unused {kind} name after {attempts} attempts")]
    NamesExhausted {
        /// Namespace searched.
        kind: NameKind,
        /// Number of candidates tried.
        attempts: usize,
    },
}

impl GeneratorError {
    /// Wraps an I/O error with the path it occurred on.
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_failing_entity() {
        let err = GeneratorError::NamesExhausted {
            kind: NameKind::Branch,
            attempts: 1000,
        };
        assert_eq!(err.to_string(), "no unused branch name after 1000 attempts");

        let err = GeneratorError::Rebase {
            branch: "dolor".into(),
            onto: "amet".into(),
            source: VcsError::Rejected("conflict".into()),
        };
        assert!(err.to_string().contains("'dolor' onto 'amet'"));
    }

    #[test]
    fn vcs_errors_convert() {
        let err: GeneratorError = VcsError::Rejected("nope".into()).into();
        assert!(matches!(err, GeneratorError::Vcs(_)));
    }
}
