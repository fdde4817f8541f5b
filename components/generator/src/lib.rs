//! Generator - Stochastic Repository History
//!
//! The generator is the decision-making core of Grove. Every step it:
//! 1. Maybe integrates two branches (merge or rebase, conflicts auto-resolved)
//! 2. Creates a new branch or switches to an existing one
//! 3. Adds, edits or removes one file and commits the change
//!
//! The version-control engine and the text source are reached only through
//! the [`VersionControl`] and [`TextSampler`] ports, so any backend (or the
//! in-memory fake in `testing`) can drive it.

pub mod domain;
pub mod merge;
pub mod naming;
pub mod operations;
pub mod orchestrator;
pub mod selector;
pub mod text;
pub mod topology;
pub mod vcs;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use domain::{
    Block, FileProbabilities, GenerationReport, GeneratorConfig, GeneratorError, NameKind,
    ProbabilityConfig, RebaseConflictPolicy,
};
pub use merge::{ConflictResolution, Integration, IntegrationAction, MergeRebaseCoordinator};
pub use operations::{FileChange, FileOperation, Workspace};
pub use orchestrator::Generator;
pub use selector::FileOperationSelector;
pub use text::{TextSampler, TextUnit};
pub use topology::BranchTopology;
pub use vcs::{MergeOutcome, VcsError, VersionControl};
