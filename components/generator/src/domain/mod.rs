//! Domain Layer - Configuration, errors and value types
//!
//! Plain data plus the edit block partition. Nothing here performs I/O.

mod block;
mod config;
mod errors;
mod report;

pub use block::{Block, partition};
pub use config::{
    DEFAULT_COMMIT_COUNT, DEFAULT_MAX_TREE_WIDTH, DEFAULT_MIN_TREE_WIDTH, FileProbabilities,
    GeneratorConfig, ProbabilityConfig, RebaseConflictPolicy,
};
pub use errors::{GeneratorError, NameKind};
pub use report::GenerationReport;
