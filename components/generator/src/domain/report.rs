//! Run summary.

use serde::Serialize;

use crate::merge::{ConflictResolution, Integration};
use crate::operations::{FileChange, FileOperation};

/// Counters accumulated over a generation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GenerationReport {
    /// Steps completed.
    pub steps: u64,
    /// Branches created by the topology policy.
    pub branches_created: u64,
    /// Source branches deleted after a merge.
    pub branches_deleted: u64,
    /// Merges performed, clean or conflicted.
    pub merges: u64,
    /// Merges that needed conflict resolution.
    pub conflicted_merges: u64,
    /// Conflicted paths resolved with the destination's version.
    pub conflicts_kept_ours: u64,
    /// Conflicted paths resolved by removal.
    pub conflicts_removed: u64,
    /// Rebases completed.
    pub rebases: u64,
    /// Rebases abandoned under the abort policy.
    pub rebases_aborted: u64,
    /// Files added.
    pub files_added: u64,
    /// Files edited.
    pub files_edited: u64,
    /// Files removed.
    pub files_removed: u64,
}

impl GenerationReport {
    /// Accounts for one integration.
    pub fn record_integration(&mut self, integration: &Integration) {
        match integration {
            Integration::Merged {
                conflicts,
                deleted_source,
                ..
            } => {
                self.merges += 1;
                if !conflicts.is_empty() {
                    self.conflicted_merges += 1;
                }
                for conflict in conflicts {
                    match conflict {
                        ConflictResolution::KeptOurs(_) => self.conflicts_kept_ours += 1,
                        ConflictResolution::Removed(_) => self.conflicts_removed += 1,
                    }
                }
                if *deleted_source {
                    self.branches_deleted += 1;
                }
            }
            Integration::Rebased { .. } => self.rebases += 1,
            Integration::RebaseAborted { .. } => self.rebases_aborted += 1,
        }
    }

    /// Accounts for one file mutation.
    pub fn record_change(&mut self, change: &FileChange) {
        match change.operation {
            FileOperation::Add => self.files_added += 1,
            FileOperation::Edit => self.files_edited += 1,
            FileOperation::Remove => self.files_removed += 1,
        }
    }

    /// Commits created by file mutations, one per completed step.
    #[must_use]
    pub const fn file_commits(&self) -> u64 {
        self.files_added + self.files_edited + self.files_removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflicted_merge_counts_each_resolution() {
        let mut report = GenerationReport::default();
        report.record_integration(&Integration::Merged {
            source: "a".into(),
            destination: "b".into(),
            conflicts: vec![
                ConflictResolution::KeptOurs("x".into()),
                ConflictResolution::Removed("y".into()),
            ],
            deleted_source: true,
        });

        assert_eq!(report.merges, 1);
        assert_eq!(report.conflicted_merges, 1);
        assert_eq!(report.conflicts_kept_ours, 1);
        assert_eq!(report.conflicts_removed, 1);
        assert_eq!(report.branches_deleted, 1);
    }

    #[test]
    fn file_changes_feed_file_commits() {
        let mut report = GenerationReport::default();
        for operation in [FileOperation::Add, FileOperation::Edit, FileOperation::Remove] {
            report.record_change(&FileChange {
                operation,
                name: "lorem".into(),
            });
        }
        assert_eq!(report.file_commits(), 3);
    }
}
