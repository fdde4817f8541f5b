//! In-memory test doubles for the generator ports.
//!
//! [`MemoryVcs`] tracks branches, the checked-out branch and commits, and
//! records every call so tests can assert exact sequences. Merge conflicts
//! and failures are scripted up front. [`ScriptedSampler`] returns
//! predictable text.

use async_trait::async_trait;
use parking_lot::Mutex;
use rand::RngCore;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::text::{TextSampler, TextUnit};
use crate::vcs::{MergeOutcome, VcsError, VersionControl};

/// One recorded call on [`MemoryVcs`].
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VcsCall {
    IsRepository,
    Init,
    ListBranches,
    CheckoutNew(String),
    Checkout(String),
    MergeInto { source: String, destination: String },
    Rebase(String),
    AbortRebase,
    DiffConflicted,
    StageOurs(String),
    Remove(String),
    Stage(String),
    Commit(String),
    DeleteBranch(String),
}

/// A commit recorded by [`MemoryVcs`].
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRecord {
    pub branch: String,
    pub message: String,
}

#[derive(Debug, Default)]
struct State {
    initialized: bool,
    branches: Vec<String>,
    current: Option<String>,
    commits: Vec<CommitRecord>,
    calls: Vec<VcsCall>,
    unresolved: Vec<String>,
    scripted_conflicts: VecDeque<Vec<String>>,
    unstageable: Vec<String>,
    failing_rebases: usize,
    rebase_in_progress: bool,
}

/// Version-control fake backed by a mutex-guarded state.
#[derive(Debug, Default)]
pub struct MemoryVcs {
    state: Mutex<State>,
    working_tree: Option<PathBuf>,
}

fn rejected(reason: impl Into<String>) -> VcsError {
    VcsError::Rejected(reason.into())
}

impl MemoryVcs {
    /// An uninitialized repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// An initialized repository holding `branches`, with the first one
    /// checked out.
    #[must_use]
    pub fn with_branches<I, B>(self, branches: I) -> Self
    where
        I: IntoIterator<Item = B>,
        B: Into<String>,
    {
        {
            let mut state = self.state.lock();
            state.initialized = true;
            state.branches = branches.into_iter().map(Into::into).collect();
            state.current = state.branches.first().cloned();
        }
        self
    }

    /// Makes [`VersionControl::remove`] delete files under `dir`.
    #[must_use]
    pub fn with_working_tree(mut self, dir: impl AsRef<Path>) -> Self {
        self.working_tree = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Scripts the next merge to conflict on `paths`. Calls queue up.
    #[must_use]
    pub fn with_merge_conflicts<I, P>(self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        self.state
            .lock()
            .scripted_conflicts
            .push_back(paths.into_iter().map(Into::into).collect());
        self
    }

    /// Makes [`VersionControl::stage_ours`] fail for `paths`.
    #[must_use]
    pub fn with_unstageable_ours<I, P>(self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        self.state
            .lock()
            .unstageable
            .extend(paths.into_iter().map(Into::into));
        self
    }

    /// Makes the next `count` rebases fail.
    #[must_use]
    pub fn with_failing_rebases(self, count: usize) -> Self {
        self.state.lock().failing_rebases = count;
        self
    }

    /// Every call so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<VcsCall> {
        self.state.lock().calls.clone()
    }

    /// Checked-out branch, if any.
    #[must_use]
    pub fn current_branch(&self) -> Option<String> {
        self.state.lock().current.clone()
    }

    /// Commits recorded so far, oldest first.
    #[must_use]
    pub fn commits(&self) -> Vec<CommitRecord> {
        self.state.lock().commits.clone()
    }

    /// Local branches, in creation order.
    #[must_use]
    pub fn branches(&self) -> Vec<String> {
        self.state.lock().branches.clone()
    }

    fn record(&self, call: VcsCall) -> parking_lot::MutexGuard<'_, State> {
        let mut state = self.state.lock();
        state.calls.push(call);
        state
    }
}

#[async_trait]
impl VersionControl for MemoryVcs {
    async fn is_repository(&self) -> Result<bool, VcsError> {
        Ok(self.record(VcsCall::IsRepository).initialized)
    }

    async fn init(&self) -> Result<(), VcsError> {
        self.record(VcsCall::Init).initialized = true;
        Ok(())
    }

    async fn list_local_branches(&self) -> Result<Vec<String>, VcsError> {
        Ok(self.record(VcsCall::ListBranches).branches.clone())
    }

    async fn checkout_new(&self, name: &str) -> Result<(), VcsError> {
        let mut state = self.record(VcsCall::CheckoutNew(name.to_string()));
        if state.branches.iter().any(|b| b == name) {
            return Err(rejected(format!("branch '{name}' already exists")));
        }
        state.branches.push(name.to_string());
        state.current = Some(name.to_string());
        Ok(())
    }

    async fn checkout(&self, name: &str) -> Result<(), VcsError> {
        let mut state = self.record(VcsCall::Checkout(name.to_string()));
        if !state.branches.iter().any(|b| b == name) {
            return Err(rejected(format!("no branch '{name}'")));
        }
        state.current = Some(name.to_string());
        Ok(())
    }

    async fn merge_into(
        &self,
        source: &str,
        destination: &str,
    ) -> Result<MergeOutcome, VcsError> {
        let mut state = self.record(VcsCall::MergeInto {
            source: source.to_string(),
            destination: destination.to_string(),
        });
        if state.current.as_deref() != Some(destination) {
            return Err(rejected(format!("'{destination}' is not checked out")));
        }
        match state.scripted_conflicts.pop_front() {
            Some(paths) if !paths.is_empty() => {
                state.unresolved.clone_from(&paths);
                Ok(MergeOutcome::Conflicted(paths))
            }
            _ => Ok(MergeOutcome::Clean),
        }
    }

    async fn rebase(&self, onto: &str) -> Result<(), VcsError> {
        let mut state = self.record(VcsCall::Rebase(onto.to_string()));
        if state.failing_rebases > 0 {
            state.failing_rebases -= 1;
            state.rebase_in_progress = true;
            return Err(VcsError::CommandFailed {
                command: format!("rebase {onto}"),
                status: "exit status: 1".to_string(),
                stderr: "could not apply".to_string(),
            });
        }
        Ok(())
    }

    async fn abort_rebase(&self) -> Result<(), VcsError> {
        let mut state = self.record(VcsCall::AbortRebase);
        if !state.rebase_in_progress {
            return Err(rejected("no rebase in progress"));
        }
        state.rebase_in_progress = false;
        Ok(())
    }

    async fn diff_conflicted(&self) -> Result<Vec<String>, VcsError> {
        Ok(self.record(VcsCall::DiffConflicted).unresolved.clone())
    }

    async fn stage_ours(&self, path: &str) -> Result<(), VcsError> {
        let mut state = self.record(VcsCall::StageOurs(path.to_string()));
        if state.unstageable.iter().any(|p| p == path) {
            return Err(rejected(format!("'{path}' has no version on our side")));
        }
        state.unresolved.retain(|p| p != path);
        Ok(())
    }

    async fn remove(&self, path: &str) -> Result<(), VcsError> {
        let mut state = self.record(VcsCall::Remove(path.to_string()));
        state.unresolved.retain(|p| p != path);
        if let Some(dir) = &self.working_tree {
            let target = dir.join(path);
            match std::fs::remove_file(&target) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    return Err(VcsError::Spawn {
                        command: format!("rm {path}"),
                        source: e,
                    });
                }
            }
        }
        Ok(())
    }

    async fn stage(&self, path: &str) -> Result<(), VcsError> {
        drop(self.record(VcsCall::Stage(path.to_string())));
        Ok(())
    }

    async fn commit(&self, message: &str) -> Result<(), VcsError> {
        let mut state = self.record(VcsCall::Commit(message.to_string()));
        if !state.unresolved.is_empty() {
            return Err(rejected("unresolved conflicts"));
        }
        let Some(branch) = state.current.clone() else {
            return Err(rejected("no branch checked out"));
        };
        state.commits.push(CommitRecord {
            branch,
            message: message.to_string(),
        });
        Ok(())
    }

    async fn delete_local_branch(&self, name: &str) -> Result<(), VcsError> {
        let mut state = self.record(VcsCall::DeleteBranch(name.to_string()));
        if state.current.as_deref() == Some(name) {
            return Err(rejected(format!("cannot delete checked-out branch '{name}'")));
        }
        let before = state.branches.len();
        state.branches.retain(|b| b != name);
        if state.branches.len() == before {
            return Err(rejected(format!("no branch '{name}'")));
        }
        Ok(())
    }
}

/// Text sampler with fixed output.
///
/// Single words cycle through the scripted list; sentences are always
/// [`ScriptedSampler::SENTENCE`]; `Paragraphs(n)` yields `n` lines.
#[derive(Debug)]
pub struct ScriptedSampler {
    words: Vec<String>,
    next: AtomicUsize,
}

impl ScriptedSampler {
    /// The sentence returned for every sentence request.
    pub const SENTENCE: &'static str = "Lorem ipsum dolor sit amet.";

    /// Cycles through `words`, which must not be empty.
    #[must_use]
    pub fn new<I, W>(words: I) -> Self
    where
        I: IntoIterator<Item = W>,
        W: Into<String>,
    {
        let words: Vec<String> = words.into_iter().map(Into::into).collect();
        assert!(!words.is_empty(), "scripted sampler needs at least one word");
        Self {
            words,
            next: AtomicUsize::new(0),
        }
    }

    fn next_word(&self) -> String {
        let index = self.next.fetch_add(1, Ordering::Relaxed);
        self.words[index % self.words.len()].clone()
    }
}

impl TextSampler for ScriptedSampler {
    fn sample(&self, unit: TextUnit, _rng: &mut dyn RngCore) -> String {
        match unit {
            TextUnit::Words(n) => (0..n).map(|_| self.next_word()).collect::<Vec<_>>().join(" "),
            TextUnit::Sentences(n) => vec![Self::SENTENCE; n].join(" "),
            TextUnit::Paragraphs(n) => vec![Self::SENTENCE; n].join("\n"),
        }
    }
}
