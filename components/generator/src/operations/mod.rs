//! File Operations - One mutation plus one commit per step
//!
//! [`FileOperation`] is a closed set of variants sharing a single
//! [`FileOperation::execute`]. Each run picks its target, mutates the working
//! tree, stages the result and commits it with a message naming the
//! operation and the file.

mod add;
mod edit;
mod remove;

use rand::Rng;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::domain::GeneratorError;
use crate::text::TextSampler;
use crate::vcs::VersionControl;

/// File mutation performed by a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileOperation {
    /// Create a new file filled with paragraphs.
    Add,
    /// Rewrite random line blocks of an existing file.
    Edit,
    /// Delete an existing file.
    Remove,
}

impl fmt::Display for FileOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Add => write!(f, "add"),
            Self::Edit => write!(f, "edit"),
            Self::Remove => write!(f, "remove"),
        }
    }
}

/// Outcome of an executed [`FileOperation`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChange {
    /// Operation that ran.
    pub operation: FileOperation,
    /// Base name of the file it touched.
    pub name: String,
}

impl FileChange {
    /// Commit message recorded for this change.
    #[must_use]
    pub fn commit_message(&self) -> String {
        commit_message(self.operation, &self.name)
    }
}

pub(crate) fn commit_message(operation: FileOperation, name: &str) -> String {
    format!("{operation} file {name}")
}

/// Working directory plus the collaborators a file operation is bound to.
pub struct Workspace<'a, V: ?Sized, S: ?Sized> {
    directory: &'a Path,
    vcs: &'a V,
    sampler: &'a S,
}

impl<'a, V, S> Workspace<'a, V, S>
where
    V: VersionControl + ?Sized,
    S: TextSampler + ?Sized,
{
    /// Binds a directory to a backend and a text source.
    #[must_use]
    pub const fn new(directory: &'a Path, vcs: &'a V, sampler: &'a S) -> Self {
        Self {
            directory,
            vcs,
            sampler,
        }
    }

    /// Repository working directory.
    #[must_use]
    pub const fn directory(&self) -> &Path {
        self.directory
    }

    /// Non-hidden regular files of the working tree, sorted by name.
    ///
    /// # Errors
    /// Returns an I/O error if the directory cannot be read.
    pub async fn files(&self) -> Result<Vec<String>, GeneratorError> {
        list_files(self.directory).await
    }

    /// Picks one existing file uniformly.
    async fn choose_file<R: Rng>(&self, rng: &mut R) -> Result<String, GeneratorError> {
        let files = self.files().await?;
        if files.is_empty() {
            return Err(GeneratorError::NoFiles(self.directory.to_path_buf()));
        }
        let index = rng.random_range(0..files.len());
        Ok(files[index].clone())
    }

    fn path_of(&self, name: &str) -> PathBuf {
        self.directory.join(name)
    }
}

impl FileOperation {
    /// Performs the mutation and its commit.
    ///
    /// # Errors
    /// Propagates filesystem and backend failures unchanged; Edit and Remove
    /// fail with `NoFiles` on an empty tree.
    pub async fn execute<V, S, R>(
        self,
        workspace: &Workspace<'_, V, S>,
        rng: &mut R,
    ) -> Result<FileChange, GeneratorError>
    where
        V: VersionControl + ?Sized,
        S: TextSampler + ?Sized,
        R: Rng,
    {
        let name = match self {
            Self::Add => add::run(workspace, rng).await?,
            Self::Edit => edit::run(workspace, rng).await?,
            Self::Remove => remove::run(workspace, rng).await?,
        };
        Ok(FileChange {
            operation: self,
            name,
        })
    }
}

/// Non-hidden regular files of `directory`, sorted by name.
///
/// Sorting keeps seeded runs independent of directory iteration order.
///
/// # Errors
/// Returns an I/O error if the directory cannot be read.
pub async fn list_files(directory: &Path) -> Result<Vec<String>, GeneratorError> {
    let mut files = Vec::new();
    for (name, is_file) in read_entries(directory).await? {
        if is_file && !name.starts_with('.') {
            files.push(name);
        }
    }
    files.sort();
    Ok(files)
}

/// Every entry name of `directory`, hidden or not.
async fn entry_names(directory: &Path) -> Result<Vec<String>, GeneratorError> {
    Ok(read_entries(directory)
        .await?
        .into_iter()
        .map(|(name, _)| name)
        .collect())
}

async fn read_entries(directory: &Path) -> Result<Vec<(String, bool)>, GeneratorError> {
    let mut reader = tokio::fs::read_dir(directory)
        .await
        .map_err(|e| GeneratorError::io(directory, e))?;
    let mut entries = Vec::new();
    while let Some(entry) = reader
        .next_entry()
        .await
        .map_err(|e| GeneratorError::io(directory, e))?
    {
        let file_type = entry
            .file_type()
            .await
            .map_err(|e| GeneratorError::io(entry.path(), e))?;
        entries.push((
            entry.file_name().to_string_lossy().into_owned(),
            file_type.is_file(),
        ));
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MemoryVcs, ScriptedSampler, VcsCall};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn commit_messages_name_operation_and_file() {
        assert_eq!(commit_message(FileOperation::Add, "lorem"), "add file lorem");
        assert_eq!(commit_message(FileOperation::Edit, "ipsum"), "edit file ipsum");
        assert_eq!(
            commit_message(FileOperation::Remove, "dolor"),
            "remove file dolor"
        );
    }

    #[tokio::test]
    async fn listing_skips_hidden_entries_and_directories() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("beta"), "b").unwrap();
        std::fs::write(dir.path().join("alpha"), "a").unwrap();
        std::fs::write(dir.path().join(".hidden"), "h").unwrap();
        std::fs::create_dir(dir.path().join(".git")).unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();

        let files = list_files(dir.path()).await.unwrap();
        assert_eq!(files, vec!["alpha".to_string(), "beta".to_string()]);
    }

    #[tokio::test]
    async fn edit_and_remove_need_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let vcs = MemoryVcs::new();
        let sampler = ScriptedSampler::new(["lorem"]);
        let workspace = Workspace::new(dir.path(), &vcs, &sampler);
        let mut rng = StdRng::seed_from_u64(5);

        for operation in [FileOperation::Edit, FileOperation::Remove] {
            let err = operation.execute(&workspace, &mut rng).await.unwrap_err();
            assert!(matches!(err, GeneratorError::NoFiles(_)));
        }
        assert!(vcs.calls().is_empty());
    }

    #[tokio::test]
    async fn execute_reports_the_touched_file() {
        let dir = tempfile::tempdir().unwrap();
        let vcs = MemoryVcs::new();
        let sampler = ScriptedSampler::new(["lorem"]);
        let workspace = Workspace::new(dir.path(), &vcs, &sampler);
        let mut rng = StdRng::seed_from_u64(5);

        let change = FileOperation::Add
            .execute(&workspace, &mut rng)
            .await
            .unwrap();
        assert_eq!(change.name, "lorem");
        assert_eq!(change.commit_message(), "add file lorem");
        assert_eq!(
            vcs.calls(),
            vec![
                VcsCall::Stage("lorem".into()),
                VcsCall::Commit("add file lorem".into())
            ]
        );
    }
}
