//! Git CLI adapter.
//!
//! Every operation spawns the configured git executable inside the
//! repository directory. Identity and editor come from the environment so
//! that the user's global configuration cannot change the generated history
//! or block on an interactive prompt.

use async_trait::async_trait;
use generator::{MergeOutcome, VcsError, VersionControl};
use std::path::{Path, PathBuf};
use std::process::Output;
use tokio::process::Command;
use tracing::{debug, trace};

use crate::infrastructure::config::GitSettings;

/// [`VersionControl`] backed by the `git` command line.
#[derive(Debug, Clone)]
pub struct GitCli {
    directory: PathBuf,
    settings: GitSettings,
}

impl GitCli {
    /// Creates an adapter for the repository at `directory`.
    pub fn new(directory: impl Into<PathBuf>, settings: GitSettings) -> Self {
        Self {
            directory: directory.into(),
            settings,
        }
    }

    /// Repository working directory.
    #[must_use]
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut command = Command::new(&self.settings.program);
        command
            .args(["-c", "commit.gpgsign=false", "-c", "core.autocrlf=false"])
            .args(args)
            .current_dir(&self.directory)
            .env("GIT_AUTHOR_NAME", &self.settings.author_name)
            .env("GIT_AUTHOR_EMAIL", &self.settings.author_email)
            .env("GIT_COMMITTER_NAME", &self.settings.author_name)
            .env("GIT_COMMITTER_EMAIL", &self.settings.author_email)
            .env("GIT_EDITOR", "true")
            .env("GIT_TERMINAL_PROMPT", "0")
            .kill_on_drop(true);
        command
    }

    /// Runs git and returns its output whatever the exit status.
    async fn output(&self, args: &[&str]) -> Result<Output, VcsError> {
        if !tokio::fs::try_exists(&self.directory)
            .await
            .unwrap_or(false)
        {
            return Err(VcsError::MissingDirectory(self.directory.clone()));
        }

        trace!(args = ?args, "git");
        self.command(args)
            .output()
            .await
            .map_err(|source| VcsError::Spawn {
                command: render(args),
                source,
            })
    }

    /// Runs git and returns its standard output, failing on a non-zero exit.
    async fn run(&self, args: &[&str]) -> Result<String, VcsError> {
        let output = self.output(args).await?;
        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).into_owned())
        } else {
            Err(failure(args, &output))
        }
    }
}

fn render(args: &[&str]) -> String {
    format!("git {}", args.join(" "))
}

fn failure(args: &[&str], output: &Output) -> VcsError {
    VcsError::CommandFailed {
        command: render(args),
        status: output.status.to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
    }
}

fn lines(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(ToString::to_string)
        .collect()
}

#[async_trait]
impl VersionControl for GitCli {
    async fn is_repository(&self) -> Result<bool, VcsError> {
        if !tokio::fs::try_exists(&self.directory)
            .await
            .unwrap_or(false)
        {
            return Err(VcsError::MissingDirectory(self.directory.clone()));
        }
        Ok(tokio::fs::try_exists(self.directory.join(".git"))
            .await
            .unwrap_or(false))
    }

    async fn init(&self) -> Result<(), VcsError> {
        self.run(&["init", "--quiet"]).await.map(drop)
    }

    async fn list_local_branches(&self) -> Result<Vec<String>, VcsError> {
        let stdout = self
            .run(&["for-each-ref", "--format=%(refname:short)", "refs/heads/"])
            .await?;
        Ok(lines(&stdout))
    }

    async fn checkout_new(&self, name: &str) -> Result<(), VcsError> {
        self.run(&["checkout", "--quiet", "-b", name]).await.map(drop)
    }

    async fn checkout(&self, name: &str) -> Result<(), VcsError> {
        self.run(&["switch", "--quiet", name]).await.map(drop)
    }

    async fn merge_into(
        &self,
        source: &str,
        destination: &str,
    ) -> Result<MergeOutcome, VcsError> {
        let args = ["merge", "--no-edit", "--quiet", source];
        let output = self.output(&args).await?;
        if output.status.success() {
            debug!(source, destination, "merged cleanly");
            return Ok(MergeOutcome::Clean);
        }

        let conflicted = self.diff_conflicted().await?;
        if conflicted.is_empty() {
            // Failed for some other reason than conflicts.
            return Err(failure(&args, &output));
        }
        Ok(MergeOutcome::Conflicted(conflicted))
    }

    async fn rebase(&self, onto: &str) -> Result<(), VcsError> {
        self.run(&["rebase", "--quiet", onto]).await.map(drop)
    }

    async fn abort_rebase(&self) -> Result<(), VcsError> {
        self.run(&["rebase", "--abort"]).await.map(drop)
    }

    async fn diff_conflicted(&self) -> Result<Vec<String>, VcsError> {
        let stdout = self
            .run(&["diff", "--name-only", "--diff-filter=U"])
            .await?;
        Ok(lines(&stdout))
    }

    async fn stage_ours(&self, path: &str) -> Result<(), VcsError> {
        self.run(&["checkout", "--ours", "--", path]).await?;
        self.stage(path).await
    }

    async fn remove(&self, path: &str) -> Result<(), VcsError> {
        self.run(&["rm", "--quiet", "--", path]).await.map(drop)
    }

    async fn stage(&self, path: &str) -> Result<(), VcsError> {
        self.run(&["add", "--", path]).await.map(drop)
    }

    async fn commit(&self, message: &str) -> Result<(), VcsError> {
        self.run(&["commit", "--quiet", "--allow-empty", "-m", message])
            .await
            .map(drop)
    }

    async fn delete_local_branch(&self, name: &str) -> Result<(), VcsError> {
        self.run(&["branch", "-D", name]).await.map(drop)
    }
}
