//! Shared test utilities for integration tests.
//!
//! Provides settings construction and read-only git queries used to inspect
//! generated repositories.

#![allow(dead_code)]

use anyhow::{Context, Result, bail};
use generator::{GeneratorConfig, ProbabilityConfig};
use grove_kernel::infrastructure::config::{GitSettings, Settings, TelemetrySettings};
use std::path::Path;
use std::process::Command;

/// Whether a usable `git` is on `PATH`.
pub fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .is_ok_and(|o| o.status.success())
}

/// Settings for a seeded run in `dir`.
pub fn settings(dir: &Path, commit_count: u64, seed: u64) -> Settings {
    Settings {
        generator: GeneratorConfig::new(dir).with_commit_count(commit_count),
        probabilities: ProbabilityConfig::default(),
        git: GitSettings::default(),
        telemetry: TelemetrySettings::default(),
        seed: Some(seed),
    }
}

/// Runs `git` in `dir` and returns its trimmed standard output.
pub fn git(dir: &Path, args: &[&str]) -> Result<String> {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .with_context(|| format!("Failed to run git {}", args.join(" ")))?;
    if !output.status.success() {
        bail!(
            "git {} failed: {}",
            args.join(" "),
            String::from_utf8_lossy(&output.stderr)
        );
    }
    Ok(String::from_utf8(output.stdout)?.trim().to_string())
}

/// Non-empty output lines of a git query.
pub fn git_lines(dir: &Path, args: &[&str]) -> Result<Vec<String>> {
    Ok(git(dir, args)?
        .lines()
        .filter(|l| !l.is_empty())
        .map(ToString::to_string)
        .collect())
}

/// Local branch names.
pub fn branches(dir: &Path) -> Result<Vec<String>> {
    git_lines(dir, &["for-each-ref", "--format=%(refname:short)", "refs/heads/"])
}

/// Commits reachable from any ref.
pub fn commit_count(dir: &Path) -> Result<u64> {
    Ok(git(dir, &["rev-list", "--all", "--count"])?.parse()?)
}

/// Subjects of every reachable commit, sorted.
pub fn subjects(dir: &Path) -> Result<Vec<String>> {
    let mut subjects = git_lines(dir, &["log", "--all", "--format=%s"])?;
    subjects.sort();
    Ok(subjects)
}

/// Non-hidden regular files in the working tree.
pub fn working_files(dir: &Path) -> Result<Vec<String>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if entry.file_type()?.is_file() && !name.starts_with('.') {
            files.push(name);
        }
    }
    files.sort();
    Ok(files)
}
