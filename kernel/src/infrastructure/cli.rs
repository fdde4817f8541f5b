//! Command-line interface.
//!
//! Every flag is optional and only overrides the matching setting when
//! present; see [`crate::infrastructure::config`] for the other sources.

use clap::Parser;
use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError};
use std::convert::Infallible;
use std::path::PathBuf;

/// Generate a random but realistic git history.
#[derive(Debug, Parser, Default)]
#[command(
    name = "grove",
    about = "Generate a random but realistic git history",
    version
)]
pub struct Cli {
    /// Configuration file (TOML, YAML or JSON).
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Target repository directory. Initialized if it holds no repository.
    #[arg(short, long, value_name = "PATH")]
    pub directory: Option<PathBuf>,

    /// Number of generation steps.
    #[arg(short = 'n', long)]
    pub commit_count: Option<u64>,

    /// Enable merges. Any value but `false` enables.
    #[arg(long, value_name = "BOOL", value_parser = parse_flag, num_args = 0..=1, default_missing_value = "true")]
    pub allow_merge: Option<bool>,

    /// Enable rebases. Any value but `false` enables.
    #[arg(long, value_name = "BOOL", value_parser = parse_flag, num_args = 0..=1, default_missing_value = "true")]
    pub allow_rebase: Option<bool>,

    /// Branches are only created while fewer than this many exist.
    #[arg(long)]
    pub max_tree_width: Option<u64>,

    /// Merged branches are only deleted while more than this many exist.
    #[arg(long)]
    pub min_tree_width: Option<u64>,

    /// What to do when a rebase fails.
    #[arg(long, value_parser = ["fail", "abort"])]
    pub rebase_conflicts: Option<String>,

    /// Chance of creating a branch below the maximum width.
    #[arg(long, value_name = "P")]
    pub branch_probability: Option<f64>,

    /// Chance of attempting a merge or rebase at the start of a step.
    #[arg(long, value_name = "P")]
    pub merge_probability: Option<f64>,

    /// Chance of deleting the source branch after a merge.
    #[arg(long, value_name = "P")]
    pub delete_after_merge_probability: Option<f64>,

    /// Weight of adding a file.
    #[arg(long, value_name = "P")]
    pub add_probability: Option<f64>,

    /// Weight of editing a file.
    #[arg(long, value_name = "P")]
    pub edit_probability: Option<f64>,

    /// Weight of removing a file.
    #[arg(long, value_name = "P")]
    pub remove_probability: Option<f64>,

    /// Seed for a reproducible run.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Log filter directive, e.g. `debug` or `generator=trace`.
    #[arg(long, value_name = "FILTER")]
    pub log_level: Option<String>,

    /// Log line format.
    #[arg(long, value_parser = ["pretty", "json"])]
    pub log_format: Option<String>,
}

/// `true` unless the value is the literal `false`.
fn parse_flag(value: &str) -> Result<bool, Infallible> {
    Ok(value != "false")
}

impl Cli {
    /// Layers every flag that was given on top of `builder`.
    ///
    /// # Errors
    ///
    /// Returns an error if an override key is rejected.
    pub fn apply_overrides(
        &self,
        builder: ConfigBuilder<DefaultState>,
    ) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        builder
            .set_override_option(
                "generator.directory",
                self.directory
                    .as_ref()
                    .map(|d| d.to_string_lossy().into_owned()),
            )?
            .set_override_option("generator.commit_count", self.commit_count)?
            .set_override_option("generator.allow_merge", self.allow_merge)?
            .set_override_option("generator.allow_rebase", self.allow_rebase)?
            .set_override_option("generator.max_tree_width", self.max_tree_width)?
            .set_override_option("generator.min_tree_width", self.min_tree_width)?
            .set_override_option("generator.rebase_conflicts", self.rebase_conflicts.clone())?
            .set_override_option("probabilities.branch", self.branch_probability)?
            .set_override_option("probabilities.merge", self.merge_probability)?
            .set_override_option(
                "probabilities.delete_after_merge",
                self.delete_after_merge_probability,
            )?
            .set_override_option("probabilities.files.add", self.add_probability)?
            .set_override_option("probabilities.files.edit", self.edit_probability)?
            .set_override_option("probabilities.files.remove", self.remove_probability)?
            .set_override_option("seed", self.seed)?
            .set_override_option("telemetry.log_level", self.log_level.clone())?
            .set_override_option("telemetry.log_format", self.log_format.clone())
    }
}
