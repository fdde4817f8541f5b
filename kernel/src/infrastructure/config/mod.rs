//! Configuration management for Grove.
//!
//! Settings are layered, lowest precedence first: built-in defaults, an
//! optional configuration file, `GROVE__*` environment variables and
//! finally command-line flags.
//!
//! # Example
//!
//! ```no_run
//! use clap::Parser;
//! use grove_kernel::infrastructure::{cli::Cli, config::Settings};
//!
//! let cli = Cli::parse();
//! let settings = Settings::load(&cli).expect("Failed to load configuration");
//! ```

pub mod git;
pub mod telemetry;

pub use git::GitSettings;
pub use telemetry::{LogFormat, TelemetrySettings};

use config::{Config, ConfigError, Environment, File};
use generator::{GeneratorConfig, ProbabilityConfig};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::cli::Cli;

/// Prefix of the environment variables read as configuration.
pub const ENV_PREFIX: &str = "GROVE";

/// Tolerance when checking that the file weights sum to one.
const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

/// Errors raised while loading or validating settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// A source could not be read or the merged result did not deserialize.
    #[error("failed to load configuration: {0}")]
    Load(#[from] ConfigError),

    /// A tree width bound is zero.
    #[error("{name} must be at least 1")]
    ZeroWidth {
        /// Offending setting.
        name: &'static str,
    },

    /// The tree width bounds are inverted.
    #[error("min_tree_width ({min}) exceeds max_tree_width ({max})")]
    InvertedWidths {
        /// Lower bound.
        min: usize,
        /// Upper bound.
        max: usize,
    },

    /// A probability lies outside `[0, 1]`.
    #[error("probability {name} = {value} is outside [0, 1]")]
    Probability {
        /// Offending setting.
        name: &'static str,
        /// Configured value.
        value: f64,
    },
}

/// Top-level configuration for a Grove run.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Settings {
    /// Shape of the history to generate.
    pub generator: GeneratorConfig,
    /// Probability thresholds.
    #[serde(default)]
    pub probabilities: ProbabilityConfig,
    /// Git adapter settings.
    pub git: GitSettings,
    /// Telemetry settings.
    pub telemetry: TelemetrySettings,
    /// Seed for the random source. Drawn from the OS when absent.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Settings {
    /// Loads settings from every source, reading `GROVE__*` variables from
    /// the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a source cannot be read, the result cannot be
    /// deserialized, or it fails [`Settings::validate`].
    pub fn load(cli: &Cli) -> Result<Self, SettingsError> {
        Self::load_with_env(cli, environment())
    }

    /// Loads settings with an explicit environment source.
    ///
    /// # Errors
    ///
    /// See [`Settings::load`].
    pub fn load_with_env(cli: &Cli, env: Environment) -> Result<Self, SettingsError> {
        let mut builder = Config::builder()
            // Start with default values
            .set_default("git.program", git::default_program())?
            .set_default("git.author_name", git::default_author_name())?
            .set_default("git.author_email", git::default_author_email())?
            .set_default("telemetry.log_level", telemetry::default_log_level())?
            .set_default("telemetry.log_format", LogFormat::default().to_string())?;

        if let Some(path) = &cli.config {
            builder = builder.add_source(File::from(path.as_path()));
        }

        let settings: Self = cli
            .apply_overrides(builder.add_source(env))?
            .build()?
            .try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Checks the invariants the generator relies on.
    ///
    /// # Errors
    ///
    /// Returns the first violated bound.
    pub fn validate(&self) -> Result<(), SettingsError> {
        let generator = &self.generator;
        if generator.max_tree_width == 0 {
            return Err(SettingsError::ZeroWidth {
                name: "max_tree_width",
            });
        }
        if generator.min_tree_width == 0 {
            return Err(SettingsError::ZeroWidth {
                name: "min_tree_width",
            });
        }
        if generator.min_tree_width > generator.max_tree_width {
            return Err(SettingsError::InvertedWidths {
                min: generator.min_tree_width,
                max: generator.max_tree_width,
            });
        }

        for (name, value) in self.named_probabilities() {
            if !(0.0..=1.0).contains(&value) {
                return Err(SettingsError::Probability { name, value });
            }
        }
        Ok(())
    }

    /// Non-fatal observations about the configuration.
    #[must_use]
    pub fn warnings(&self) -> Vec<String> {
        let total = self.probabilities.files.total();
        if (total - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            vec![format!(
                "file operation probabilities sum to {total}, not 1; thresholds are used as given"
            )]
        } else {
            Vec::new()
        }
    }

    fn named_probabilities(&self) -> [(&'static str, f64); 6] {
        let p = &self.probabilities;
        [
            ("files.add", p.files.add),
            ("files.edit", p.files.edit),
            ("files.remove", p.files.remove),
            ("branch", p.branch),
            ("merge", p.merge),
            ("delete_after_merge", p.delete_after_merge),
        ]
    }
}

/// The `GROVE__SECTION__KEY` environment source.
#[must_use]
pub fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use config::Map;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("grove").chain(args.iter().copied())).unwrap()
    }

    fn env(vars: &[(&str, &str)]) -> Environment {
        let map: Map<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        environment().source(Some(map))
    }

    #[test]
    fn defaults_apply_when_only_directory_is_given() {
        let settings = Settings::load_with_env(&cli(&["--directory", "repo"]), env(&[])).unwrap();

        assert_eq!(settings.generator, GeneratorConfig::new("repo"));
        assert_eq!(settings.probabilities, ProbabilityConfig::default());
        assert_eq!(settings.git, GitSettings::default());
        assert_eq!(settings.telemetry, TelemetrySettings::default());
        assert_eq!(settings.seed, None);
        assert!(settings.warnings().is_empty());
    }

    #[test]
    fn directory_is_required() {
        let err = Settings::load_with_env(&cli(&[]), env(&[])).unwrap_err();
        assert!(matches!(err, SettingsError::Load(_)));
    }

    #[test]
    fn environment_overrides_defaults() {
        let settings = Settings::load_with_env(
            &cli(&[]),
            env(&[
                ("GROVE__GENERATOR__DIRECTORY", "from-env"),
                ("GROVE__GENERATOR__COMMIT_COUNT", "42"),
                ("GROVE__PROBABILITIES__MERGE", "0.75"),
                ("GROVE__TELEMETRY__LOG_FORMAT", "json"),
            ]),
        )
        .unwrap();

        assert_eq!(settings.generator.directory.to_str(), Some("from-env"));
        assert_eq!(settings.generator.commit_count, 42);
        assert!((settings.probabilities.merge - 0.75).abs() < f64::EPSILON);
        assert_eq!(settings.telemetry.log_format, LogFormat::Json);
    }

    #[test]
    fn flags_override_environment() {
        let settings = Settings::load_with_env(
            &cli(&[
                "--directory",
                "from-cli",
                "--commit-count",
                "7",
                "--allow-rebase",
                "false",
                "--seed",
                "99",
            ]),
            env(&[
                ("GROVE__GENERATOR__DIRECTORY", "from-env"),
                ("GROVE__GENERATOR__COMMIT_COUNT", "42"),
            ]),
        )
        .unwrap();

        assert_eq!(settings.generator.directory.to_str(), Some("from-cli"));
        assert_eq!(settings.generator.commit_count, 7);
        assert!(settings.generator.allow_merge);
        assert!(!settings.generator.allow_rebase);
        assert_eq!(settings.seed, Some(99));
    }

    #[test]
    fn inverted_widths_are_rejected() {
        let err = Settings::load_with_env(
            &cli(&[
                "--directory",
                "repo",
                "--min-tree-width",
                "5",
                "--max-tree-width",
                "2",
            ]),
            env(&[]),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            SettingsError::InvertedWidths { min: 5, max: 2 }
        ));
    }

    #[test]
    fn zero_width_is_rejected() {
        let mut settings =
            Settings::load_with_env(&cli(&["--directory", "repo"]), env(&[])).unwrap();
        settings.generator.max_tree_width = 0;
        assert!(matches!(
            settings.validate(),
            Err(SettingsError::ZeroWidth {
                name: "max_tree_width"
            })
        ));
    }

    #[test]
    fn out_of_range_probability_is_rejected() {
        let err = Settings::load_with_env(
            &cli(&["--directory", "repo", "--merge-probability", "1.5"]),
            env(&[]),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            SettingsError::Probability { name: "merge", .. }
        ));
    }

    #[test]
    fn unbalanced_file_weights_only_warn() {
        let settings = Settings::load_with_env(
            &cli(&["--directory", "repo", "--add-probability", "0.5"]),
            env(&[]),
        )
        .unwrap();
        assert_eq!(settings.warnings().len(), 1);
    }
}
