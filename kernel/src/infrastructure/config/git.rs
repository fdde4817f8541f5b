//! Git adapter configuration.
//!
//! The identity below is handed to every git invocation through the
//! environment, so generated history never depends on the user's global
//! git configuration.

use serde::{Deserialize, Serialize};

/// Git adapter settings.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct GitSettings {
    /// Executable invoked for every operation.
    #[serde(default = "default_program")]
    pub program: String,
    /// Author and committer name.
    #[serde(default = "default_author_name")]
    pub author_name: String,
    /// Author and committer e-mail.
    #[serde(default = "default_author_email")]
    pub author_email: String,
}

impl Default for GitSettings {
    fn default() -> Self {
        Self {
            program: default_program(),
            author_name: default_author_name(),
            author_email: default_author_email(),
        }
    }
}

pub(super) fn default_program() -> String {
    "git".to_string()
}

pub(super) fn default_author_name() -> String {
    "Grove".to_string()
}

pub(super) fn default_author_email() -> String {
    "grove@localhost".to_string()
}
