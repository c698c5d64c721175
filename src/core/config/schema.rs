//! core::config::schema
//!
//! Configuration schema types.
//!
//! The same schema is used for the global file and the repo file; every
//! field is optional and unset fields fall through to the next scope.
//!
//! # Validation
//!
//! Config values are validated after parsing to ensure they conform to
//! expected formats (e.g., `fallback_branch` must be a valid branch name).

use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::core::types::BranchName;

/// Contents of one configuration file.
///
/// # Example
///
/// ```toml
/// main_remote = "origin"
/// fallback_branch = "master"
/// remote_priority = ["origin", "github", "upstream"]
/// hosts = ["github.example.com"]
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    /// Remote whose project is the repository's main project
    pub main_remote: Option<String>,

    /// Branch assumed when the main remote has no default-branch pointer
    pub fallback_branch: Option<String>,

    /// Canonical remote names tried, in order, when ranking publish remotes
    pub remote_priority: Option<Vec<String>>,

    /// Extra hosts recognized when parsing remote URLs
    pub hosts: Option<Vec<String>>,
}

impl FileConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(remote) = &self.main_remote {
            if remote.trim().is_empty() {
                return Err(ConfigError::InvalidValue(
                    "main_remote cannot be empty".into(),
                ));
            }
        }

        if let Some(branch) = &self.fallback_branch {
            BranchName::new(branch.as_str()).map_err(|e| {
                ConfigError::InvalidValue(format!("fallback_branch '{branch}': {e}"))
            })?;
        }

        if let Some(priority) = &self.remote_priority {
            for (i, name) in priority.iter().enumerate() {
                if name.trim().is_empty() {
                    return Err(ConfigError::InvalidValue(
                        "remote_priority entries cannot be empty".into(),
                    ));
                }
                if priority[..i].contains(name) {
                    return Err(ConfigError::InvalidValue(format!(
                        "remote_priority lists '{name}' more than once"
                    )));
                }
            }
        }

        if let Some(hosts) = &self.hosts {
            if hosts.iter().any(|h| h.trim().is_empty()) {
                return Err(ConfigError::InvalidValue(
                    "hosts entries cannot be empty".into(),
                ));
            }
        }

        Ok(())
    }
}
