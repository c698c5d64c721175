//! core::config
//!
//! Configuration schema and loading.
//!
//! # Overview
//!
//! Configuration has two scopes:
//! - **Global**: User-level settings
//! - **Repo**: Repository-level overrides
//!
//! # Precedence
//!
//! Configuration values are resolved in this order (later overrides earlier):
//! 1. Default values
//! 2. Global config file
//! 3. Repo config file
//!
//! # Global Config Locations
//!
//! Searched in order:
//! 1. `$REMOTEWORK_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/remotework/config.toml`
//! 3. `~/.remotework/config.toml`
//!
//! # Repo Config Location
//!
//! `<git_dir>/remotework/config.toml`
//!
//! # Example
//!
//! ```no_run
//! use remotework::core::config::Config;
//! use std::path::Path;
//!
//! let config = Config::load(Some(Path::new("/path/to/repo/.git"))).unwrap();
//! println!("Main remote: {}", config.main_remote());
//! println!("Publish order: {:?}", config.remote_priority());
//! ```

pub mod schema;

pub use schema::FileConfig;

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::types::{Branch, BranchName};
use crate::forge::KnownHosts;

/// Remote that names the repository's main project.
pub const DEFAULT_MAIN_REMOTE: &str = "origin";

/// Branch assumed when the main remote has no default-branch pointer.
pub const DEFAULT_FALLBACK_BRANCH: &str = "master";

/// Canonical remote names tried, in order, when ranking publish remotes.
pub const DEFAULT_REMOTE_PRIORITY: [&str; 3] = ["origin", "github", "upstream"];

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Merged configuration from all sources.
///
/// Accessors apply precedence rules automatically: repo config overrides
/// global config, which overrides the built-in defaults.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Global configuration
    pub global: FileConfig,
    /// Repository configuration (if found)
    pub repo: Option<FileConfig>,
    global_path: Option<PathBuf>,
    repo_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from default locations.
    ///
    /// If `git_dir` is provided, also loads the repo-specific config.
    ///
    /// # Errors
    ///
    /// Returns an error if config files exist but cannot be parsed or hold
    /// invalid values. Missing config files are not an error.
    pub fn load(git_dir: Option<&Path>) -> Result<Self, ConfigError> {
        let global_path = Self::find_global();
        let repo_path = git_dir
            .map(Self::repo_config_path)
            .filter(|path| path.exists());
        Self::load_from(global_path.as_deref(), repo_path.as_deref())
    }

    /// Load configuration from explicit file paths.
    pub fn load_from(global: Option<&Path>, repo: Option<&Path>) -> Result<Self, ConfigError> {
        let global_config = match global {
            Some(path) => Self::read_file(path)?,
            None => FileConfig::default(),
        };
        let repo_config = repo.map(Self::read_file).transpose()?;

        global_config.validate()?;
        if let Some(ref r) = repo_config {
            r.validate()?;
        }

        tracing::debug!(
            global = ?global,
            repo = ?repo,
            "loaded configuration"
        );

        Ok(Config {
            global: global_config,
            repo: repo_config,
            global_path: global.map(Path::to_path_buf),
            repo_path: repo.map(Path::to_path_buf),
        })
    }

    /// Locate the global config file, if any exists.
    fn find_global() -> Option<PathBuf> {
        if let Ok(path) = std::env::var("REMOTEWORK_CONFIG") {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        if let Ok(xdg_home) = std::env::var("XDG_CONFIG_HOME") {
            let path = PathBuf::from(xdg_home).join("remotework/config.toml");
            if path.exists() {
                return Some(path);
            }
        }

        dirs::home_dir()
            .map(|home| home.join(".remotework/config.toml"))
            .filter(|path| path.exists())
    }

    /// Read and parse one config file.
    fn read_file(path: &Path) -> Result<FileConfig, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Canonical path for repo config inside a `.git` directory.
    pub fn repo_config_path(git_dir: &Path) -> PathBuf {
        git_dir.join("remotework/config.toml")
    }

    // =========================================================================
    // Accessor methods with precedence
    // =========================================================================

    /// Pick a field from the repo config, falling back to the global config.
    fn layered<'a, T>(&'a self, field: impl Fn(&'a FileConfig) -> Option<&'a T>) -> Option<&'a T>
    where
        T: ?Sized,
    {
        self.repo
            .as_ref()
            .and_then(&field)
            .or_else(|| field(&self.global))
    }

    /// Remote whose project is the repository's main project.
    ///
    /// Defaults to "origin".
    pub fn main_remote(&self) -> &str {
        self.layered(|c| c.main_remote.as_deref())
            .unwrap_or(DEFAULT_MAIN_REMOTE)
    }

    /// Branch name assumed when no default-branch pointer exists.
    ///
    /// Defaults to "master".
    pub fn fallback_branch(&self) -> &str {
        self.layered(|c| c.fallback_branch.as_deref())
            .unwrap_or(DEFAULT_FALLBACK_BRANCH)
    }

    /// Canonical publish remote order.
    ///
    /// Defaults to `origin`, `github`, `upstream`.
    pub fn remote_priority(&self) -> Vec<String> {
        match self.layered(|c| c.remote_priority.as_ref()) {
            Some(names) => names.clone(),
            None => DEFAULT_REMOTE_PRIORITY.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Hosts recognized when parsing remote URLs.
    pub fn known_hosts(&self) -> KnownHosts {
        match self.layered(|c| c.hosts.as_ref()) {
            Some(hosts) => KnownHosts::new(hosts),
            None => KnownHosts::default(),
        }
    }

    /// Get the path to the loaded global config file.
    pub fn global_config_loaded_from(&self) -> Option<&Path> {
        self.global_path.as_deref()
    }

    /// Get the path to the loaded repo config file.
    pub fn repo_config_loaded_from(&self) -> Option<&Path> {
        self.repo_path.as_deref()
    }

    /// Resolved settings for a resolution session.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if the fallback branch is invalid,
    /// which can only happen for hand-built configs that skipped validation.
    pub fn settings(&self) -> Result<ResolverSettings, ConfigError> {
        let fallback = BranchName::new(self.fallback_branch())
            .map_err(|e| ConfigError::InvalidValue(e.to_string()))?;

        Ok(ResolverSettings {
            main_remote: self.main_remote().to_string(),
            fallback_branch: Branch::local(&fallback),
            remote_priority: self.remote_priority(),
            hosts: self.known_hosts(),
        })
    }
}

/// Settings consulted by the resolution engine.
///
/// The canonical remote order lives here rather than inside the ranker so
/// callers and tests can see and override it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverSettings {
    /// Remote whose project is the main project
    pub main_remote: String,
    /// Default branch used when the main remote has no HEAD pointer
    pub fallback_branch: Branch,
    /// Canonical remote names in publish priority order
    pub remote_priority: Vec<String>,
    /// Hosts recognized when parsing remote URLs
    pub hosts: KnownHosts,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            main_remote: DEFAULT_MAIN_REMOTE.to_string(),
            fallback_branch: Branch::new(format!("refs/heads/{DEFAULT_FALLBACK_BRANCH}")),
            remote_priority: DEFAULT_REMOTE_PRIORITY
                .iter()
                .map(|s| s.to_string())
                .collect(),
            hosts: KnownHosts::default(),
        }
    }
}
