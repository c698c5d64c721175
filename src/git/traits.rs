//! git::traits
//!
//! The primitive queries the resolution engine needs from Git.
//!
//! # Design
//!
//! Every method is a synchronous, read-only query. Absence is reported as
//! `Ok(None)` (detached HEAD, unset upstream, unset config key) so callers
//! can tell "Git said no" apart from "Git could not be asked", which is a
//! [`GitError`].
//!
//! Implementations:
//! - [`Git`](super::Git): a real repository via `git2`
//! - [`MockBackend`](super::mock::MockBackend): in-memory, for tests

use super::GitError;

/// A configured remote as Git reports it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteEntry {
    /// Remote name (`remote.<name>`)
    pub name: String,
    /// Fetch URL
    pub url: String,
    /// Push URL, if configured separately
    pub push_url: Option<String>,
}

impl RemoteEntry {
    /// A remote with only a fetch URL.
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            push_url: None,
        }
    }
}

/// Read-only access to a repository's refs and configuration.
pub trait GitBackend {
    /// All configured remotes, in Git's enumeration order.
    fn list_remotes(&self) -> Result<Vec<RemoteEntry>, GitError>;

    /// The ref HEAD points at (`refs/heads/<name>`).
    ///
    /// Returns `None` when HEAD is detached.
    fn head_ref(&self) -> Result<Option<String>, GitError>;

    /// The configured upstream of a local branch ref.
    ///
    /// Returns `None` when no upstream is configured.
    fn tracking_ref(&self, local_ref: &str) -> Result<Option<String>, GitError>;

    /// A configuration value (e.g., `push.default`).
    fn config_value(&self, key: &str) -> Result<Option<String>, GitError>;

    /// The target of a symbolic ref (e.g., `refs/remotes/origin/HEAD`).
    ///
    /// Returns `None` if the ref is missing or not symbolic.
    fn symbolic_ref_target(&self, refname: &str) -> Result<Option<String>, GitError>;

    /// Whether a ref exists locally.
    fn ref_exists(&self, refname: &str) -> bool;
}
