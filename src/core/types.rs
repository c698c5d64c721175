//! core::types
//!
//! Strong types for core domain concepts.
//!
//! # Types
//!
//! - [`BranchName`] - Validated short branch name (`feature/foo`)
//! - [`Branch`] - Fully-qualified ref (`refs/heads/...` or `refs/remotes/...`)
//!
//! # Validation
//!
//! `BranchName` enforces Git's refname rules at construction time. `Branch`
//! wraps refs reported by Git itself, so it is never rejected; its accessors
//! are best-effort parses of the ref's structure and never fail.
//!
//! # Examples
//!
//! ```
//! use remotework::core::types::{Branch, BranchName};
//!
//! let name = BranchName::new("feature/my-branch").unwrap();
//! let local = Branch::local(&name);
//! assert_eq!(local.as_str(), "refs/heads/feature/my-branch");
//! assert!(!local.is_remote());
//!
//! let tracking = Branch::new("refs/remotes/fork/feature/my-branch");
//! assert_eq!(tracking.short_name(), "feature/my-branch");
//! assert_eq!(tracking.remote_name(), Some("fork"));
//!
//! assert!(BranchName::new("invalid..name").is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Namespace holding local branches.
pub const LOCAL_BRANCH_PREFIX: &str = "refs/heads/";

/// Namespace holding remote-tracking branches.
pub const REMOTE_BRANCH_PREFIX: &str = "refs/remotes/";

/// Errors from type validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid branch name: {0}")]
    InvalidBranchName(String),
}

/// A validated Git branch name, without any `refs/` namespace.
///
/// Branch names must conform to Git's refname rules (see `git check-ref-format`):
/// - Cannot be empty or exactly `@`
/// - Cannot start with `.` or `-`, or end with `.lock` or `/`
/// - Cannot contain `..`, `@{`, `//`, ASCII control characters, or any of
///   ` ~^:\?*[`
///
/// # Example
///
/// ```
/// use remotework::core::types::BranchName;
///
/// let name = BranchName::new("master").unwrap();
/// assert_eq!(name.as_str(), "master");
///
/// assert!(BranchName::new("").is_err());
/// assert!(BranchName::new("has space").is_err());
/// assert!(BranchName::new("@").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BranchName(String);

impl BranchName {
    /// Create a new validated branch name.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidBranchName` if the name violates Git's refname rules.
    pub fn new(name: impl Into<String>) -> Result<Self, TypeError> {
        let name = name.into();
        if let Some(problem) = refname_problem(&name) {
            return Err(TypeError::InvalidBranchName(problem));
        }
        Ok(Self(name))
    }

    /// Get the branch name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Describe the first refname rule `name` violates, if any.
fn refname_problem(name: &str) -> Option<String> {
    const INVALID_CHARS: [char; 8] = [' ', '~', '^', ':', '\\', '?', '*', '['];

    if name.is_empty() {
        return Some("branch name cannot be empty".into());
    }
    if name == "@" {
        return Some("branch name cannot be '@' (reserved)".into());
    }
    if name.starts_with('-') {
        return Some("branch name cannot start with '-'".into());
    }
    if name.ends_with('/') {
        return Some("branch name cannot end with '/'".into());
    }
    for bad in ["..", "@{", "//"] {
        if name.contains(bad) {
            return Some(format!("branch name cannot contain '{bad}'"));
        }
    }
    if let Some(c) = name.chars().find(|c| INVALID_CHARS.contains(c)) {
        return Some(format!("branch name cannot contain '{c}'"));
    }
    if name.chars().any(|c| c.is_ascii_control()) {
        return Some("branch name cannot contain control characters".into());
    }
    // Covers a leading '.' and a trailing ".lock" on the whole name too.
    for component in name.split('/') {
        if component.starts_with('.') {
            return Some("path component cannot start with '.'".into());
        }
        if component.ends_with(".lock") {
            return Some("path component cannot end with '.lock'".into());
        }
    }
    None
}

impl TryFrom<String> for BranchName {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<BranchName> for String {
    fn from(name: BranchName) -> Self {
        name.0
    }
}

impl AsRef<str> for BranchName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BranchName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A fully-qualified branch reference.
///
/// Holds either a local branch (`refs/heads/<name>`) or a remote-tracking
/// branch (`refs/remotes/<remote>/<name>`). Values are transient: they are
/// recomputed on every resolution and never cached.
///
/// # Example
///
/// ```
/// use remotework::core::types::Branch;
///
/// let branch = Branch::new("refs/heads/feature");
/// assert_eq!(branch.short_name(), "feature");
/// assert_eq!(branch.remote_name(), None);
///
/// let tracking = Branch::remote_tracking("origin", "feature");
/// assert_eq!(tracking.as_str(), "refs/remotes/origin/feature");
/// assert!(tracking.is_remote());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Branch(String);

impl Branch {
    /// Wrap a fully-qualified ref string as reported by Git.
    pub fn new(refname: impl Into<String>) -> Self {
        Self(refname.into())
    }

    /// The local branch ref for a validated name (`refs/heads/<name>`).
    pub fn local(name: &BranchName) -> Self {
        Self(format!("{LOCAL_BRANCH_PREFIX}{}", name.as_str()))
    }

    /// The remote-tracking ref `refs/remotes/<remote>/<short_name>`.
    pub fn remote_tracking(remote: &str, short_name: &str) -> Self {
        Self(format!("{REMOTE_BRANCH_PREFIX}{remote}/{short_name}"))
    }

    /// The full ref string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The branch name without its namespace.
    ///
    /// Strips `refs/heads/` from local branches and `refs/remotes/<remote>/`
    /// from remote-tracking branches. For any other `refs/<ns>/` ref the
    /// first namespace segment is stripped; strings outside `refs/` are
    /// returned unchanged.
    ///
    /// ```
    /// use remotework::core::types::Branch;
    ///
    /// assert_eq!(Branch::new("refs/heads/a/b").short_name(), "a/b");
    /// assert_eq!(Branch::new("refs/remotes/origin/a/b").short_name(), "a/b");
    /// assert_eq!(Branch::new("refs/tags/v1").short_name(), "v1");
    /// assert_eq!(Branch::new("main").short_name(), "main");
    /// ```
    pub fn short_name(&self) -> &str {
        if let Some(rest) = self.0.strip_prefix(REMOTE_BRANCH_PREFIX) {
            if let Some((_, short)) = rest.split_once('/') {
                return short;
            }
        }
        self.0
            .strip_prefix("refs/")
            .and_then(|rest| rest.split_once('/'))
            .map(|(_, short)| short)
            .unwrap_or(&self.0)
    }

    /// Whether this ref lives under the remote-tracking namespace.
    pub fn is_remote(&self) -> bool {
        self.0.starts_with(REMOTE_BRANCH_PREFIX)
    }

    /// The remote owning this remote-tracking ref.
    ///
    /// Returns `None` for refs outside `refs/remotes/`.
    pub fn remote_name(&self) -> Option<&str> {
        let rest = self.0.strip_prefix(REMOTE_BRANCH_PREFIX)?;
        let name = rest.split('/').next().unwrap_or(rest);
        (!name.is_empty()).then_some(name)
    }
}

impl From<Branch> for String {
    fn from(branch: Branch) -> Self {
        branch.0
    }
}

impl AsRef<str> for Branch {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Branch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
