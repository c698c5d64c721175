//! git::interface
//!
//! Git interface implementation using git2.
//!
//! This module provides the **single doorway** to the repository. All
//! reads of refs, remotes, and configuration flow through [`Git`], which
//! normalizes `git2` failures into [`GitError`].
//!
//! # Example
//!
//! ```ignore
//! use remotework::git::{Git, GitBackend};
//! use std::path::Path;
//!
//! let git = Git::open(Path::new("."))?;
//! for remote in git.list_remotes()? {
//!     println!("{} -> {}", remote.name, remote.url);
//! }
//! ```

use std::path::{Path, PathBuf};

use thiserror::Error;

use super::traits::{GitBackend, RemoteEntry};

/// Errors from Git operations.
#[derive(Debug, Error)]
pub enum GitError {
    /// Not inside a Git repository.
    #[error("not a git repository: {path}")]
    NotARepo {
        /// The path that was searched
        path: PathBuf,
    },

    /// Permission or filesystem error.
    #[error("repository access error: {message}")]
    AccessError {
        /// Description of the error
        message: String,
    },

    /// Internal git2 error.
    #[error("git error: {message}")]
    Internal {
        /// The error message
        message: String,
    },
}

impl GitError {
    /// Create a GitError from a git2::Error with the query that failed.
    fn from_git2(err: git2::Error, context: &str) -> Self {
        match err.code() {
            git2::ErrorCode::Locked => GitError::AccessError {
                message: format!("{context}: repository is locked: {}", err.message()),
            },
            _ => GitError::Internal {
                message: format!("{}: {}", context, err.message()),
            },
        }
    }
}

/// The Git interface over a real repository.
pub struct Git {
    /// The underlying git2 repository
    repo: git2::Repository,
}

impl std::fmt::Debug for Git {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Git")
            .field("path", &self.repo.path())
            .finish()
    }
}

impl Git {
    /// Open a repository at the given path.
    ///
    /// Uses `git2::Repository::discover`, so `path` can be any directory
    /// within the repository.
    ///
    /// # Errors
    ///
    /// - [`GitError::NotARepo`] if no repository is found
    pub fn open(path: &Path) -> Result<Self, GitError> {
        let repo = git2::Repository::discover(path).map_err(|_| GitError::NotARepo {
            path: path.to_path_buf(),
        })?;

        Ok(Self { repo })
    }

    /// Get direct access to the .git directory path.
    pub fn git_dir(&self) -> &Path {
        self.repo.path()
    }

    /// Look up a reference, mapping "not found" to `None`.
    fn find_reference(&self, refname: &str) -> Result<Option<git2::Reference<'_>>, GitError> {
        match self.repo.find_reference(refname) {
            Ok(reference) => Ok(Some(reference)),
            Err(e) if is_absent(&e) => Ok(None),
            Err(e) => Err(GitError::from_git2(e, refname)),
        }
    }
}

/// Whether a git2 error just means "no such thing".
fn is_absent(err: &git2::Error) -> bool {
    matches!(
        err.code(),
        git2::ErrorCode::NotFound | git2::ErrorCode::InvalidSpec
    )
}

impl GitBackend for Git {
    fn list_remotes(&self) -> Result<Vec<RemoteEntry>, GitError> {
        let names = self
            .repo
            .remotes()
            .map_err(|e| GitError::from_git2(e, "remote list"))?;

        let mut remotes = Vec::with_capacity(names.len());
        for name in names.iter().flatten() {
            let remote = self
                .repo
                .find_remote(name)
                .map_err(|e| GitError::from_git2(e, name))?;

            // Non-UTF-8 URLs are kept, lossily, so the remote stays listed
            let url = String::from_utf8_lossy(remote.url_bytes()).into_owned();
            if remote.url().is_none() {
                tracing::warn!(remote = name, %url, "remote url is not valid UTF-8");
            }

            remotes.push(RemoteEntry {
                name: name.to_string(),
                url,
                push_url: remote
                    .pushurl_bytes()
                    .map(|bytes| String::from_utf8_lossy(bytes).into_owned()),
            });
        }

        Ok(remotes)
    }

    fn head_ref(&self) -> Result<Option<String>, GitError> {
        // Read HEAD itself rather than peeling it, so an unborn branch
        // still reports its name.
        let head = self
            .find_reference("HEAD")?
            .ok_or_else(|| GitError::Internal {
                message: "HEAD is missing".into(),
            })?;

        Ok(head
            .symbolic_target()
            .filter(|target| target.starts_with("refs/heads/"))
            .map(String::from))
    }

    fn tracking_ref(&self, local_ref: &str) -> Result<Option<String>, GitError> {
        match self.repo.branch_upstream_name(local_ref) {
            Ok(buf) => Ok(buf.as_str().map(String::from)),
            Err(e) if is_absent(&e) => Ok(None),
            Err(e) => Err(GitError::from_git2(e, local_ref)),
        }
    }

    fn config_value(&self, key: &str) -> Result<Option<String>, GitError> {
        let config = self
            .repo
            .config()
            .and_then(|mut c| c.snapshot())
            .map_err(|e| GitError::from_git2(e, "config"))?;

        match config.get_string(key) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.code() == git2::ErrorCode::NotFound => Ok(None),
            Err(e) => Err(GitError::from_git2(e, key)),
        }
    }

    fn symbolic_ref_target(&self, refname: &str) -> Result<Option<String>, GitError> {
        Ok(self
            .find_reference(refname)?
            .and_then(|r| r.symbolic_target().map(String::from)))
    }

    fn ref_exists(&self, refname: &str) -> bool {
        self.repo.find_reference(refname).is_ok()
    }
}
