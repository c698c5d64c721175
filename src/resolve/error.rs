//! resolve::error
//!
//! Failure taxonomy of the resolution engine.
//!
//! Errors propagate fail-fast with their kind preserved. The two places
//! that swallow an error instead are spelled out in
//! [`LocalRepo::current_project`](super::LocalRepo::current_project) and
//! [`LocalRepo::remote_branch_and_project`](super::LocalRepo::remote_branch_and_project).

use thiserror::Error;

use crate::forge::ProjectError;
use crate::git::GitError;

/// Why the main project could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OriginCause {
    /// No remote with the main remote's name is configured.
    Missing,
    /// The remote exists but its URL is not a known project.
    Unrecognized {
        /// The remote's URL
        url: String,
    },
}

impl std::fmt::Display for OriginCause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OriginCause::Missing => write!(f, "remote is not configured"),
            OriginCause::Unrecognized { url } => write!(f, "unrecognized url {url}"),
        }
    }
}

/// Errors from remote and project resolution.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The underlying Git query failed.
    #[error("git query failed: {0}")]
    BackendQuery(#[from] GitError),

    /// No remote with this name is configured.
    #[error("no git remote with name {name}")]
    RemoteNotFound {
        /// The name that was looked up
        name: String,
    },

    /// HEAD does not point at a named branch.
    #[error("aborted: not currently on any branch")]
    DetachedHead,

    /// The branch has no configured tracking branch.
    #[error("no upstream configured for branch {branch}")]
    NoUpstream {
        /// Short name of the branch
        branch: String,
    },

    /// The main remote is missing or does not point at a known project.
    ///
    /// Both cases share one variant so callers matching on the kind alone
    /// see a single failure; `cause` tells them apart.
    #[error("aborted: the {remote} remote doesn't point to a known repository ({cause})")]
    NoOriginProject {
        /// The main remote's name
        remote: String,
        /// Which link broke
        cause: OriginCause,
    },

    /// A remote's URL does not point at a known project.
    #[error("{url} does not point to a repository on a known host")]
    UnrecognizedHost {
        /// The URL that failed to parse
        url: String,
    },
}

impl From<ProjectError> for ResolveError {
    fn from(err: ProjectError) -> Self {
        match err {
            ProjectError::UnrecognizedHost { url } => ResolveError::UnrecognizedHost { url },
        }
    }
}
