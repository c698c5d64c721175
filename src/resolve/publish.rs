//! resolve::publish
//!
//! Which branch and project a publish (push, compare) should target.
//!
//! # Resolution
//!
//! ```text
//! main project ──▶ current branch ──▶ push.default?
//!                                      │
//!               upstream / tracking ◀──┴──▶ anything else
//!                      │                        │
//!            branch := upstream        scan ranked remotes for
//!            (NoUpstream is fatal)     refs/remotes/<r>/<branch>
//!                      │                        │
//!                      └──────────┬─────────────┘
//!                                 ▼
//!              remote-tracking branch? re-resolve project
//!              from its remote (kept as-is if the remote is gone)
//! ```
//!
//! # Remote ranking
//!
//! [`rank_publish_remotes`] orders candidates as follows:
//! 1. With an owner filter, every remote whose project belongs to that
//!    owner is a candidate (a later remote with the same name replaces an
//!    earlier one).
//! 2. Each canonical name (`origin`, `github`, `upstream` by default) not
//!    yet a candidate is added if such a remote exists.
//! 3. Canonical candidates are listed in canonical order. Every remaining
//!    candidate is then inserted at the *front* of the list, one at a time,
//!    in candidate order, so non-canonical owner matches come first and in
//!    reverse order.

use std::collections::VecDeque;

use indexmap::IndexMap;

use crate::core::types::Branch;
use crate::forge::{KnownHosts, Project};
use crate::git::GitBackend;

use super::{LocalRepo, Remote, ResolveError};

/// Git config key selecting the push policy.
pub const PUSH_DEFAULT_KEY: &str = "push.default";

/// The branch and project a publish operation should use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishTarget {
    /// Local branch, or the remote-tracking branch it publishes to
    pub branch: Branch,
    /// Project the branch lives in
    pub project: Project,
}

/// How the publish branch is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushMode {
    /// Use the configured upstream (`push.default` is `upstream`/`tracking`).
    Tracking,
    /// Search ranked remotes for a branch of the same name.
    Ranked,
}

impl PushMode {
    /// The mode implied by a `push.default` value.
    pub fn from_push_default(value: Option<&str>) -> Self {
        match value {
            Some("upstream") | Some("tracking") => PushMode::Tracking,
            _ => PushMode::Ranked,
        }
    }
}

/// Order remotes by publish priority, highest first.
///
/// `owner` filters extra candidates by project owner; `None` or an empty
/// owner adds only canonical names. `priority` is the canonical name order.
/// Never fails: remotes that cannot be resolved are skipped.
///
/// # Example
///
/// ```
/// use remotework::forge::KnownHosts;
/// use remotework::resolve::{rank_publish_remotes, Remote};
///
/// let remotes = [
///     Remote::new("origin", "https://github.com/a/repo"),
///     Remote::new("fork1", "https://github.com/b/repo"),
///     Remote::new("fork2", "https://github.com/b/repo"),
/// ];
/// let priority = ["origin", "github", "upstream"].map(String::from);
///
/// let ranked = rank_publish_remotes(&remotes, Some("b"), &priority, &KnownHosts::default());
/// let names: Vec<_> = ranked.iter().map(|r| r.name.as_str()).collect();
/// assert_eq!(names, ["fork2", "fork1", "origin"]);
/// ```
pub fn rank_publish_remotes(
    remotes: &[Remote],
    owner: Option<&str>,
    priority: &[String],
    hosts: &KnownHosts,
) -> Vec<Remote> {
    let mut candidates: IndexMap<&str, &Remote> = IndexMap::new();

    if let Some(owner) = owner.filter(|o| !o.is_empty()) {
        for remote in remotes {
            if remote.project(hosts).is_ok_and(|p| p.owner == owner) {
                candidates.insert(remote.name.as_str(), remote);
            }
        }
    }

    for name in priority {
        if candidates.contains_key(name.as_str()) {
            continue;
        }
        if let Some(remote) = remotes.iter().find(|r| r.name == *name) {
            candidates.insert(remote.name.as_str(), remote);
        }
    }

    let mut ranked = VecDeque::with_capacity(candidates.len());
    for name in priority {
        if let Some(remote) = candidates.shift_remove(name.as_str()) {
            ranked.push_back(remote.clone());
        }
    }
    for remote in candidates.into_values() {
        ranked.push_front(remote.clone());
    }

    ranked.into()
}

impl<B: GitBackend> LocalRepo<B> {
    /// Remotes to try for a publish, highest priority first.
    ///
    /// See [`rank_publish_remotes`]. If remotes cannot be listed the result
    /// is empty.
    pub fn remotes_for_publish(&mut self, owner: Option<&str>) -> Vec<Remote> {
        let priority = self.settings().remote_priority.clone();
        let hosts = self.settings().hosts.clone();

        match self.remotes() {
            Ok(remotes) => rank_publish_remotes(remotes, owner, &priority, &hosts),
            Err(e) => {
                tracing::warn!(error = %e, "cannot list remotes for publish");
                Vec::new()
            }
        }
    }

    /// The branch and project a publish should target.
    ///
    /// `owner` narrows extra remote candidates in ranked mode.
    ///
    /// # Errors
    ///
    /// - [`ResolveError::NoOriginProject`] if there is no main project
    /// - [`ResolveError::DetachedHead`] if HEAD is not on a branch
    /// - [`ResolveError::NoUpstream`] in tracking mode without an upstream
    /// - [`ResolveError::UnrecognizedHost`] if the chosen remote-tracking
    ///   branch's remote does not point at a known project
    pub fn remote_branch_and_project(
        &mut self,
        owner: Option<&str>,
    ) -> Result<PublishTarget, ResolveError> {
        let mut project = self.main_project()?;
        let mut branch = self.current_branch()?;

        let push_default = match self.backend().config_value(PUSH_DEFAULT_KEY) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(error = %e, "cannot read {PUSH_DEFAULT_KEY}, treating as unset");
                None
            }
        };

        let mode = PushMode::from_push_default(push_default.as_deref());
        tracing::debug!(?mode, branch = %branch, "resolving publish branch");

        match mode {
            PushMode::Tracking => {
                branch = self.upstream_of(&branch)?;
            }
            PushMode::Ranked => {
                let short_name = branch.short_name().to_string();
                let found = self
                    .remotes_for_publish(owner)
                    .into_iter()
                    .map(|remote| Branch::remote_tracking(&remote.name, &short_name))
                    .find(|candidate| self.backend().ref_exists(candidate.as_str()));

                match found {
                    Some(candidate) => branch = candidate,
                    None => tracing::debug!(%short_name, "no remote has this branch, keeping local"),
                }
            }
        }

        // Attempt to re-resolve the project from the branch's remote; keep
        // the main project if that remote is no longer configured.
        if let Some(remote_name) = branch.remote_name() {
            match self.remote_by_name(remote_name) {
                Ok(remote) => {
                    project = self.project_of(&remote)?;
                    tracing::debug!(remote = %remote.name, %project, "project from publish remote");
                }
                Err(ResolveError::RemoteNotFound { name }) => {
                    tracing::debug!(remote = %name, "remote for publish branch is gone, keeping project");
                }
                Err(e) => return Err(e),
            }
        }

        Ok(PublishTarget { branch, project })
    }
}
