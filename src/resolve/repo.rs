//! resolve::repo
//!
//! The resolution session: one [`LocalRepo`] per command invocation.
//!
//! # Project resolution
//!
//! - [`LocalRepo::main_project`]: the main remote's project
//! - [`LocalRepo::upstream_project`]: the project of the current branch's
//!   upstream remote
//! - [`LocalRepo::current_project`]: upstream project, else main project
//!
//! # Example
//!
//! ```
//! use remotework::core::config::ResolverSettings;
//! use remotework::git::mock::MockBackend;
//! use remotework::resolve::LocalRepo;
//!
//! let backend = MockBackend::new()
//!     .with_remote("origin", "git@github.com:me/repo.git")
//!     .on_branch("feature");
//! let mut repo = LocalRepo::new(backend, ResolverSettings::default());
//!
//! // No upstream configured, so the current project is the main project
//! let project = repo.current_project().unwrap();
//! assert_eq!(project.to_string(), "me/repo");
//! ```

use std::path::Path;

use thiserror::Error;

use crate::core::config::{Config, ConfigError, ResolverSettings};
use crate::core::types::Branch;
use crate::forge::Project;
use crate::git::{Git, GitBackend, GitError};

use super::{OriginCause, Remote, RemoteCatalog, ResolveError};

/// Errors from setting up a session over a real repository.
#[derive(Debug, Error)]
pub enum OpenError {
    /// No repository could be opened at the path.
    #[error(transparent)]
    Git(#[from] GitError),

    /// A configuration file could not be read or is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// A resolution session over one repository.
///
/// Owns the [`RemoteCatalog`] cache exclusively. Branches and projects
/// are recomputed on every call.
#[derive(Debug)]
pub struct LocalRepo<B> {
    backend: B,
    settings: ResolverSettings,
    catalog: RemoteCatalog,
}

impl LocalRepo<Git> {
    /// Open the repository containing `path` and load its configuration.
    ///
    /// # Errors
    ///
    /// - [`OpenError::Git`] if no repository is found
    /// - [`OpenError::Config`] if a config file is unreadable or invalid
    pub fn open(path: &Path) -> Result<Self, OpenError> {
        let git = Git::open(path)?;
        let settings = Config::load(Some(git.git_dir()))?.settings()?;
        Ok(Self::new(git, settings))
    }
}

impl<B: GitBackend> LocalRepo<B> {
    /// Start a session with an unloaded remote catalog.
    pub fn new(backend: B, settings: ResolverSettings) -> Self {
        Self {
            backend,
            settings,
            catalog: RemoteCatalog::new(),
        }
    }

    /// The backend this session queries.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// The settings this session resolves with.
    pub fn settings(&self) -> &ResolverSettings {
        &self.settings
    }

    /// All remotes, in Git's enumeration order.
    pub fn remotes(&mut self) -> Result<&[Remote], ResolveError> {
        self.catalog.load(&self.backend)
    }

    /// The first remote named exactly `name`.
    pub fn remote_by_name(&mut self, name: &str) -> Result<Remote, ResolveError> {
        self.catalog.remote_by_name(&self.backend, name)
    }

    /// The project a remote points at, with this session's known hosts.
    pub fn project_of(&self, remote: &Remote) -> Result<Project, ResolveError> {
        Ok(remote.project(&self.settings.hosts)?)
    }

    // =========================================================================
    // Branches
    // =========================================================================

    /// The branch HEAD points at.
    ///
    /// # Errors
    ///
    /// - [`ResolveError::DetachedHead`] if HEAD is not on a named branch
    /// - [`ResolveError::BackendQuery`] if HEAD cannot be read
    pub fn current_branch(&self) -> Result<Branch, ResolveError> {
        self.backend
            .head_ref()?
            .map(Branch::new)
            .ok_or(ResolveError::DetachedHead)
    }

    /// The configured tracking branch of a local branch.
    ///
    /// # Errors
    ///
    /// - [`ResolveError::NoUpstream`] if no tracking branch is configured
    /// - [`ResolveError::BackendQuery`] if the lookup fails
    pub fn upstream_of(&self, branch: &Branch) -> Result<Branch, ResolveError> {
        self.backend
            .tracking_ref(branch.as_str())?
            .map(Branch::new)
            .ok_or_else(|| ResolveError::NoUpstream {
                branch: branch.short_name().to_string(),
            })
    }

    /// The repository's default branch.
    ///
    /// The target of `refs/remotes/<main remote>/HEAD` when the main remote
    /// exists and that pointer is set, else the configured fallback
    /// (`refs/heads/master` by default). Never fails.
    pub fn master_branch(&mut self) -> Branch {
        let main = self.settings.main_remote.clone();

        match self.remote_by_name(&main) {
            Ok(remote) => {
                let pointer = format!("refs/remotes/{}/HEAD", remote.name);
                match self.backend.symbolic_ref_target(&pointer) {
                    Ok(Some(target)) if !target.is_empty() => return Branch::new(target),
                    Ok(_) => tracing::debug!(%pointer, "default-branch pointer unset"),
                    Err(e) => tracing::warn!(%pointer, error = %e, "cannot read default-branch pointer"),
                }
            }
            Err(e) => tracing::debug!(remote = %main, error = %e, "no main remote"),
        }

        self.settings.fallback_branch.clone()
    }

    // =========================================================================
    // Projects
    // =========================================================================

    /// The project of the main remote (`origin` by default).
    ///
    /// # Errors
    ///
    /// - [`ResolveError::NoOriginProject`] if the remote is missing or its
    ///   URL is not a known project
    /// - [`ResolveError::BackendQuery`] if remotes cannot be listed
    pub fn main_project(&mut self) -> Result<Project, ResolveError> {
        let name = self.settings.main_remote.clone();

        let remote = match self.remote_by_name(&name) {
            Ok(remote) => remote,
            Err(ResolveError::RemoteNotFound { .. }) => {
                return Err(ResolveError::NoOriginProject {
                    remote: name,
                    cause: OriginCause::Missing,
                })
            }
            Err(e) => return Err(e),
        };

        remote
            .project(&self.settings.hosts)
            .map_err(|_| ResolveError::NoOriginProject {
                remote: name,
                cause: OriginCause::Unrecognized { url: remote.url },
            })
    }

    /// The project of the remote the current branch tracks.
    ///
    /// # Errors
    ///
    /// Fails at the first missing link, with that link's error:
    /// [`ResolveError::DetachedHead`], [`ResolveError::NoUpstream`],
    /// [`ResolveError::RemoteNotFound`] (also when the upstream is a local
    /// branch; `name` is then the upstream ref) or
    /// [`ResolveError::UnrecognizedHost`].
    pub fn upstream_project(&mut self) -> Result<Project, ResolveError> {
        let branch = self.current_branch()?;
        let upstream = self.upstream_of(&branch)?;

        let Some(remote_name) = upstream.remote_name() else {
            return Err(ResolveError::RemoteNotFound {
                name: upstream.to_string(),
            });
        };

        let remote = self.remote_by_name(remote_name)?;
        self.project_of(&remote)
    }

    /// The upstream project, falling back to the main project.
    ///
    /// Any failure to resolve the upstream project is discarded: a branch
    /// without an upstream is the common case.
    pub fn current_project(&mut self) -> Result<Project, ResolveError> {
        match self.upstream_project() {
            Ok(project) => Ok(project),
            Err(e) => {
                tracing::debug!(error = %e, "no upstream project, using main project");
                self.main_project()
            }
        }
    }
}
