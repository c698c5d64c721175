//! resolve::catalog
//!
//! Configured remotes, loaded at most once per session.

use crate::forge::{parse_project, KnownHosts, Project, ProjectError};
use crate::git::{GitBackend, RemoteEntry};

use super::ResolveError;

/// A named pointer to a hosted repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Remote {
    /// Name as configured locally
    pub name: String,
    /// Fetch URL; the project is derived from this
    pub url: String,
    /// Push URL, if configured separately
    pub push_url: Option<String>,
}

impl Remote {
    /// A remote with only a fetch URL.
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            push_url: None,
        }
    }

    /// The project this remote's URL points at.
    ///
    /// Recomputed on every call.
    ///
    /// # Errors
    ///
    /// [`ProjectError::UnrecognizedHost`] if the URL is not a project on
    /// one of `hosts`.
    pub fn project(&self, hosts: &KnownHosts) -> Result<Project, ProjectError> {
        parse_project(&self.url, hosts)
    }
}

impl From<RemoteEntry> for Remote {
    fn from(entry: RemoteEntry) -> Self {
        Self {
            name: entry.name,
            url: entry.url,
            push_url: entry.push_url,
        }
    }
}

#[derive(Debug, Default)]
enum CatalogState {
    #[default]
    Unloaded,
    Loaded(Vec<Remote>),
}

/// Lazily loaded list of remotes.
///
/// The list is fetched on first access and never reloaded. A failed load
/// leaves the catalog unloaded, so a later access retries.
#[derive(Debug, Default)]
pub struct RemoteCatalog {
    state: CatalogState,
}

impl RemoteCatalog {
    /// An unloaded catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether remotes have been loaded.
    pub fn is_loaded(&self) -> bool {
        matches!(self.state, CatalogState::Loaded(_))
    }

    /// Load remotes if needed and return them in Git's enumeration order.
    ///
    /// # Errors
    ///
    /// [`ResolveError::BackendQuery`] if listing remotes fails.
    pub fn load(&mut self, backend: &impl GitBackend) -> Result<&[Remote], ResolveError> {
        if !self.is_loaded() {
            let remotes: Vec<Remote> = backend
                .list_remotes()?
                .into_iter()
                .map(Remote::from)
                .collect();
            tracing::debug!(count = remotes.len(), "loaded remotes");
            self.state = CatalogState::Loaded(remotes);
        }

        let remotes: &[Remote] = match &self.state {
            CatalogState::Loaded(remotes) => remotes,
            CatalogState::Unloaded => &[],
        };
        Ok(remotes)
    }

    /// The first remote named exactly `name`.
    ///
    /// # Errors
    ///
    /// - [`ResolveError::BackendQuery`] if loading fails
    /// - [`ResolveError::RemoteNotFound`] if no remote has that name
    pub fn remote_by_name(
        &mut self,
        backend: &impl GitBackend,
        name: &str,
    ) -> Result<Remote, ResolveError> {
        self.load(backend)?
            .iter()
            .find(|remote| remote.name == name)
            .cloned()
            .ok_or_else(|| ResolveError::RemoteNotFound {
                name: name.to_string(),
            })
    }
}
