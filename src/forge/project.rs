//! forge::project
//!
//! Hosted project identity and remote URL parsing.
//!
//! # Supported URL formats
//!
//! - `https://<host>/<owner>/<name>.git` (also `http://`, `git://`)
//! - `ssh://[user@]<host>[:port]/<owner>/<name>.git` (also `git+ssh://`)
//! - `[user@]<host>:<owner>/<name>.git` (scp-like)
//!
//! Only hosts listed in [`KnownHosts`] are accepted; anything else is
//! reported as [`ProjectError::UnrecognizedHost`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Host every [`KnownHosts`] set recognizes.
pub const GITHUB_HOST: &str = "github.com";

/// Errors from project parsing.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProjectError {
    /// The URL does not point at a repository on a known host.
    #[error("{url} does not point to a repository on a known host")]
    UnrecognizedHost {
        /// The URL that failed to parse
        url: String,
    },
}

/// A repository on a code-hosting service.
///
/// Equality is field-wise. Hosts are stored lowercased and normalized, so
/// two URLs for the same repository compare equal.
///
/// # Example
///
/// ```
/// use remotework::forge::{parse_project, KnownHosts, Project};
///
/// let hosts = KnownHosts::default();
/// let project = parse_project("git@github.com:owner/repo.git", &hosts).unwrap();
/// assert_eq!(project, Project::new("owner", "repo", "github.com"));
/// assert_eq!(project.to_string(), "owner/repo");
/// assert_eq!(project.web_url(), "https://github.com/owner/repo");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Project {
    /// Owning user or organization
    pub owner: String,
    /// Repository name, without `.git`
    pub name: String,
    /// Normalized hostname
    pub host: String,
}

impl Project {
    /// Create a project, normalizing the host.
    pub fn new(owner: impl Into<String>, name: impl Into<String>, host: &str) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
            host: normalize_host(host),
        }
    }

    /// The same repository on a different host.
    pub fn with_host(&self, host: &str) -> Self {
        Self::new(self.owner.clone(), self.name.clone(), host)
    }

    /// Browser URL of the project.
    pub fn web_url(&self) -> String {
        format!("https://{}/{}/{}", self.host, self.owner, self.name)
    }
}

impl std::fmt::Display for Project {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Hosts recognized as code-hosting services.
///
/// Always contains [`GITHUB_HOST`]; configuration may add more
/// (e.g., an enterprise instance).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnownHosts {
    hosts: Vec<String>,
}

impl KnownHosts {
    /// The default set plus `extra` hosts.
    pub fn new<I, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut hosts = vec![GITHUB_HOST.to_string()];
        for host in extra {
            let host = normalize_host(host.as_ref());
            if !host.is_empty() && !hosts.contains(&host) {
                hosts.push(host);
            }
        }
        Self { hosts }
    }

    /// Whether `host` (in any case, with or without a `www.`/`ssh.` prefix)
    /// is recognized.
    pub fn contains(&self, host: &str) -> bool {
        let host = normalize_host(host);
        self.hosts.iter().any(|h| *h == host)
    }

    /// Recognized hosts, default first.
    pub fn as_slice(&self) -> &[String] {
        &self.hosts
    }
}

impl Default for KnownHosts {
    fn default() -> Self {
        Self::new(std::iter::empty::<&str>())
    }
}

/// Lowercase a hostname and drop `www.`/`ssh.` prefixes.
fn normalize_host(host: &str) -> String {
    let host = host.trim().to_ascii_lowercase();
    for prefix in ["www.", "ssh."] {
        if let Some(rest) = host.strip_prefix(prefix) {
            return rest.to_string();
        }
    }
    host
}

/// Parse a remote URL into the project it points at.
///
/// # Errors
///
/// Returns [`ProjectError::UnrecognizedHost`] when the URL is malformed,
/// is a local path, or names a host outside `hosts`.
pub fn parse_project(url: &str, hosts: &KnownHosts) -> Result<Project, ProjectError> {
    let unrecognized = || ProjectError::UnrecognizedHost {
        url: url.to_string(),
    };

    let (host, path) = split_host_and_path(url.trim()).ok_or_else(unrecognized)?;
    if host.is_empty() || !hosts.contains(host) {
        return Err(unrecognized());
    }

    let path = path.trim_matches('/');
    let mut segments = path.split('/');
    let owner = segments.next().unwrap_or_default();
    let name = segments.next().unwrap_or_default();
    let name = name.strip_suffix(".git").unwrap_or(name);
    if owner.is_empty() || name.is_empty() {
        return Err(unrecognized());
    }

    Ok(Project::new(owner, name, host))
}

/// Split a URL into `(host, path)`, dropping user info and ports.
fn split_host_and_path(url: &str) -> Option<(&str, &str)> {
    const SCHEMES: [&str; 5] = ["https://", "http://", "git://", "ssh://", "git+ssh://"];

    for scheme in SCHEMES {
        if let Some(rest) = url.strip_prefix(scheme) {
            let (authority, path) = rest.split_once('/')?;
            let host = authority.rsplit('@').next()?;
            let host = host.split(':').next()?;
            return Some((host, path));
        }
    }

    // scp-like: [user@]host:path
    if url.contains("://") {
        return None;
    }
    let (authority, path) = url.split_once(':')?;
    if authority.contains('/') {
        // A local path that happens to contain a colon
        return None;
    }
    let host = authority.rsplit('@').next()?;
    Some((host, path))
}
