//! git::mock
//!
//! Mock Git backend for deterministic testing.
//!
//! # Design
//!
//! The mock stores remotes, refs, and configuration in memory, records
//! every query it answers, and can be told to fail a specific query.
//! Clones share state, so a test can keep a handle while a
//! [`LocalRepo`](crate::resolve::LocalRepo) owns another.
//!
//! # Example
//!
//! ```
//! use remotework::git::mock::{MockBackend, QueryKind};
//! use remotework::git::GitBackend;
//!
//! let backend = MockBackend::new()
//!     .with_remote("origin", "git@github.com:owner/repo.git")
//!     .on_branch("feature");
//!
//! assert_eq!(backend.list_remotes().unwrap().len(), 1);
//! assert_eq!(backend.head_ref().unwrap().as_deref(), Some("refs/heads/feature"));
//! assert_eq!(backend.call_count(QueryKind::ListRemotes), 1);
//! ```

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use super::traits::{GitBackend, RemoteEntry};
use super::GitError;

/// Mock backend for testing.
///
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping.
#[derive(Debug, Clone)]
pub struct MockBackend {
    /// Internal state shared across clones.
    inner: Arc<Mutex<MockBackendInner>>,
}

/// Internal mutable state.
#[derive(Debug, Default)]
struct MockBackendInner {
    remotes: Vec<RemoteEntry>,
    head: Option<String>,
    tracking: HashMap<String, String>,
    config: HashMap<String, String>,
    symbolic_refs: HashMap<String, String>,
    refs: HashSet<String>,
    /// Query to fail (for testing error paths).
    fail_on: Option<QueryKind>,
    /// Recorded queries for verification.
    queries: Vec<MockQuery>,
}

/// The kinds of query a backend answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKind {
    ListRemotes,
    HeadRef,
    TrackingRef,
    ConfigValue,
    SymbolicRefTarget,
    RefExists,
}

/// Recorded query for test verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockQuery {
    ListRemotes,
    HeadRef,
    TrackingRef { local_ref: String },
    ConfigValue { key: String },
    SymbolicRefTarget { refname: String },
    RefExists { refname: String },
}

impl MockQuery {
    /// The kind of this query.
    pub fn kind(&self) -> QueryKind {
        match self {
            MockQuery::ListRemotes => QueryKind::ListRemotes,
            MockQuery::HeadRef => QueryKind::HeadRef,
            MockQuery::TrackingRef { .. } => QueryKind::TrackingRef,
            MockQuery::ConfigValue { .. } => QueryKind::ConfigValue,
            MockQuery::SymbolicRefTarget { .. } => QueryKind::SymbolicRefTarget,
            MockQuery::RefExists { .. } => QueryKind::RefExists,
        }
    }
}

impl MockBackend {
    /// Create an empty mock: no remotes, detached HEAD, no config.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(MockBackendInner::default())),
        }
    }

    fn update(self, f: impl FnOnce(&mut MockBackendInner)) -> Self {
        {
            let mut inner = self.inner.lock().unwrap();
            f(&mut inner);
        }
        self
    }

    /// Add a remote (appended, so insertion order is enumeration order).
    pub fn with_remote(self, name: &str, url: &str) -> Self {
        self.update(|inner| inner.remotes.push(RemoteEntry::new(name, url)))
    }

    /// Point HEAD at `refs/heads/<branch>`.
    pub fn on_branch(self, branch: &str) -> Self {
        self.update(|inner| inner.head = Some(format!("refs/heads/{branch}")))
    }

    /// Detach HEAD.
    pub fn detached(self) -> Self {
        self.update(|inner| inner.head = None)
    }

    /// Configure the upstream of a local branch ref.
    pub fn with_tracking(self, local_ref: &str, upstream: &str) -> Self {
        self.update(|inner| {
            inner
                .tracking
                .insert(local_ref.to_string(), upstream.to_string());
        })
    }

    /// Set a configuration value.
    pub fn with_config(self, key: &str, value: &str) -> Self {
        self.update(|inner| {
            inner.config.insert(key.to_string(), value.to_string());
        })
    }

    /// Create a symbolic ref. The target is also recorded as existing.
    pub fn with_symbolic_ref(self, refname: &str, target: &str) -> Self {
        self.update(|inner| {
            inner
                .symbolic_refs
                .insert(refname.to_string(), target.to_string());
            inner.refs.insert(refname.to_string());
        })
    }

    /// Create a ref.
    pub fn with_ref(self, refname: &str) -> Self {
        self.update(|inner| {
            inner.refs.insert(refname.to_string());
        })
    }

    /// Configure the mock to fail every query of one kind.
    ///
    /// `RefExists` cannot fail; it answers `false` instead.
    pub fn fail_on(self, kind: QueryKind) -> Self {
        self.update(|inner| inner.fail_on = Some(kind))
    }

    /// Clear the failure configuration.
    pub fn clear_fail_on(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.fail_on = None;
    }

    /// Get all recorded queries.
    pub fn queries(&self) -> Vec<MockQuery> {
        let inner = self.inner.lock().unwrap();
        inner.queries.clone()
    }

    /// Number of recorded queries of one kind.
    pub fn call_count(&self, kind: QueryKind) -> usize {
        let inner = self.inner.lock().unwrap();
        inner.queries.iter().filter(|q| q.kind() == kind).count()
    }

    /// Clear recorded queries.
    pub fn clear_queries(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.queries.clear();
    }

    /// Record a query and report whether it should fail.
    fn record(&self, query: MockQuery) -> Result<(), GitError> {
        let mut inner = self.inner.lock().unwrap();
        let kind = query.kind();
        inner.queries.push(query);
        if inner.fail_on == Some(kind) {
            return Err(GitError::Internal {
                message: format!("injected failure for {kind:?}"),
            });
        }
        Ok(())
    }

    fn read<T>(&self, f: impl FnOnce(&MockBackendInner) -> T) -> T {
        let inner = self.inner.lock().unwrap();
        f(&inner)
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl GitBackend for MockBackend {
    fn list_remotes(&self) -> Result<Vec<RemoteEntry>, GitError> {
        self.record(MockQuery::ListRemotes)?;
        Ok(self.read(|inner| inner.remotes.clone()))
    }

    fn head_ref(&self) -> Result<Option<String>, GitError> {
        self.record(MockQuery::HeadRef)?;
        Ok(self.read(|inner| inner.head.clone()))
    }

    fn tracking_ref(&self, local_ref: &str) -> Result<Option<String>, GitError> {
        self.record(MockQuery::TrackingRef {
            local_ref: local_ref.to_string(),
        })?;
        Ok(self.read(|inner| inner.tracking.get(local_ref).cloned()))
    }

    fn config_value(&self, key: &str) -> Result<Option<String>, GitError> {
        self.record(MockQuery::ConfigValue {
            key: key.to_string(),
        })?;
        Ok(self.read(|inner| inner.config.get(key).cloned()))
    }

    fn symbolic_ref_target(&self, refname: &str) -> Result<Option<String>, GitError> {
        self.record(MockQuery::SymbolicRefTarget {
            refname: refname.to_string(),
        })?;
        Ok(self.read(|inner| inner.symbolic_refs.get(refname).cloned()))
    }

    fn ref_exists(&self, refname: &str) -> bool {
        if self
            .record(MockQuery::RefExists {
                refname: refname.to_string(),
            })
            .is_err()
        {
            return false;
        }
        self.read(|inner| inner.refs.contains(refname))
    }
}
