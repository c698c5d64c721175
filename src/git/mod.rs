//! git
//!
//! Single interface for all Git queries.
//!
//! # Architecture
//!
//! This module is the **ONLY doorway** to Git. The resolution engine talks
//! to a [`GitBackend`] and never imports `git2` itself. The backend is
//! read-only: nothing in this crate mutates repository state.
//!
//! # Responsibilities
//!
//! - Repository discovery and opening
//! - Remote enumeration
//! - HEAD, upstream, and symbolic ref lookups
//! - Configuration reads
//!
//! # Example
//!
//! ```ignore
//! use remotework::git::{Git, GitBackend};
//! use std::path::Path;
//!
//! let git = Git::open(Path::new("."))?;
//! let head = git.head_ref()?;
//! let push_default = git.config_value("push.default")?;
//! ```

mod interface;
pub mod mock;
mod traits;

pub use interface::{Git, GitError};
pub use traits::{GitBackend, RemoteEntry};
