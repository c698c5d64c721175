//! resolve
//!
//! Remote and project resolution for a local repository.
//!
//! # Architecture
//!
//! A [`LocalRepo`] is one resolution session. It holds a [`GitBackend`]
//! (real or mock), the [`ResolverSettings`] it was configured with, and a
//! [`RemoteCatalog`] that lists remotes at most once. Everything else is
//! derived on demand:
//!
//! - branches: [`LocalRepo::current_branch`], [`LocalRepo::master_branch`]
//! - projects: [`LocalRepo::main_project`], [`LocalRepo::current_project`],
//!   [`LocalRepo::upstream_project`]
//! - publishing: [`LocalRepo::remotes_for_publish`],
//!   [`LocalRepo::remote_branch_and_project`]
//!
//! Sessions are single-threaded; they take `&mut self` where the catalog
//! may load.
//!
//! [`GitBackend`]: crate::git::GitBackend
//! [`ResolverSettings`]: crate::core::config::ResolverSettings

mod catalog;
mod error;
mod publish;
mod repo;

pub use catalog::{Remote, RemoteCatalog};
pub use error::{OriginCause, ResolveError};
pub use publish::{rank_publish_remotes, PublishTarget, PushMode, PUSH_DEFAULT_KEY};
pub use repo::{LocalRepo, OpenError};
