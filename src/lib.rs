//! Remotework - resolve which hosted project a local Git repository talks to
//!
//! Given a working copy with one or more remotes, remotework answers the
//! questions a forge client asks before doing anything remote: which
//! remote is the main one, which project does the current branch track,
//! and where should a branch be published.
//!
//! # Architecture
//!
//! - [`core`] - Branch types and layered configuration
//! - [`git`] - Single read-only interface for all Git queries
//! - [`forge`] - Projects and URL parsing for known hosts
//! - [`resolve`] - The resolution session and its algorithms
//!
//! # Example
//!
//! ```no_run
//! use remotework::resolve::LocalRepo;
//! use std::path::Path;
//!
//! let mut repo = LocalRepo::open(Path::new("."))?;
//! let target = repo.remote_branch_and_project(None)?;
//! println!("publish {} to {}", target.branch.short_name(), target.project);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod core;
pub mod forge;
pub mod git;
pub mod resolve;
