//! forge
//!
//! Identity of repositories on remote forges (GitHub and configured
//! enterprise hosts).
//!
//! # Architecture
//!
//! This module is pure: it maps a remote URL to the [`Project`] it names
//! and never performs network I/O. Which hosts count as forges is decided
//! by [`KnownHosts`], built from configuration.
//!
//! # Example
//!
//! ```
//! use remotework::forge::{parse_project, KnownHosts};
//!
//! let hosts = KnownHosts::new(["git.example.com"]);
//! let project = parse_project("https://git.example.com/team/tool.git", &hosts).unwrap();
//! assert_eq!(project.owner, "team");
//! assert!(parse_project("https://gitlab.com/team/tool.git", &hosts).is_err());
//! ```

mod project;

pub use project::{parse_project, KnownHosts, Project, ProjectError, GITHUB_HOST};
