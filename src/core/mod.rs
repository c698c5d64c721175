//! core
//!
//! Domain types and configuration.
//!
//! # Modules
//!
//! - [`types`] - Strong types: BranchName, Branch
//! - [`config`] - Configuration schema and loading

pub mod config;
pub mod types;
