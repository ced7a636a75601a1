//! branchkit - Thin async wrappers over the git CLI
//!
//! Queries and mutates branch and remote state of a repository by shelling
//! out to `git`, and parses `namespace/resource/name` tokens for CLI use.
//!
//! # Modules
//!
//! - [`git`] - Injectable command runner, version gate and repository operations
//! - [`resource`] - `namespace/resource/name` token parsing
//! - [`config`] - Layered configuration
//! - [`error`] - Error types

pub mod config;
pub mod error;
pub mod git;
pub mod resource;

pub use config::Config;
pub use error::{Error, Result};
pub use git::{Branch, CommandOutput, CommandRunner, GitVersion, ProcessExecutor, Repository};
pub use resource::{parse_namespace_resource_name, ResourceRef};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
