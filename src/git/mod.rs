//! Git CLI integration
//!
//! Shells out to the system `git` binary through an injectable runner:
//! - `CommandRunner` / `ProcessExecutor` - Process invocation
//! - `GitVersion` - Version detection and feature gating
//! - `Branch` - Branch model and `show-ref` parsing
//! - `Repository` - Branch and remote operations

mod branch;
pub(crate) mod executor;
mod repository;
mod version;

pub use branch::*;
pub use executor::{
    describe, run_git, CommandOutput, CommandRunner, ProcessExecutor, DEFAULT_GIT_PROGRAM,
    DEFAULT_MAX_CONCURRENT, DEFAULT_TIMEOUT,
};
pub use repository::*;
pub use version::*;
