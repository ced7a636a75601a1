//! Error types for branchkit
//!
//! Uses `thiserror` for ergonomic error definitions with automatic `Display` and `Error` impls.

use std::path::PathBuf;

use thiserror::Error;

use crate::git::GitVersion;

/// Top-level error type for branchkit
#[derive(Error, Debug)]
pub enum Error {
    #[error("Git error: {0}")]
    Git(#[from] GitError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while invoking or interpreting the git CLI
#[derive(Error, Debug)]
pub enum GitError {
    #[error("Failed to spawn {program}: {reason}")]
    Spawn { program: String, reason: String },

    #[error("Git command failed: {command} - {stderr}")]
    CommandFailed { command: String, stderr: String },

    #[error("Git command timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("Invalid HEAD branch: {0:?}")]
    InvalidHead(String),

    #[error("Unsupported git version {found}, requires at least {required}")]
    UnsupportedVersion {
        required: GitVersion,
        found: GitVersion,
    },

    #[error("Could not parse git version from {0:?}")]
    InvalidVersion(String),

    #[error("Semaphore acquire failed")]
    SemaphoreError,
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("Failed to save configuration: {0}")]
    SaveFailed(String),

    #[error("Invalid configuration value for '{key}': {reason}")]
    InvalidValue { key: String, reason: String },

    #[error("Failed to create config directory: {0}")]
    DirectoryCreationFailed(PathBuf),
}

/// Result type alias using our error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Whether this is the unsupported-version sentinel
    pub fn is_unsupported_version(&self) -> bool {
        matches!(self, Error::Git(GitError::UnsupportedVersion { .. }))
    }
}
