//! User configuration settings
//!
//! Layered configuration: defaults → config file → environment variables

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;

use crate::error::{ConfigError, Error, Result};
use crate::git::{ProcessExecutor, DEFAULT_GIT_PROGRAM};

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Git executable (name on PATH or absolute path)
    pub git_program: String,

    /// Timeout for a single git invocation in milliseconds
    pub command_timeout_ms: u64,

    /// Maximum concurrent git invocations
    pub max_concurrent_commands: usize,

    /// Namespace used by `resolve` when the token doesn't name one
    pub default_namespace: String,

    /// Enable debug logging
    pub debug: bool,

    /// Log file path (if set, logs to file instead of stderr)
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            git_program: DEFAULT_GIT_PROGRAM.to_string(),
            command_timeout_ms: 30_000,
            max_concurrent_commands: 8,
            default_namespace: "default".to_string(),
            debug: false,
            log_file: None,
        }
    }
}

impl Config {
    /// Load configuration from all sources
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    /// Load configuration using `config_path` as the file layer
    pub fn load_from(config_path: &Path) -> Result<Self> {
        let config: Config = Figment::new()
            // Start with defaults
            .merge(Serialized::defaults(Config::default()))
            // Layer config file if it exists
            .merge(Toml::file(config_path))
            // Layer environment variables (BRANCHKIT_GIT_PROGRAM, etc.)
            .merge(Env::prefixed("BRANCHKIT_"))
            .extract()
            .map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Reject values the executor can't work with
    pub fn validate(&self) -> Result<()> {
        if self.git_program.trim().is_empty() {
            return Err(invalid("git_program", "must not be empty"));
        }
        if self.command_timeout_ms == 0 {
            return Err(invalid("command_timeout_ms", "must be greater than zero"));
        }
        if self.max_concurrent_commands == 0 {
            return Err(invalid("max_concurrent_commands", "must be greater than zero"));
        }
        if self.max_concurrent_commands > Semaphore::MAX_PERMITS {
            return Err(invalid(
                "max_concurrent_commands",
                &format!("must not exceed {}", Semaphore::MAX_PERMITS),
            ));
        }
        Ok(())
    }

    /// Get the configuration file path
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = Self::project_dirs()?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn command_timeout(&self) -> Duration {
        Duration::from_millis(self.command_timeout_ms)
    }

    /// Build the process executor described by this configuration
    pub fn executor(&self) -> ProcessExecutor {
        ProcessExecutor::with_max_concurrent(self.max_concurrent_commands)
            .with_timeout(self.command_timeout())
            .with_git_program(self.git_program.clone())
    }

    /// Save current configuration to the default file
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    /// Save current configuration to `config_path`
    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).map_err(|_e| {
                Error::Config(ConfigError::DirectoryCreationFailed(parent.to_path_buf()))
            })?;
        }

        let toml = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::SaveFailed(e.to_string()))?;

        std::fs::write(config_path, toml).map_err(|e| ConfigError::SaveFailed(e.to_string()))?;

        Ok(())
    }

    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("com", "branchkit", "branchkit").ok_or_else(|| {
            Error::Config(ConfigError::LoadFailed(
                "Could not determine home directory".to_string(),
            ))
        })
    }
}

fn invalid(key: &str, reason: &str) -> Error {
    ConfigError::InvalidValue {
        key: key.to_string(),
        reason: reason.to_string(),
    }
    .into()
}
