//! Async process executor with semaphore-controlled concurrency
//!
//! Every git operation goes through a [`CommandRunner`]. The production
//! implementation, [`ProcessExecutor`], provides:
//! - Semaphore to limit concurrent commands (default: 8)
//! - Timeout handling
//! - Captured stdout/stderr with the raw exit status
//!
//! Tests substitute their own runner so no git binary is needed.

use std::path::Path;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tokio::sync::Semaphore;
use tokio::time::timeout;
use tracing::{debug, instrument, warn};

use crate::error::{GitError, Result};

/// Program used when none is configured
pub const DEFAULT_GIT_PROGRAM: &str = "git";

/// Default maximum concurrent commands
pub const DEFAULT_MAX_CONCURRENT: usize = 8;

/// Default command timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Captured result of one process invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` if the process was killed by a signal
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// Successful output with the given stdout
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            status: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// Failed output with the given exit code and stderr
    pub fn failed(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            status: Some(code),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    pub fn success(&self) -> bool {
        self.status == Some(0)
    }
}

/// Capability to run an external program.
///
/// A non-zero exit is reported through [`CommandOutput`], not as an error.
/// Errors are reserved for the invocation itself failing (spawn, timeout).
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run `program` with `args`, using `cwd` as working directory when given
    async fn run(&self, program: &str, args: &[&str], cwd: Option<&Path>) -> Result<CommandOutput>;

    /// Name or path of the git executable this runner invokes
    fn git_program(&self) -> &str {
        DEFAULT_GIT_PROGRAM
    }
}

/// Async process executor backed by `tokio::process`
///
/// Uses a semaphore to limit concurrent invocations so that a burst of
/// callers cannot fork an unbounded number of git processes.
#[derive(Clone)]
pub struct ProcessExecutor {
    /// Semaphore for concurrency control
    semaphore: Arc<Semaphore>,
    /// Command timeout
    timeout: Duration,
    /// Git executable
    git_program: String,
}

impl ProcessExecutor {
    /// Create a new executor with default settings
    pub fn new() -> Self {
        Self::with_max_concurrent(DEFAULT_MAX_CONCURRENT)
    }

    /// Create an executor with custom concurrency limit
    ///
    /// The limit is clamped to `1..=Semaphore::MAX_PERMITS`.
    pub fn with_max_concurrent(max_concurrent: usize) -> Self {
        let permits = max_concurrent.clamp(1, Semaphore::MAX_PERMITS);
        Self {
            semaphore: Arc::new(Semaphore::new(permits)),
            timeout: DEFAULT_TIMEOUT,
            git_program: DEFAULT_GIT_PROGRAM.to_string(),
        }
    }

    /// Set the command timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the git executable (name on PATH or absolute path)
    pub fn with_git_program(mut self, program: impl Into<String>) -> Self {
        self.git_program = program.into();
        self
    }
}

impl Default for ProcessExecutor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommandRunner for ProcessExecutor {
    #[instrument(skip(self), fields(args = ?args))]
    async fn run(&self, program: &str, args: &[&str], cwd: Option<&Path>) -> Result<CommandOutput> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| GitError::SemaphoreError)?;

        let mut cmd = Command::new(program);
        cmd.args(args)
            .env("GIT_TERMINAL_PROMPT", "0")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(dir) = cwd {
            cmd.current_dir(dir);
        }

        match timeout(self.timeout, cmd.output()).await {
            Ok(Ok(output)) => {
                let result = CommandOutput {
                    status: output.status.code(),
                    stdout: String::from_utf8_lossy(&output.stdout).to_string(),
                    stderr: String::from_utf8_lossy(&output.stderr).to_string(),
                };
                debug!(status = ?result.status, "{} exited", program);
                Ok(result)
            }
            Ok(Err(e)) => {
                warn!("failed to spawn {}: {}", program, e);
                Err(GitError::Spawn {
                    program: program.to_string(),
                    reason: e.to_string(),
                }
                .into())
            }
            Err(_) => Err(GitError::Timeout(self.timeout).into()),
        }
    }

    fn git_program(&self) -> &str {
        &self.git_program
    }
}

/// Render an invocation the way a user would type it
pub fn describe(program: &str, args: &[&str]) -> String {
    std::iter::once(program)
        .chain(args.iter().copied())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Run git in `repo` and return stdout, turning a non-zero exit into
/// [`GitError::CommandFailed`] carrying git's own error text.
pub async fn run_git<R>(runner: &R, repo: &Path, args: &[&str]) -> Result<String>
where
    R: CommandRunner + ?Sized,
{
    let program = runner.git_program();
    let output = runner.run(program, args, Some(repo)).await?;

    if output.success() {
        Ok(output.stdout)
    } else {
        Err(GitError::CommandFailed {
            command: describe(program, args),
            stderr: output.stderr.trim().to_string(),
        }
        .into())
    }
}
