//! Branch and remote operations on a repository via the git CLI
//!
//! Each operation is a single git invocation in the repository directory
//! followed by light parsing of its stdout. Nothing is retried.

use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use super::branch::{parse_branch_names, Branch, BRANCH_PREFIX};
use super::executor::{describe, run_git};
use super::version::{GitVersion, MIN_SET_DEFAULT_BRANCH_VERSION};
use super::CommandRunner;
use crate::error::{GitError, Result};

/// Returns `true` if `name` resolves with `git show-ref --verify`.
///
/// Every failure reads as `false`; "not found" is not told apart from
/// git being unable to run.
#[instrument(skip(runner, repo), fields(repo = %repo.display()))]
pub async fn reference_exists<R>(runner: &R, repo: &Path, name: &str) -> bool
where
    R: CommandRunner + ?Sized,
{
    match run_git(runner, repo, &["show-ref", "--verify", name]).await {
        Ok(_) => true,
        Err(e) => {
            debug!("reference {} not verified: {}", name, e);
            false
        }
    }
}

/// Returns `true` if the local branch `name` exists
pub async fn branch_exists<R>(runner: &R, repo: &Path, name: &str) -> bool
where
    R: CommandRunner + ?Sized,
{
    reference_exists(runner, repo, &Branch::ref_path(name)).await
}

/// Handle on a repository directory
///
/// Holds the injected runner and the git version it was opened with. The
/// handle itself is never mutated; git changes the tree underneath it.
pub struct Repository<R> {
    path: PathBuf,
    runner: R,
    version: GitVersion,
}

impl<R: CommandRunner> Repository<R> {
    /// Open `path`, asking the runner's git for its version
    pub async fn open(path: impl AsRef<Path>, runner: R) -> Result<Self> {
        let version = GitVersion::detect(&runner).await?;
        Ok(Self::with_version(path, runner, version))
    }

    /// Open `path` with an already known git version
    pub fn with_version(path: impl AsRef<Path>, runner: R, version: GitVersion) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            runner,
            version,
        }
    }

    /// Get the repository path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Git version this handle gates features on
    pub fn version(&self) -> GitVersion {
        self.version
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    async fn git(&self, args: &[&str]) -> Result<String> {
        run_git(&self.runner, &self.path, args).await
    }

    /// Check if a reference exists
    pub async fn reference_exists(&self, name: &str) -> bool {
        reference_exists(&self.runner, &self.path, name).await
    }

    /// Check if a branch exists
    pub async fn branch_exists(&self, name: &str) -> bool {
        branch_exists(&self.runner, &self.path, name).await
    }

    /// Branch HEAD points at.
    ///
    /// Fails with [`GitError::InvalidHead`] when HEAD is detached or resolves
    /// to something outside `refs/heads/`.
    #[instrument(skip_all, fields(repo = %self.path.display()))]
    pub async fn head_branch(&self) -> Result<Branch> {
        let program = self.runner.git_program();
        let args = ["symbolic-ref", "-q", "HEAD"];
        let output = self.runner.run(program, &args, Some(self.path.as_path())).await?;

        match output.status {
            Some(0) => {}
            // `-q` exits 1 without a message when HEAD is not a symbolic ref
            Some(1) => {
                let stderr = output.stderr.trim();
                let detail = if stderr.is_empty() { "detached HEAD" } else { stderr };
                return Err(GitError::InvalidHead(detail.to_string()).into());
            }
            _ => {
                return Err(GitError::CommandFailed {
                    command: describe(program, &args),
                    stderr: output.stderr.trim().to_string(),
                }
                .into());
            }
        }

        let head = output.stdout.trim();
        Branch::from_ref_path(head).ok_or_else(|| GitError::InvalidHead(head.to_string()).into())
    }

    /// Point HEAD at `refs/heads/<name>`
    #[instrument(skip(self), fields(repo = %self.path.display()))]
    pub async fn set_default_branch(&self, name: &str) -> Result<()> {
        self.version.ensure_at_least(MIN_SET_DEFAULT_BRANCH_VERSION)?;

        let target = Branch::ref_path(name);
        self.git(&["symbolic-ref", "HEAD", &target]).await?;
        info!("HEAD now points at {}", target);
        Ok(())
    }

    /// Names of all local branches, in the order git lists them
    #[instrument(skip_all, fields(repo = %self.path.display()))]
    pub async fn branches(&self) -> Result<Vec<String>> {
        let stdout = self.git(&["show-ref", "--heads"]).await?;
        let names = parse_branch_names(&stdout);
        debug!("found {} branches under {}", names.len(), BRANCH_PREFIX);
        Ok(names)
    }

    /// Register a remote, fetching from it immediately when `fetch` is set
    #[instrument(skip(self), fields(repo = %self.path.display()))]
    pub async fn add_remote(&self, name: &str, url: &str, fetch: bool) -> Result<()> {
        let mut args = vec!["remote", "add"];
        if fetch {
            args.push("-f");
        }
        // Operands after `--` so a leading dash is never read as an option
        args.extend(["--", name, url]);

        self.git(&args).await?;
        info!("Added remote {} -> {}", name, url);
        Ok(())
    }

    /// Remove a remote
    #[instrument(skip(self), fields(repo = %self.path.display()))]
    pub async fn remove_remote(&self, name: &str) -> Result<()> {
        self.git(&["remote", "remove", "--", name]).await?;
        info!("Removed remote {}", name);
        Ok(())
    }
}
