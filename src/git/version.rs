//! Git version detection and feature gating

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use super::CommandRunner;
use crate::error::{Error, GitError, Result};

/// `symbolic-ref HEAD <ref>` needs at least this version
pub const MIN_SET_DEFAULT_BRANCH_VERSION: GitVersion = GitVersion::new(1, 7, 10);

/// First dotted number in `git --version` output
static VERSION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\.(\d+)(?:\.(\d+))?").unwrap());

/// A git release number, compared component-wise
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GitVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl GitVersion {
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Extract the version from `git --version` style text.
    ///
    /// Accepts vendor suffixes such as `2.39.2 (Apple Git-143)` or
    /// `2.45.1.windows.1`; a missing patch component reads as 0.
    pub fn parse(text: &str) -> Option<Self> {
        let caps = VERSION_PATTERN.captures(text)?;
        let component = |i: usize| -> Option<u32> {
            match caps.get(i) {
                Some(m) => m.as_str().parse().ok(),
                None => Some(0),
            }
        };
        Some(Self::new(component(1)?, component(2)?, component(3)?))
    }

    /// Ask the runner's git for its version
    pub async fn detect<R>(runner: &R) -> Result<Self>
    where
        R: CommandRunner + ?Sized,
    {
        let program = runner.git_program();
        let output = runner.run(program, &["--version"], None).await?;
        if !output.success() {
            return Err(GitError::CommandFailed {
                command: format!("{program} --version"),
                stderr: output.stderr.trim().to_string(),
            }
            .into());
        }

        let version: GitVersion = output.stdout.parse()?;
        debug!("git version: {}", version);
        Ok(version)
    }

    /// Fail with [`GitError::UnsupportedVersion`] when older than `required`
    pub fn ensure_at_least(self, required: GitVersion) -> Result<()> {
        if self < required {
            return Err(GitError::UnsupportedVersion {
                required,
                found: self,
            }
            .into());
        }
        Ok(())
    }
}

impl FromStr for GitVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s).ok_or_else(|| GitError::InvalidVersion(s.trim().to_string()).into())
    }
}

impl fmt::Display for GitVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}
