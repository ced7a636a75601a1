//! Branch model and `show-ref` output parsing

use serde::Serialize;
use tracing::debug;

/// Namespace every local branch reference lives under
pub const BRANCH_PREFIX: &str = "refs/heads/";

/// A local branch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Branch {
    /// Short name, e.g. `feature/x`
    pub name: String,
    /// Full reference, e.g. `refs/heads/feature/x`
    pub path: String,
}

impl Branch {
    /// Build from a full reference path; `None` unless it is under `refs/heads/`
    pub fn from_ref_path(path: &str) -> Option<Self> {
        let name = path.strip_prefix(BRANCH_PREFIX)?;
        Some(Self {
            name: name.to_string(),
            path: path.to_string(),
        })
    }

    /// Full reference path for a short branch name
    pub fn ref_path(name: &str) -> String {
        format!("{BRANCH_PREFIX}{name}")
    }
}

/// Yield `(hash, ref_path)` for every `show-ref` line with exactly two fields.
///
/// Lines that don't have that shape are dropped here, not reported. Git's
/// output is trusted; a skipped line is logged at debug level only.
pub fn well_formed_ref_lines(stdout: &str) -> impl Iterator<Item = (&str, &str)> {
    stdout.lines().filter_map(|line| {
        let mut fields = line.split_whitespace();
        match (fields.next(), fields.next(), fields.next()) {
            (Some(hash), Some(path), None) => Some((hash, path)),
            _ => {
                if !line.trim().is_empty() {
                    debug!("skipping malformed show-ref line: {:?}", line);
                }
                None
            }
        }
    })
}

/// Branch names from `git show-ref --heads` output, in listing order
pub fn parse_branch_names(stdout: &str) -> Vec<String> {
    well_formed_ref_lines(stdout)
        .map(|(_, path)| path.strip_prefix(BRANCH_PREFIX).unwrap_or(path).to_string())
        .collect()
}
