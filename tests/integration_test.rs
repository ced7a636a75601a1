//! Integration tests for branchkit
//!
//! These tests drive a real `git` binary in temporary repositories and are
//! skipped when git is not installed.

use std::path::{Path, PathBuf};

use pretty_assertions::assert_eq;
use tempfile::TempDir;

use branchkit::error::{Error, GitError};
use branchkit::git::{self, GitVersion, ProcessExecutor, Repository};

/// Helper to check if git is available
async fn git_available() -> bool {
    tokio::process::Command::new("git")
        .arg("--version")
        .output()
        .await
        .map(|o| o.status.success())
        .unwrap_or(false)
}

async fn run(repo_path: &Path, args: &[&str]) {
    let output = tokio::process::Command::new("git")
        .current_dir(repo_path)
        .args(args)
        .output()
        .await
        .unwrap();
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
}

/// Helper to create a test git repository with one commit on `main`
async fn create_test_repo() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let repo_path = temp_dir.path().to_path_buf();

    run(&repo_path, &["init"]).await;
    run(&repo_path, &["symbolic-ref", "HEAD", "refs/heads/main"]).await;

    // Configure git user for commits
    run(&repo_path, &["config", "user.email", "test@test.com"]).await;
    run(&repo_path, &["config", "user.name", "Test User"]).await;

    tokio::fs::write(repo_path.join("README.md"), "# Test Repository\n")
        .await
        .unwrap();
    run(&repo_path, &["add", "README.md"]).await;
    run(&repo_path, &["commit", "-m", "Initial commit"]).await;

    (temp_dir, repo_path)
}

async fn open(repo_path: &Path) -> Repository<ProcessExecutor> {
    Repository::open(repo_path, ProcessExecutor::new())
        .await
        .unwrap()
}

#[tokio::test]
async fn test_detect_version() {
    if !git_available().await {
        eprintln!("Skipping test: git not available");
        return;
    }

    let version = GitVersion::detect(&ProcessExecutor::new()).await.unwrap();
    assert!(version >= GitVersion::new(1, 0, 0));
}

#[tokio::test]
async fn test_list_branches() {
    if !git_available().await {
        eprintln!("Skipping test: git not available");
        return;
    }

    let (_temp_dir, repo_path) = create_test_repo().await;
    run(&repo_path, &["branch", "feature/x"]).await;

    let repo = open(&repo_path).await;
    // show-ref lists refs sorted by name
    assert_eq!(repo.branches().await.unwrap(), vec!["feature/x", "main"]);
}

#[tokio::test]
async fn test_head_branch() {
    if !git_available().await {
        eprintln!("Skipping test: git not available");
        return;
    }

    let (_temp_dir, repo_path) = create_test_repo().await;
    let repo = open(&repo_path).await;

    let head = repo.head_branch().await.unwrap();
    assert_eq!(head.name, "main");
    assert_eq!(head.path, "refs/heads/main");
}

#[tokio::test]
async fn test_head_branch_detached() {
    if !git_available().await {
        eprintln!("Skipping test: git not available");
        return;
    }

    let (_temp_dir, repo_path) = create_test_repo().await;
    run(&repo_path, &["checkout", "--detach"]).await;

    let repo = open(&repo_path).await;
    let err = repo.head_branch().await.unwrap_err();
    assert!(matches!(err, Error::Git(GitError::InvalidHead(_))), "got {err:?}");
}

#[tokio::test]
async fn test_set_default_branch_then_exists() {
    if !git_available().await {
        eprintln!("Skipping test: git not available");
        return;
    }

    let (_temp_dir, repo_path) = create_test_repo().await;
    run(&repo_path, &["branch", "develop"]).await;

    let repo = open(&repo_path).await;
    repo.set_default_branch("develop").await.unwrap();

    assert!(repo.branch_exists("develop").await);
    assert_eq!(repo.head_branch().await.unwrap().name, "develop");
}

#[tokio::test]
async fn test_reference_exists() {
    if !git_available().await {
        eprintln!("Skipping test: git not available");
        return;
    }

    let (_temp_dir, repo_path) = create_test_repo().await;
    run(&repo_path, &["tag", "v1.0.0"]).await;

    let executor = ProcessExecutor::new();
    assert!(git::reference_exists(&executor, &repo_path, "refs/tags/v1.0.0").await);
    assert!(!git::reference_exists(&executor, &repo_path, "refs/tags/v2.0.0").await);
    assert!(git::branch_exists(&executor, &repo_path, "main").await);
    assert!(!git::branch_exists(&executor, &repo_path, "nope").await);
}

#[tokio::test]
async fn test_add_and_remove_remote() {
    if !git_available().await {
        eprintln!("Skipping test: git not available");
        return;
    }

    let (_upstream_dir, upstream_path) = create_test_repo().await;
    let (_temp_dir, repo_path) = create_test_repo().await;
    let repo = open(&repo_path).await;
    let url = upstream_path.to_string_lossy().to_string();

    repo.add_remote("upstream", &url, true).await.unwrap();
    assert!(repo.reference_exists("refs/remotes/upstream/main").await);

    // Adding the same name twice is git's error, passed through
    let err = repo.add_remote("upstream", &url, false).await.unwrap_err();
    assert!(matches!(err, Error::Git(GitError::CommandFailed { .. })));

    repo.remove_remote("upstream").await.unwrap();
    assert!(!repo.reference_exists("refs/remotes/upstream/main").await);
    assert!(repo.remove_remote("upstream").await.is_err());
}

#[tokio::test]
async fn test_add_remote_without_fetch() {
    if !git_available().await {
        eprintln!("Skipping test: git not available");
        return;
    }

    let (_upstream_dir, upstream_path) = create_test_repo().await;
    let (_temp_dir, repo_path) = create_test_repo().await;
    let repo = open(&repo_path).await;

    repo.add_remote("upstream", &upstream_path.to_string_lossy(), false)
        .await
        .unwrap();
    assert!(!repo.reference_exists("refs/remotes/upstream/main").await);
}
