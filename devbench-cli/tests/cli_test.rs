use std::str;

use anyhow::Result;
use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use devbench_test_utils::{GitRepoTestGuard, WorkspaceGuard};
use predicates::prelude::*;

/// The binary, isolated from the user's config directory and GitHub token
fn devbench(workspace: &WorkspaceGuard) -> Command {
  let mut cmd = cargo_bin_cmd!("devbench");
  cmd
    .current_dir(workspace.path())
    .env("HOME", workspace.path())
    .env("XDG_CONFIG_HOME", workspace.path().join(".config"))
    .env_remove("GITHUB_TOKEN")
    .env_remove("RUST_LOG");
  cmd
}

#[test]
fn test_help_lists_flags() {
  let workspace = WorkspaceGuard::new();

  devbench(&workspace)
    .arg("--help")
    .assert()
    .success()
    .stdout(predicate::str::contains("--frappe-branch"))
    .stdout(predicate::str::contains("--list-branches"))
    .stdout(predicate::str::contains("--db-type"));
}

#[test]
fn test_version() {
  let workspace = WorkspaceGuard::new();

  devbench(&workspace)
    .arg("--version")
    .assert()
    .success()
    .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_unknown_flag_fails() {
  let workspace = WorkspaceGuard::new();

  devbench(&workspace)
    .arg("--bogus")
    .assert()
    .failure()
    .stderr(predicate::str::contains("--bogus"));
}

#[test]
fn test_invalid_db_type_fails() {
  let workspace = WorkspaceGuard::new();

  devbench(&workspace).args(["-d", "oracle"]).assert().failure();
  assert!(!workspace.bench_dir("frappe-bench").exists());
}

#[test]
fn test_list_branches_from_local_repository() -> Result<()> {
  let workspace = WorkspaceGuard::new();
  let remote = GitRepoTestGuard::with_branches(&["version-14", "main", "version-12"]);

  let assert = devbench(&workspace)
    .args(["--list-branches", "--colors", "never", "--frappe-repo", &remote.url()])
    .assert()
    .success();

  let stdout = str::from_utf8(&assert.get_output().stdout)?;
  let listed: Vec<&str> = stdout.lines().filter(|line| line.starts_with("  - ")).collect();
  assert_eq!(listed, ["  - main", "  - version-12", "  - version-14"]);
  let header = format!("Fetching available branches from {}...", remote.url());
  assert!(stdout.contains(&header));
  assert!(stdout.contains("Available branches:"));
  assert!(!stdout.contains('\x1b'));
  assert!(!workspace.bench_dir("frappe-bench").exists());

  Ok(())
}

#[test]
fn test_list_branches_colored() -> Result<()> {
  let workspace = WorkspaceGuard::new();
  let remote = GitRepoTestGuard::with_branches(&["main"]);

  devbench(&workspace)
    .args(["--list-branches", "--colors", "always", "-r", &remote.url()])
    .assert()
    .success()
    .stdout(predicate::str::contains("\x1b[93m  - main\x1b[0m"));

  Ok(())
}

#[test]
fn test_invalid_branch_exits_cleanly_without_bench() -> Result<()> {
  let workspace = WorkspaceGuard::new();
  let remote = GitRepoTestGuard::with_branches(&["main", "version-14"]);

  let assert = devbench(&workspace)
    .args(["--colors", "never", "-r", &remote.url(), "-t", "does-not-exist"])
    .assert()
    .success();

  let stdout = str::from_utf8(&assert.get_output().stdout)?;
  let missing = format!(
    "Error: Branch 'does-not-exist' not found in repository {}",
    remote.url()
  );
  assert!(stdout.contains(&missing));
  assert!(stdout.contains("Available branches: main, version-14"));
  assert!(stdout.contains("Please specify a valid branch using --frappe-branch"));
  assert!(!workspace.bench_dir("frappe-bench").exists());
  Ok(())
}

#[test]
fn test_config_file_supplies_repository() -> Result<()> {
  let workspace = WorkspaceGuard::new();
  let remote = GitRepoTestGuard::with_branches(&["develop"]);
  let config = workspace.path().join("devbench.toml");
  std::fs::write(&config, format!("frappe_repo = {:?}\n", remote.url()))?;

  devbench(&workspace)
    .args(["--list-branches", "--colors", "never", "--config"])
    .arg(&config)
    .assert()
    .success()
    .stdout(predicate::str::contains("  - develop"));

  Ok(())
}

#[test]
fn test_malformed_config_fails() -> Result<()> {
  let workspace = WorkspaceGuard::new();
  let config = workspace.path().join("devbench.toml");
  std::fs::write(&config, "db_type = \"sqlite\"\n")?;

  devbench(&workspace)
    .args(["--list-branches", "--config"])
    .arg(&config)
    .assert()
    .failure()
    .stderr(predicate::str::contains("Failed to parse config"));

  Ok(())
}
