//! # Branch Discovery and Validation
//!
//! Resolves the remote branches of a repository (GitHub REST API first,
//! `git ls-remote` as the fallback) and decides whether a requested branch is
//! acceptable. Discovery never fails outright: when both tiers fail it yields
//! an empty list and validation lets the branch through.

use anyhow::{Context, Result, anyhow};
use devbench_gh::{GitHubClient, GitHubError, parse_repo_url};
use tokio::runtime::{Builder, Runtime};
use tracing::{debug, instrument};

use crate::git::{ls_remote_heads, parse_ls_remote_heads};
use crate::output::Logger;
use crate::process::CommandRunner;

/// Source of remote branch names for a repository URL
pub trait BranchLister {
  /// Branch names in the order the remote reported them; empty when they
  /// could not be determined
  fn list_branches(&self, repo_url: &str, log: &mut Logger) -> Vec<String>;
}

/// Two-tier discovery: GitHub API, then `git ls-remote`
pub struct BranchDiscovery<'a> {
  github: GitHubClient,
  runtime: Runtime,
  runner: &'a dyn CommandRunner,
}

impl<'a> BranchDiscovery<'a> {
  pub fn new(github: GitHubClient, runner: &'a dyn CommandRunner) -> Result<Self> {
    let runtime = Builder::new_current_thread()
      .enable_all()
      .build()
      .context("Failed to create async runtime")?;

    Ok(Self {
      github,
      runtime,
      runner,
    })
  }

  /// Ask the GitHub API; only `https://github.com/` URLs are attempted
  fn from_github_api(&self, repo_url: &str) -> Result<Vec<String>, GitHubError> {
    let repo = parse_repo_url(repo_url)?;
    self.runtime.block_on(self.github.list_branches(&repo))
  }

  /// Ask the remote directly
  fn from_ls_remote(&self, repo_url: &str) -> Result<Vec<String>> {
    let output = self.runner.run(&ls_remote_heads(repo_url))?;

    if !output.success() {
      return Err(anyhow!(
        "git ls-remote ended with {}: {}",
        output.status_label(),
        output.stderr.trim()
      ));
    }

    Ok(parse_ls_remote_heads(&output.stdout))
  }
}

impl BranchLister for BranchDiscovery<'_> {
  #[instrument(skip(self, log), level = "debug")]
  fn list_branches(&self, repo_url: &str, log: &mut Logger) -> Vec<String> {
    match self.from_github_api(repo_url) {
      Ok(branches) => {
        debug!("GitHub API returned {} branches", branches.len());
        return branches;
      }
      Err(err) => log.warn(&format!("Warning: Could not fetch branches from {repo_url}: {err}")),
    }

    match self.from_ls_remote(repo_url) {
      Ok(branches) => {
        debug!("git ls-remote returned {} branches", branches.len());
        branches
      }
      Err(err) => {
        log.warn(&format!(
          "Warning: Could not fetch branches using git ls-remote: {err:#}"
        ));
        Vec::new()
      }
    }
  }
}

/// Decide whether `branch` may be used
///
/// Rejects only a confirmed absence; an empty discovery result is accepted
/// with a warning.
pub fn validate_branch(lister: &dyn BranchLister, repo_url: &str, branch: &str, log: &mut Logger) -> bool {
  let available = lister.list_branches(repo_url, log);

  if available.is_empty() {
    log.warn(&format!(
      "Warning: Could not validate branch '{branch}' - proceeding anyway"
    ));
    return true;
  }

  if available.iter().any(|candidate| candidate == branch) {
    return true;
  }

  log.error(&format!("Error: Branch '{branch}' not found in repository {repo_url}"));
  log.warn(&format!("Available branches: {}", available.join(", ")));
  false
}
