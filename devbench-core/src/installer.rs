//! # Installer Driver
//!
//! Top-level control flow: list branches and stop, or validate the branch,
//! initialize the bench, and create the site.

use std::path::PathBuf;

use anyhow::Result;
use tracing::info;

use crate::bench::{InitOutcome, init_bench_if_missing};
use crate::branches::{BranchLister, validate_branch};
use crate::options::InstallOptions;
use crate::output::Logger;
use crate::process::CommandRunner;
use crate::site::create_site;

/// How a run ended; every variant maps to a zero exit code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
  /// `--list-branches` printed the discovered branches (or an error)
  ListedBranches,
  /// The requested branch does not exist on the remote
  BranchRejected,
  /// `bench init` failed, so no site was created
  InitFailed,
  /// `bench new-site` was run; `succeeded` reflects its exit status
  SiteCreated { succeeded: bool },
}

/// Wires the options to their collaborators
pub struct Installer<'a> {
  options: &'a InstallOptions,
  workdir: PathBuf,
  runner: &'a dyn CommandRunner,
  branches: &'a dyn BranchLister,
}

impl<'a> Installer<'a> {
  pub fn new(
    options: &'a InstallOptions,
    workdir: impl Into<PathBuf>,
    runner: &'a dyn CommandRunner,
    branches: &'a dyn BranchLister,
  ) -> Self {
    Self {
      options,
      workdir: workdir.into(),
      runner,
      branches,
    }
  }

  pub fn run(&self, log: &mut Logger) -> Result<RunOutcome> {
    if self.options.list_branches {
      self.print_branches(log);
      return Ok(RunOutcome::ListedBranches);
    }

    let options = self.options;
    if !validate_branch(self.branches, &options.frappe_repo, &options.frappe_branch, log) {
      log.error("Please specify a valid branch using --frappe-branch");
      return Ok(RunOutcome::BranchRejected);
    }

    let init = init_bench_if_missing(options, &self.workdir, self.runner, log)?;
    info!("Bench initialization finished: {init:?}");
    if init == InitOutcome::Failed {
      return Ok(RunOutcome::InitFailed);
    }

    let succeeded = create_site(options, &self.workdir, self.runner, log)?;
    Ok(RunOutcome::SiteCreated { succeeded })
  }

  fn print_branches(&self, log: &mut Logger) {
    let repo = &self.options.frappe_repo;
    log.success(&format!("Fetching available branches from {repo}..."));

    let mut branches = self.branches.list_branches(repo, log);
    if branches.is_empty() {
      log.error("Could not fetch branches. Please check the repository URL.");
      return;
    }

    branches.sort();
    log.success("Available branches:");
    for branch in &branches {
      log.warn(&format!("  - {branch}"));
    }
  }
}
