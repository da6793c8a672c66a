//! Git repository management for testing
//!
//! Creates throwaway local repositories that `git ls-remote` can be pointed
//! at, so branch discovery can be exercised without a network.

use std::fs;
use std::path::Path;

use anyhow::Result;
use git2::{Repository, RepositoryInitOptions, Signature};
use tempfile::TempDir;

/// A temporary git repository with a known set of branches
pub struct GitRepoTestGuard {
  /// The temporary directory containing the git repository
  pub temp_dir: TempDir,
  /// The git repository
  pub repo: Repository,
}

impl GitRepoTestGuard {
  /// Create a repository whose only branches are `branches`
  ///
  /// The first name becomes the initial branch; every branch points at the
  /// same single commit.
  pub fn with_branches(branches: &[&str]) -> Self {
    let (first, rest) = branches.split_first().expect("At least one branch is required");

    let temp_dir = TempDir::new().expect("Failed to create temporary directory");
    let mut init_opts = RepositoryInitOptions::new();
    init_opts.initial_head(first);
    let repo = Repository::init_opts(temp_dir.path(), &init_opts).expect("Failed to initialize git repository");

    let mut config = repo.config().expect("Failed to get repository config");
    config
      .set_str("user.name", "Devbench Test User")
      .expect("Failed to set user.name");
    config
      .set_str("user.email", "devbench-test@example.com")
      .expect("Failed to set user.email");

    create_commit(&repo, "README.md", "# fixture\n", "Initial commit").expect("Failed to create initial commit");
    for branch in rest {
      create_branch(&repo, branch).expect("Failed to create branch");
    }

    Self { temp_dir, repo }
  }

  /// Get the path to the git repository
  pub fn path(&self) -> &Path {
    self.temp_dir.path()
  }

  /// The repository location as a URL-ish string git accepts
  pub fn url(&self) -> String {
    self.temp_dir.path().to_string_lossy().into_owned()
  }
}

/// Helper function to create a commit on HEAD
pub fn create_commit(repo: &Repository, file_name: &str, content: &str, message: &str) -> Result<()> {
  let workdir = repo.workdir().ok_or_else(|| anyhow::anyhow!("Repository has no working directory"))?;
  fs::write(workdir.join(file_name), content)?;

  let mut index = repo.index()?;
  index.add_path(Path::new(file_name))?;
  index.write()?;

  let tree_id = index.write_tree()?;
  let tree = repo.find_tree(tree_id)?;
  let signature = Signature::now("Test User", "test@example.com")?;

  match repo.head().ok().and_then(|head| head.peel_to_commit().ok()) {
    Some(parent) => repo.commit(Some("HEAD"), &signature, &signature, message, &tree, &[&parent])?,
    None => repo.commit(Some("HEAD"), &signature, &signature, message, &tree, &[])?,
  };

  Ok(())
}

/// Helper function to create a branch at HEAD
pub fn create_branch(repo: &Repository, branch_name: &str) -> Result<()> {
  let head = repo.head()?.peel_to_commit()?;
  repo.branch(branch_name, &head, false)?;
  Ok(())
}
