use serde::Deserialize;

/// A branch entry as returned by `GET /repos/{owner}/{repo}/branches`
///
/// Only the name is used; the commit and protection fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GitHubBranch {
  pub name: String,
}

/// Owner and repository name extracted from a GitHub URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
  pub owner: String,
  pub repo: String,
}

impl RepoRef {
  pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
    Self {
      owner: owner.into(),
      repo: repo.into(),
    }
  }
}

impl std::fmt::Display for RepoRef {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}/{}", self.owner, self.repo)
  }
}
