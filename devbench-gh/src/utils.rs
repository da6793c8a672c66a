//! # GitHub Utility Functions
//!
//! Helpers for recognising github.com repository URLs and extracting the
//! owner and repository name from them.

use url::Url;

use crate::consts::GITHUB_URL_PREFIX;
use crate::error::GitHubError;
use crate::models::RepoRef;

/// Extract owner and repo from a `https://github.com/<owner>/<repo>` URL
///
/// The owner and repo are the first two path components after the host. A
/// trailing `.git` on the repo component is dropped. Anything not under
/// `https://github.com/` is rejected without further inspection.
pub fn parse_repo_url(repo_url: &str) -> Result<RepoRef, GitHubError> {
  let unsupported = || GitHubError::UnsupportedUrl(repo_url.to_string());

  if !repo_url.starts_with(GITHUB_URL_PREFIX) {
    return Err(unsupported());
  }

  let url = Url::parse(repo_url).map_err(|_| unsupported())?;
  let mut segments = url.path_segments().ok_or_else(unsupported)?;

  let owner = segments.next().filter(|s| !s.is_empty()).ok_or_else(unsupported)?;
  let repo = segments
    .next()
    .map(|s| s.strip_suffix(".git").unwrap_or(s))
    .filter(|s| !s.is_empty())
    .ok_or_else(unsupported)?;

  Ok(RepoRef::new(owner, repo))
}
