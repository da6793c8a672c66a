//! Error type for GitHub API calls.

use reqwest::StatusCode;
use thiserror::Error;

/// Failure modes of a GitHub API request
#[derive(Debug, Error)]
pub enum GitHubError {
  /// The repository URL does not point at github.com
  #[error("not a GitHub repository URL: {0}")]
  UnsupportedUrl(String),

  /// The HTTP client could not be constructed
  #[error("failed to build HTTP client: {0}")]
  Client(#[source] reqwest::Error),

  /// The request failed before a response was received (DNS, TLS, timeout)
  #[error("request to {url} failed: {source}")]
  Transport {
    url: String,
    #[source]
    source: reqwest::Error,
  },

  /// GitHub answered with something other than 200 OK
  #[error("unexpected response from {url}: HTTP {status}{detail}")]
  Status {
    url: String,
    status: StatusCode,
    /// Either empty or ` - <message from the API>`
    detail: String,
  },

  /// The response body was not the expected JSON shape
  #[error("failed to parse response from {url}: {source}")]
  Decode {
    url: String,
    #[source]
    source: serde_json::Error,
  },
}

impl GitHubError {
  /// Whether the request timed out rather than failing outright
  pub fn is_timeout(&self) -> bool {
    matches!(self, Self::Transport { source, .. } if source.is_timeout())
  }
}
