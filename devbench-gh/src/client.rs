//! # GitHub HTTP Client
//!
//! HTTP client for unauthenticated (or token-authenticated) GitHub REST API
//! calls. Every request carries the same Accept and User-Agent headers and is
//! bounded by a per-request timeout.

use std::time::Duration;

use reqwest::{Client, RequestBuilder};

use crate::consts::{ACCEPT, API_BASE_URL, REQUEST_TIMEOUT, USER_AGENT};
use crate::error::GitHubError;

/// Environment variable holding an optional GitHub API token
pub const ENV_GITHUB_TOKEN: &str = "GITHUB_TOKEN";

/// Represents a GitHub API client
pub struct GitHubClient {
  pub(crate) client: Client,
  pub(crate) base_url: String,
  pub(crate) token: Option<String>,
}

impl GitHubClient {
  /// Create a new GitHub client against the public API
  pub fn new(token: Option<String>) -> Result<Self, GitHubError> {
    Self::with_timeout(token, REQUEST_TIMEOUT)
  }

  /// Create a client with a custom per-request timeout
  pub fn with_timeout(token: Option<String>, timeout: Duration) -> Result<Self, GitHubError> {
    let client = Client::builder()
      .user_agent(USER_AGENT)
      .timeout(timeout)
      .build()
      .map_err(GitHubError::Client)?;

    Ok(Self {
      client,
      base_url: API_BASE_URL.to_string(),
      token: token.filter(|t| !t.trim().is_empty()),
    })
  }

  /// Create a client using `GITHUB_TOKEN` from the environment, if set
  pub fn from_env() -> Result<Self, GitHubError> {
    Self::new(std::env::var(ENV_GITHUB_TOKEN).ok())
  }

  /// Point the client at a different API root (GitHub Enterprise, test servers)
  pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
    self.base_url = base_url.into().trim_end_matches('/').to_string();
    self
  }

  /// The API root requests are sent to
  pub fn base_url(&self) -> &str {
    &self.base_url
  }

  /// Whether requests carry a bearer token
  pub const fn is_authenticated(&self) -> bool {
    self.token.is_some()
  }

  /// Start a GET request with the standard headers applied
  pub(crate) fn get(&self, url: &str) -> RequestBuilder {
    let request = self.client.get(url).header("Accept", ACCEPT);
    match &self.token {
      Some(token) => request.bearer_auth(token),
      None => request,
    }
  }
}
