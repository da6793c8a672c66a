//! Constants for the devbench-gh client

use std::time::Duration;

/// Base URL for the official SaaS GitHub API
pub const API_BASE_URL: &str = "https://api.github.com";

/// Repository URLs starting with this prefix are resolved through the API
pub const GITHUB_URL_PREFIX: &str = "https://github.com/";

/// User-Agent header value for the GitHub API client
pub const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Accept header value for the GitHub API
pub const ACCEPT: &str = "application/vnd.github.v3+json";

/// Per-request timeout for GitHub API calls
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Page size requested from list endpoints (GitHub's maximum)
pub const PER_PAGE: usize = 100;

/// Upper bound on pages fetched from a single list endpoint
pub const MAX_PAGES: usize = 10;
