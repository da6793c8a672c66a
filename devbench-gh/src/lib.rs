//! # GitHub API Client
//!
//! Minimal GitHub REST integration for discovering the branches of a
//! repository hosted on github.com. Used as the first tier of branch
//! discovery before falling back to `git ls-remote`.

pub mod client;
pub mod consts;
pub mod endpoints;
pub mod error;
pub mod models;
pub mod utils;

// Re-export the client
pub use client::GitHubClient;
pub use error::GitHubError;
// Re-export models
pub use models::{GitHubBranch, RepoRef};
pub use utils::parse_repo_url;
