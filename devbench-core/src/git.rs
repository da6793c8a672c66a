//! # Remote Branch Listing via Git
//!
//! Builds the `git ls-remote --heads` invocation and parses its output into
//! branch names. Works for any host git can reach, with no API token.

use crate::consts::{GIT_EXECUTABLE, LS_REMOTE_TIMEOUT};
use crate::process::Invocation;

const HEADS_PREFIX: &str = "refs/heads/";

/// `git ls-remote --heads <url>`, captured and bounded by the ls-remote timeout
pub fn ls_remote_heads(repo_url: &str) -> Invocation {
  Invocation::new(GIT_EXECUTABLE)
    .args(["ls-remote", "--heads", repo_url])
    .timeout(LS_REMOTE_TIMEOUT)
    .captured()
}

/// Parse `<sha>\t<ref>` lines into branch names, in the order received
///
/// Lines with fewer than two fields are skipped.
pub fn parse_ls_remote_heads(stdout: &str) -> Vec<String> {
  stdout
    .lines()
    .filter_map(|line| line.split_whitespace().nth(1))
    .map(|reference| reference.strip_prefix(HEADS_PREFIX).unwrap_or(reference))
    .map(str::to_string)
    .collect()
}
