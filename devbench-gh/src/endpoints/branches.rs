use reqwest::StatusCode;
use tracing::{debug, instrument};

use crate::client::GitHubClient;
use crate::consts::{MAX_PAGES, PER_PAGE};
use crate::error::GitHubError;
use crate::models::{GitHubBranch, RepoRef};

impl GitHubClient {
  /// List the branch names of a repository in the order GitHub returns them
  ///
  /// Pages are requested until GitHub returns a short page or the page cap is
  /// reached. Any non-200 answer fails the whole listing.
  #[instrument(skip(self, repo), fields(repo = %repo), level = "debug")]
  pub async fn list_branches(&self, repo: &RepoRef) -> Result<Vec<String>, GitHubError> {
    let url = format!("{}/repos/{}/{}/branches", self.base_url, repo.owner, repo.repo);
    let mut names = Vec::new();

    for page in 1..=MAX_PAGES {
      let batch = self.fetch_branch_page(&url, page).await?;
      let count = batch.len();
      names.extend(batch.into_iter().map(|branch| branch.name));

      if count < PER_PAGE {
        break;
      }
    }

    debug!("Found {} branches", names.len());
    Ok(names)
  }

  async fn fetch_branch_page(&self, url: &str, page: usize) -> Result<Vec<GitHubBranch>, GitHubError> {
    let transport = |source| GitHubError::Transport {
      url: url.to_string(),
      source,
    };

    let response = self
      .get(url)
      .query(&[("per_page", PER_PAGE), ("page", page)])
      .send()
      .await
      .map_err(transport)?;

    let status = response.status();
    let body = response.text().await.map_err(transport)?;

    if status != StatusCode::OK {
      return Err(GitHubError::Status {
        url: url.to_string(),
        status,
        detail: api_error_message(&body).map(|m| format!(" - {m}")).unwrap_or_default(),
      });
    }

    serde_json::from_str::<Vec<GitHubBranch>>(&body).map_err(|source| GitHubError::Decode {
      url: url.to_string(),
      source,
    })
  }
}

/// Pull the `message` field out of a GitHub error body, if there is one
fn api_error_message(body: &str) -> Option<String> {
  let value = serde_json::from_str::<serde_json::Value>(body).ok()?;
  value.get("message").and_then(|m| m.as_str()).map(str::to_string)
}

#[cfg(test)]
mod tests {
  use std::time::Duration;

  use wiremock::matchers::{header, method, path, query_param};
  use wiremock::{Mock, MockServer, ResponseTemplate};

  use super::*;

  fn branch_page(names: &[String]) -> serde_json::Value {
    serde_json::Value::Array(
      names
        .iter()
        .map(|name| {
          serde_json::json!({
              "name": name,
              "commit": { "sha": "c5b97d5ae6c19d5c5df71a34c7fbeeda2479ccbc", "url": "https://api.github.com/repos/o/r/commits/c5b97d5" },
              "protected": false
          })
        })
        .collect(),
    )
  }

  async fn client_for(server: &MockServer) -> GitHubClient {
    GitHubClient::new(None).unwrap().with_base_url(server.uri())
  }

  /// Test listing the branches of a repository
  #[tokio::test]
  async fn test_list_branches() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;
    let names = vec!["version-12".to_string(), "main".to_string(), "version-14".to_string()];

    Mock::given(method("GET"))
      .and(path("/repos/sin-ev/backend/branches"))
      .and(query_param("per_page", "100"))
      .and(query_param("page", "1"))
      .and(header("Accept", "application/vnd.github.v3+json"))
      .respond_with(ResponseTemplate::new(200).set_body_json(branch_page(&names)))
      .expect(1)
      .mount(&mock_server)
      .await;

    let client = client_for(&mock_server).await;
    let branches = client.list_branches(&RepoRef::new("sin-ev", "backend")).await?;

    // Order is preserved as received
    assert_eq!(branches, names);
    Ok(())
  }

  /// Test that a full page triggers a request for the next one
  #[tokio::test]
  async fn test_list_branches_follows_full_pages() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;
    let first: Vec<String> = (0..PER_PAGE).map(|i| format!("feature-{i:03}")).collect();
    let second = vec!["version-12".to_string()];

    Mock::given(method("GET"))
      .and(path("/repos/owner/repo/branches"))
      .and(query_param("page", "1"))
      .respond_with(ResponseTemplate::new(200).set_body_json(branch_page(&first)))
      .mount(&mock_server)
      .await;

    Mock::given(method("GET"))
      .and(path("/repos/owner/repo/branches"))
      .and(query_param("page", "2"))
      .respond_with(ResponseTemplate::new(200).set_body_json(branch_page(&second)))
      .mount(&mock_server)
      .await;

    let client = client_for(&mock_server).await;
    let branches = client.list_branches(&RepoRef::new("owner", "repo")).await?;

    assert_eq!(branches.len(), PER_PAGE + 1);
    assert_eq!(branches.last().map(String::as_str), Some("version-12"));
    Ok(())
  }

  #[tokio::test]
  async fn test_list_branches_empty_repository() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
      .and(path("/repos/owner/empty/branches"))
      .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
      .mount(&mock_server)
      .await;

    let client = client_for(&mock_server).await;
    let branches = client.list_branches(&RepoRef::new("owner", "empty")).await?;

    assert!(branches.is_empty());
    Ok(())
  }

  /// Test that a 404 surfaces GitHub's error message
  #[tokio::test]
  async fn test_list_branches_not_found() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
      .and(path("/repos/owner/missing/branches"))
      .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
          "message": "Not Found",
          "documentation_url": "https://docs.github.com/rest/branches/branches#list-branches"
      })))
      .mount(&mock_server)
      .await;

    let client = client_for(&mock_server).await;
    let err = client.list_branches(&RepoRef::new("owner", "missing")).await.unwrap_err();

    match &err {
      GitHubError::Status { status, .. } => assert_eq!(*status, StatusCode::NOT_FOUND),
      other => panic!("expected status error, got {other:?}"),
    }
    assert!(err.to_string().contains("Not Found"));
    Ok(())
  }

  /// Test that a rate-limited answer is an error
  #[tokio::test]
  async fn test_list_branches_rate_limited() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
      .and(path("/repos/owner/repo/branches"))
      .respond_with(ResponseTemplate::new(403).set_body_json(serde_json::json!({
          "message": "API rate limit exceeded for 127.0.0.1."
      })))
      .mount(&mock_server)
      .await;

    let client = client_for(&mock_server).await;
    let err = client.list_branches(&RepoRef::new("owner", "repo")).await.unwrap_err();

    assert!(err.to_string().contains("rate limit"));
    Ok(())
  }

  /// Test that a body which is not a branch list is rejected
  #[tokio::test]
  async fn test_list_branches_malformed_json() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;

    let body = serde_json::json!({ "name": "not-a-list" });
    Mock::given(method("GET"))
      .and(path("/repos/owner/repo/branches"))
      .respond_with(ResponseTemplate::new(200).set_body_json(body))
      .mount(&mock_server)
      .await;

    let client = client_for(&mock_server).await;
    let err = client.list_branches(&RepoRef::new("owner", "repo")).await.unwrap_err();

    assert!(matches!(err, GitHubError::Decode { .. }));
    Ok(())
  }

  #[tokio::test]
  async fn test_list_branches_timeout() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
      .and(path("/repos/owner/slow/branches"))
      .respond_with(
        ResponseTemplate::new(200)
          .set_body_json(serde_json::json!([]))
          .set_delay(Duration::from_secs(2)),
      )
      .mount(&mock_server)
      .await;

    let client = GitHubClient::with_timeout(None, Duration::from_millis(100))?.with_base_url(mock_server.uri());
    let err = client.list_branches(&RepoRef::new("owner", "slow")).await.unwrap_err();

    assert!(err.is_timeout(), "expected a timeout, got {err:?}");
    Ok(())
  }

  /// Test that a configured token is sent as a bearer header
  #[tokio::test]
  async fn test_list_branches_sends_token() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;

    let body = branch_page(&["main".to_string()]);
    Mock::given(method("GET"))
      .and(path("/repos/owner/private/branches"))
      .and(header("Authorization", "Bearer ghp_test_token"))
      .respond_with(ResponseTemplate::new(200).set_body_json(body))
      .expect(1)
      .mount(&mock_server)
      .await;

    let client = GitHubClient::new(Some("ghp_test_token".to_string()))?.with_base_url(mock_server.uri());
    let branches = client.list_branches(&RepoRef::new("owner", "private")).await?;

    assert_eq!(branches, vec!["main".to_string()]);
    Ok(())
  }
}
