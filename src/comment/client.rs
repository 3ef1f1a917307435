//! GitHub REST API client for pull request lookups and comments

use crate::error::{ActionError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Default base URL for GitHub API
pub const DEFAULT_BASE_URL: &str = "https://api.github.com";

/// Pull request as returned by the commits/{sha}/pulls endpoint
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct PullRequest {
    pub number: u64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub html_url: Option<String>,
}

#[derive(Debug, Serialize)]
struct CommentRequest<'a> {
    body: &'a str,
}

/// Operations the commenter needs from the hosting service
#[async_trait]
pub trait PullRequestApi: Send + Sync {
    /// Pull requests associated with a commit, most relevant first
    async fn list_pull_requests_for_commit(
        &self,
        owner: &str,
        repo: &str,
        sha: &str,
    ) -> Result<Vec<PullRequest>>;

    /// Add a comment to an issue or pull request
    async fn create_comment(&self, owner: &str, repo: &str, issue_number: u64, body: &str)
        -> Result<()>;
}

/// [PullRequestApi] over the GitHub REST API
pub struct GitHubClient {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl GitHubClient {
    pub fn new(base_url: &str, token: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("pr-merge-comment/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    fn request(&self, method: reqwest::Method, url: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, url)
            .bearer_auth(&self.token)
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
    }
}

async fn check_status(response: reqwest::Response, url: &str) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    warn!("GitHub API returned status {}: {}", status, url);
    Err(ActionError::api(format!(
        "{} returned status {}: {}",
        url,
        status,
        body.trim()
    )))
}

#[async_trait]
impl PullRequestApi for GitHubClient {
    async fn list_pull_requests_for_commit(
        &self,
        owner: &str,
        repo: &str,
        sha: &str,
    ) -> Result<Vec<PullRequest>> {
        let url = format!("{}/repos/{}/{}/commits/{}/pulls", self.base_url, owner, repo, sha);
        debug!("GET {}", url);

        let response = self.request(reqwest::Method::GET, &url).send().await?;
        let response = check_status(response, &url).await?;

        let pull_requests: Vec<PullRequest> = response.json().await.map_err(|e| {
            warn!("Failed to parse pull request list: {}", e);
            ActionError::api(format!("Invalid response from {}: {}", url, e))
        })?;

        Ok(pull_requests)
    }

    async fn create_comment(
        &self,
        owner: &str,
        repo: &str,
        issue_number: u64,
        body: &str,
    ) -> Result<()> {
        let url = format!(
            "{}/repos/{}/{}/issues/{}/comments",
            self.base_url, owner, repo, issue_number
        );
        debug!("POST {}", url);

        let response = self
            .request(reqwest::Method::POST, &url)
            .json(&CommentRequest { body })
            .send()
            .await?;
        check_status(response, &url).await?;

        Ok(())
    }
}
