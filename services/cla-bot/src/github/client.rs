//! GitHub REST Client
//!
//! The [`GitHubClient`] trait is the only way the reconcilers talk to GitHub.
//! [`RestClient`] implements it over the REST API with a bearer token.

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use super::types::{CombinedStatus, Issue, IssueSearchResult, Label, PullRequest};

pub const DEFAULT_API_URL: &str = "https://api.github.com";
const USER_AGENT: &str = "lornu-ai-cla-bot";
const API_VERSION: &str = "2022-11-28";

/// Errors returned by GitHub API calls
#[derive(Debug, Error)]
pub enum GitHubError {
    /// Transport-level failure (connect, timeout, TLS)
    #[error("GitHub request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// GitHub answered with a non-success status
    #[error("GitHub API error ({status}): {body}")]
    Api { status: StatusCode, body: String },

    /// The response body did not match the expected shape
    #[error("Failed to decode GitHub response: {0}")]
    Decode(String),
}

pub type Result<T> = std::result::Result<T, GitHubError>;

/// Operations the CLA reconcilers need from GitHub
#[async_trait]
pub trait GitHubClient: Send + Sync {
    async fn add_label(&self, org: &str, repo: &str, number: u64, label: &str) -> Result<()>;

    async fn remove_label(&self, org: &str, repo: &str, number: u64, label: &str) -> Result<()>;

    async fn get_pull_request(&self, org: &str, repo: &str, number: u64) -> Result<PullRequest>;

    /// Run an issue search query. An empty `sort` keeps GitHub's best-match order.
    async fn find_issues(&self, query: &str, sort: &str, asc: bool) -> Result<Vec<Issue>>;

    async fn get_issue_labels(&self, org: &str, repo: &str, number: u64) -> Result<Vec<Label>>;

    async fn get_combined_status(
        &self,
        org: &str,
        repo: &str,
        git_ref: &str,
    ) -> Result<CombinedStatus>;
}

#[derive(Serialize)]
struct AddLabelsRequest<'a> {
    labels: [&'a str; 1],
}

/// GitHub REST API client authenticated with an installation token or PAT
pub struct RestClient {
    http_client: Client,
    base_url: String,
    token: String,
}

impl RestClient {
    pub fn new(token: impl Into<String>) -> Result<Self> {
        Self::with_base_url(token, DEFAULT_API_URL)
    }

    /// Create a client against a non-default API root (GitHub Enterprise, proxies)
    pub fn with_base_url(token: impl Into<String>, base_url: &str) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.into(),
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        debug!(method = %method, path = %path, "GitHub request");
        self.http_client
            .request(method, format!("{}{}", self.base_url, path))
            .bearer_auth(&self.token)
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", API_VERSION)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = request.send().await?;
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Err(GitHubError::Api { status, body })
    }

    async fn get_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = self.send(request).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| GitHubError::Decode(e.to_string()))
    }
}

#[async_trait]
impl GitHubClient for RestClient {
    async fn add_label(&self, org: &str, repo: &str, number: u64, label: &str) -> Result<()> {
        let path = format!("/repos/{}/{}/issues/{}/labels", org, repo, number);
        let request = self
            .request(Method::POST, &path)
            .json(&AddLabelsRequest { labels: [label] });

        self.send(request).await?;
        Ok(())
    }

    async fn remove_label(&self, org: &str, repo: &str, number: u64, label: &str) -> Result<()> {
        let path = format!(
            "/repos/{}/{}/issues/{}/labels/{}",
            org,
            repo,
            number,
            urlencoding::encode(label)
        );

        match self.send(self.request(Method::DELETE, &path)).await {
            Ok(_) => Ok(()),
            // Already gone
            Err(GitHubError::Api { status, .. }) if status == StatusCode::NOT_FOUND => Ok(()),
            Err(e) => Err(e),
        }
    }

    async fn get_pull_request(&self, org: &str, repo: &str, number: u64) -> Result<PullRequest> {
        let path = format!("/repos/{}/{}/pulls/{}", org, repo, number);
        self.get_json(self.request(Method::GET, &path)).await
    }

    async fn find_issues(&self, query: &str, sort: &str, asc: bool) -> Result<Vec<Issue>> {
        let mut params = vec![("q", query), ("per_page", "100")];
        if !sort.is_empty() {
            params.push(("sort", sort));
            params.push(("order", if asc { "asc" } else { "desc" }));
        }

        let request = self.request(Method::GET, "/search/issues").query(&params);
        let result: IssueSearchResult = self.get_json(request).await?;
        debug!(total = result.total_count, "Issue search complete");
        Ok(result.items)
    }

    async fn get_issue_labels(&self, org: &str, repo: &str, number: u64) -> Result<Vec<Label>> {
        let path = format!("/repos/{}/{}/issues/{}/labels", org, repo, number);
        let request = self
            .request(Method::GET, &path)
            .query(&[("per_page", "100")]);
        self.get_json(request).await
    }

    async fn get_combined_status(
        &self,
        org: &str,
        repo: &str,
        git_ref: &str,
    ) -> Result<CombinedStatus> {
        let path = format!("/repos/{}/{}/commits/{}/status", org, repo, git_ref);
        let request = self
            .request(Method::GET, &path)
            .query(&[("per_page", "100")]);
        self.get_json(request).await
    }
}
