//! GitHub Data Types
//!
//! The subset of GitHub REST and webhook payloads the CLA reconciler reads.

use serde::{Deserialize, Serialize};

/// A GitHub user or organization login
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub login: String,
}

/// Repository identity as it appears in webhook payloads
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repo {
    pub owner: User,
    pub name: String,
}

impl Repo {
    pub fn new(org: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: User { login: org.into() },
            name: name.into(),
        }
    }

    /// Full name in `owner/repo` form
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner.login, self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub name: String,
}

impl Label {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// An issue (or pull request) as returned by the search API
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Issue {
    pub number: u64,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub labels: Vec<Label>,
    /// Present only when the issue is a pull request
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pull_request: Option<serde_json::Value>,
}

impl Issue {
    pub fn has_label(&self, name: &str) -> bool {
        self.labels.iter().any(|l| l.name == name)
    }

    pub fn is_pull_request(&self) -> bool {
        self.pull_request.is_some()
    }
}

/// Response envelope of `GET /search/issues`
#[derive(Debug, Clone, Deserialize)]
pub struct IssueSearchResult {
    #[serde(default)]
    pub total_count: u64,
    #[serde(default)]
    pub items: Vec<Issue>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestBranch {
    pub sha: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PullRequest {
    pub number: u64,
    #[serde(default)]
    pub state: String,
    pub head: PullRequestBranch,
}

/// State of a commit status
///
/// A missing or empty state is `Empty`; any other value GitHub does not
/// document lands in `Unknown`. Both still deserialize so the handler can
/// decide what to do with them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusState {
    #[default]
    #[serde(rename = "")]
    Empty,
    Pending,
    Success,
    Failure,
    Error,
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for StatusState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatusState::Empty => write!(f, ""),
            StatusState::Pending => write!(f, "pending"),
            StatusState::Success => write!(f, "success"),
            StatusState::Failure => write!(f, "failure"),
            StatusState::Error => write!(f, "error"),
            StatusState::Unknown => write!(f, "unknown"),
        }
    }
}

/// A single named status on a commit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    pub context: String,
    #[serde(default)]
    pub state: StatusState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_url: Option<String>,
}

impl Status {
    pub fn new(context: impl Into<String>, state: StatusState) -> Self {
        Self {
            context: context.into(),
            state,
            description: None,
            target_url: None,
        }
    }
}

/// All statuses recorded against a commit, in the order GitHub reports them
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CombinedStatus {
    #[serde(default)]
    pub sha: String,
    #[serde(default)]
    pub state: StatusState,
    #[serde(default)]
    pub statuses: Vec<Status>,
}

/// Payload of the `status` webhook
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatusEvent {
    pub sha: String,
    #[serde(default)]
    pub state: StatusState,
    #[serde(default)]
    pub context: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_url: Option<String>,
    #[serde(rename = "repository")]
    pub repo: Repo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenericCommentAction {
    Created,
    Edited,
    Deleted,
}

/// A comment on an issue or pull request, normalized across the
/// `issue_comment`, `pull_request_review` and `pull_request_review_comment`
/// webhooks by the host.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenericCommentEvent {
    pub action: GenericCommentAction,
    pub is_pr: bool,
    #[serde(default)]
    pub body: String,
    pub number: u64,
    #[serde(rename = "repository")]
    pub repo: Repo,
    #[serde(default)]
    pub user: User,
    /// `open` or `closed`
    pub issue_state: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html_url: Option<String>,
}
