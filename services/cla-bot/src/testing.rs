//! Recording in-memory GitHub client for tests

use async_trait::async_trait;
use reqwest::StatusCode;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Mutex;

use crate::github::client::Result;
use crate::github::{
    CombinedStatus, GitHubClient, GitHubError, Issue, Label, PullRequest, PullRequestBranch,
    Status, StatusState,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    AddLabel(u64, String),
    RemoveLabel(u64, String),
    GetPullRequest(u64),
    FindIssues(String),
    GetIssueLabels(u64),
    GetCombinedStatus(String),
}

impl Call {
    fn is_mutation(&self) -> bool {
        matches!(self, Call::AddLabel(..) | Call::RemoveLabel(..))
    }
}

/// Scripted responses plus a log of every call made.
///
/// Search results are consumed one per `find_issues` call; once the script
/// runs out, searches return nothing. Operations named in `failing` return
/// a 500. Unknown PRs return a 404.
#[derive(Default)]
pub struct FakeClient {
    calls: Mutex<Vec<Call>>,
    searches: Mutex<VecDeque<Vec<Issue>>>,
    pull_requests: HashMap<u64, PullRequest>,
    labels: HashMap<u64, Vec<Label>>,
    statuses: HashMap<String, CombinedStatus>,
    failing: HashSet<&'static str>,
}

impl FakeClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// An open PR search hit carrying `labels`
    pub fn issue(number: u64, labels: &[&str]) -> Issue {
        Issue {
            number,
            state: "open".to_string(),
            labels: labels.iter().map(|l| Label::new(*l)).collect(),
            pull_request: Some(serde_json::json!({})),
        }
    }

    pub fn with_search(self, issues: Vec<Issue>) -> Self {
        self.searches
            .lock()
            .expect("searches lock")
            .push_back(issues);
        self
    }

    pub fn with_pr(mut self, number: u64, head_sha: &str) -> Self {
        self.pull_requests.insert(
            number,
            PullRequest {
                number,
                state: "open".to_string(),
                head: PullRequestBranch {
                    sha: head_sha.to_string(),
                },
            },
        );
        self
    }

    pub fn with_labels(mut self, number: u64, labels: &[&str]) -> Self {
        self.labels
            .insert(number, labels.iter().map(|l| Label::new(*l)).collect());
        self
    }

    pub fn with_status(mut self, sha: &str, statuses: Vec<Status>) -> Self {
        self.statuses.insert(
            sha.to_string(),
            CombinedStatus {
                sha: sha.to_string(),
                state: StatusState::Pending,
                statuses,
            },
        );
        self
    }

    pub fn failing(mut self, operation: &'static str) -> Self {
        self.failing.insert(operation);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().expect("calls lock").clone()
    }

    pub fn mutations(&self) -> Vec<Call> {
        self.calls().into_iter().filter(Call::is_mutation).collect()
    }

    pub fn count(&self, predicate: impl Fn(&Call) -> bool) -> usize {
        self.calls().iter().filter(|c| predicate(c)).count()
    }

    fn record(&self, operation: &'static str, call: Call) -> Result<()> {
        self.calls.lock().expect("calls lock").push(call);
        if self.failing.contains(operation) {
            return Err(GitHubError::Api {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                body: format!("injected {} failure", operation),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl GitHubClient for FakeClient {
    async fn add_label(&self, _org: &str, _repo: &str, number: u64, label: &str) -> Result<()> {
        self.record("add_label", Call::AddLabel(number, label.to_string()))
    }

    async fn remove_label(&self, _org: &str, _repo: &str, number: u64, label: &str) -> Result<()> {
        self.record("remove_label", Call::RemoveLabel(number, label.to_string()))
    }

    async fn get_pull_request(&self, _org: &str, _repo: &str, number: u64) -> Result<PullRequest> {
        self.record("get_pull_request", Call::GetPullRequest(number))?;
        self.pull_requests
            .get(&number)
            .cloned()
            .ok_or_else(|| GitHubError::Api {
                status: StatusCode::NOT_FOUND,
                body: "Not Found".to_string(),
            })
    }

    async fn find_issues(&self, query: &str, _sort: &str, _asc: bool) -> Result<Vec<Issue>> {
        self.record("find_issues", Call::FindIssues(query.to_string()))?;
        Ok(self
            .searches
            .lock()
            .expect("searches lock")
            .pop_front()
            .unwrap_or_default())
    }

    async fn get_issue_labels(&self, _org: &str, _repo: &str, number: u64) -> Result<Vec<Label>> {
        self.record("get_issue_labels", Call::GetIssueLabels(number))?;
        Ok(self.labels.get(&number).cloned().unwrap_or_default())
    }

    async fn get_combined_status(
        &self,
        _org: &str,
        _repo: &str,
        git_ref: &str,
    ) -> Result<CombinedStatus> {
        self.record("get_combined_status", Call::GetCombinedStatus(git_ref.to_string()))?;
        Ok(self.statuses.get(git_ref).cloned().unwrap_or_default())
    }
}
