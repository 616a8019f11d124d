//! Status Event Reconciler
//!
//! 1. Check the status event is for the CLA context and carries a final verdict.
//! 2. Search for open PRs containing the commit. The search index can lag
//!    the webhook, so the search is retried a bounded number of times.
//! 3. For each match, only act when the commit is still the PR's head; the
//!    status of an older commit says nothing about the current PR.
//! 4. Add/remove the CLA labels as needed.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::error::{ClaError, Result};
use crate::github::{GitHubClient, GitHubError, Issue, StatusEvent, StatusState};
use crate::plugin::StatusEventHandler;
use crate::retry::{retry_until, Attempt, RetryPolicy};

use super::transition::{transition, LabelState, Verdict};
use super::{apply, CLA_CONTEXT, CLA_NO, CLA_YES};

pub struct StatusReconciler {
    client: Arc<dyn GitHubClient>,
    retry: RetryPolicy,
}

impl StatusReconciler {
    pub fn new(client: Arc<dyn GitHubClient>) -> Self {
        Self {
            client,
            retry: RetryPolicy::search(),
        }
    }

    /// Override the PR search retry policy
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub async fn handle(&self, event: &StatusEvent) -> Result<()> {
        if event.state == StatusState::Empty || event.context.is_empty() {
            return Err(ClaError::InvalidEvent(
                "status event delivered with empty state/context".to_string(),
            ));
        }

        if event.context != CLA_CONTEXT {
            debug!(context = %event.context, "Ignoring status for another context");
            return Ok(());
        }

        let Some(verdict) = Verdict::from_state(event.state) else {
            warn!(sha = %event.sha, "CLA status has an unrecognized state, ignoring");
            return Ok(());
        };

        if verdict == Verdict::Pending {
            debug!(sha = %event.sha, "CLA check still pending");
            return Ok(());
        }

        let org = event.repo.owner.login.as_str();
        let repo = event.repo.name.as_str();
        info!(org, repo, sha = %event.sha, state = %event.state, "Searching for PRs matching the commit");

        let issues = match self.find_open_prs(org, repo, &event.sha).await {
            Ok(issues) => issues,
            Err(e) => {
                error!(org, repo, sha = %event.sha, error = %e, "Error searching for PRs matching commit");
                return Ok(());
            }
        };

        if issues.is_empty() {
            info!(org, repo, sha = %event.sha, attempts = self.retry.attempts, "No open PRs match commit");
            return Ok(());
        }
        info!(org, repo, count = issues.len(), "Found PRs matching commit");

        for issue in &issues {
            self.reconcile(org, repo, event, verdict, issue).await;
        }

        Ok(())
    }

    async fn find_open_prs(
        &self,
        org: &str,
        repo: &str,
        sha: &str,
    ) -> std::result::Result<Vec<Issue>, GitHubError> {
        let query = format!("{} repo:{}/{} type:pr state:open", sha, org, repo);
        let query = query.as_str();
        let client = self.client.as_ref();

        retry_until(&self.retry, move |attempt| async move {
            match client.find_issues(query, "", false).await {
                Ok(issues) if issues.is_empty() => {
                    debug!(attempt, "Search returned no PRs yet");
                    Ok(Attempt::Retry(issues))
                }
                Ok(issues) => Ok(Attempt::Done(issues)),
                Err(e) => Err(e),
            }
        })
        .await
    }

    async fn reconcile(
        &self,
        org: &str,
        repo: &str,
        event: &StatusEvent,
        verdict: Verdict,
        issue: &Issue,
    ) {
        if !issue.is_pull_request() {
            debug!(org, repo, issue = issue.number, "Search hit is not a pull request, skipping");
            return;
        }

        let current = LabelState::new(issue.has_label(CLA_YES), issue.has_label(CLA_NO));
        let changes = transition(current, verdict);
        if changes.is_empty() {
            info!(org, repo, pr = issue.number, "PR has up-to-date CLA label");
            return;
        }

        debug!(org, repo, pr = issue.number, "PR labels may be out of date, getting pull request");
        let pr = match self.client.get_pull_request(org, repo, issue.number).await {
            Ok(pr) => pr,
            Err(e) => {
                warn!(org, repo, pr = issue.number, error = %e, "Unable to fetch PR");
                return;
            }
        };

        if pr.head.sha != event.sha {
            info!(org, repo, pr = pr.number, head = %pr.head.sha, "Event is not for PR HEAD, skipping");
            return;
        }

        apply(self.client.as_ref(), org, repo, pr.number, &changes).await;
    }
}

#[async_trait]
impl StatusEventHandler for StatusReconciler {
    async fn handle_status(&self, event: &StatusEvent) -> Result<()> {
        self.handle(event).await
    }
}
