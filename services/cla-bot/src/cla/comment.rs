//! `/check-cla` Comment Reconciler
//!
//! Re-derives the CLA labels of a PR on request. The PR is known from the
//! comment, so no search is needed: read its labels, read the combined
//! status of its current head, and converge.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::error::Result;
use crate::github::{GenericCommentAction, GenericCommentEvent, GitHubClient};
use crate::plugin::GenericCommentHandler;

use super::transition::{transition, LabelState, Verdict};
use super::{apply, is_check_cla_command, CLA_CONTEXT};

pub struct CommentReconciler {
    client: Arc<dyn GitHubClient>,
}

impl CommentReconciler {
    pub fn new(client: Arc<dyn GitHubClient>) -> Self {
        Self { client }
    }

    pub async fn handle(&self, event: &GenericCommentEvent) -> Result<()> {
        // Only new comments on open PRs
        if !event.is_pr
            || event.issue_state != "open"
            || event.action != GenericCommentAction::Created
        {
            return Ok(());
        }
        if !is_check_cla_command(&event.body) {
            return Ok(());
        }

        let org = event.repo.owner.login.as_str();
        let repo = event.repo.name.as_str();
        let number = event.number;
        info!(org, repo, pr = number, user = %event.user.login, "Rechecking CLA status");

        let labels = match self.client.get_issue_labels(org, repo, number).await {
            Ok(labels) => labels,
            Err(e) => {
                error!(org, repo, pr = number, error = %e, "Failed to get the labels");
                return Ok(());
            }
        };
        let current = LabelState::from_labels(&labels);

        let pr = match self.client.get_pull_request(org, repo, number).await {
            Ok(pr) => pr,
            Err(e) => {
                error!(org, repo, pr = number, error = %e, "Unable to fetch PR");
                return Ok(());
            }
        };

        // Head is read live here, so unlike the status path there is no
        // stale-commit check.
        let combined = match self.client.get_combined_status(org, repo, &pr.head.sha).await {
            Ok(combined) => combined,
            Err(e) => {
                error!(org, repo, pr = number, sha = %pr.head.sha, error = %e, "Failed to get statuses");
                return Ok(());
            }
        };

        let Some(status) = combined.statuses.iter().find(|s| s.context == CLA_CONTEXT) else {
            info!(org, repo, pr = number, sha = %pr.head.sha, "No CLA status on PR head yet");
            return Ok(());
        };

        let Some(verdict) = Verdict::from_state(status.state) else {
            warn!(org, repo, pr = number, state = %status.state, "Unrecognized CLA status state");
            return Ok(());
        };

        let changes = transition(current, verdict);
        if changes.is_empty() {
            debug!(org, repo, pr = number, verdict = ?verdict, "CLA labels already match status");
            return Ok(());
        }

        apply(self.client.as_ref(), org, repo, number, &changes).await;
        Ok(())
    }
}

#[async_trait]
impl GenericCommentHandler for CommentReconciler {
    async fn handle_comment(&self, event: &GenericCommentEvent) -> Result<()> {
        self.handle(event).await
    }
}
