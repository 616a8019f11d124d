//! CLA Label Reconciliation
//!
//! Mirrors the verdict of the `EasyCLA` commit status into the
//! `cncf-cla: yes` / `cncf-cla: no` labels on pull requests.
//!
//! ## Entry Points
//!
//! - [`StatusReconciler`]: reacts to `status` webhooks. Finds the open PR
//!   whose head is the reported commit and converges its labels.
//! - [`CommentReconciler`]: reacts to `/check-cla` comments. Reads the PR's
//!   labels and head commit status directly and converges its labels.
//!
//! Both share [`transition`], a pure function from current labels and
//! verdict to the label mutations needed.
//!
//! ## Example Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use cla_bot::{cla, github::RestClient, retry::RetryPolicy};
//!
//! let client = Arc::new(RestClient::new(token)?);
//! let plugin = cla::plugin(client, RetryPolicy::search());
//!
//! plugin.dispatch_status(&status_event).await?;
//! ```

pub mod comment;
pub mod status;
pub mod transition;

use regex::Regex;
use std::sync::{Arc, LazyLock};
use tracing::{info, warn};

use crate::github::GitHubClient;
use crate::plugin::{Command, Plugin, PluginHelp};
use crate::retry::RetryPolicy;

pub use comment::CommentReconciler;
pub use status::StatusReconciler;
pub use transition::{transition, LabelState, Transition, Verdict};

pub const PLUGIN_NAME: &str = "cla";

/// Status context published by the CLA checking service
pub const CLA_CONTEXT: &str = "EasyCLA";

pub const CLA_YES: &str = "cncf-cla: yes";
pub const CLA_NO: &str = "cncf-cla: no";

pub const CHECK_CLA_COMMAND: &str = "/check-cla";

static CHECK_CLA_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?mi)^\s*/check-cla\s*$").expect("check-cla pattern is valid")
});

/// True if any line of `body` is the `/check-cla` command
pub fn is_check_cla_command(body: &str) -> bool {
    CHECK_CLA_RE.is_match(body)
}

/// Help payload shown by the host for this plugin
pub fn help() -> PluginHelp {
    PluginHelp::new(format!(
        "The cla plugin manages the application and removal of the 'cncf-cla' prefixed labels \
         on pull requests as a reaction to the {} github status context. \
         It cannot be configured.",
        CLA_CONTEXT
    ))
    .command(Command {
        usage: CHECK_CLA_COMMAND.to_string(),
        description: "Forces rechecking of the CLA status.".to_string(),
        featured: true,
        who_can_use: "Anyone".to_string(),
        examples: vec![CHECK_CLA_COMMAND.to_string()],
    })
}

/// Build the handler set for the host to register
pub fn plugin(client: Arc<dyn GitHubClient>, retry: RetryPolicy) -> Plugin {
    Plugin::new(PLUGIN_NAME, help())
        .with_status_handler(Arc::new(
            StatusReconciler::new(Arc::clone(&client)).with_retry(retry),
        ))
        .with_comment_handler(Arc::new(CommentReconciler::new(client)))
}

/// Perform each mutation independently. Failures are logged and skipped.
///
/// Returns the number of calls that succeeded.
pub(crate) async fn apply(
    client: &dyn GitHubClient,
    org: &str,
    repo: &str,
    number: u64,
    changes: &Transition,
) -> usize {
    let mut applied = 0;

    for label in &changes.remove {
        match client.remove_label(org, repo, number, label).await {
            Ok(()) => {
                info!(org, repo, pr = number, label, "Removed label");
                applied += 1;
            }
            Err(e) => {
                warn!(org, repo, pr = number, label, error = %e, "Could not remove label");
            }
        }
    }

    for label in &changes.add {
        match client.add_label(org, repo, number, label).await {
            Ok(()) => {
                info!(org, repo, pr = number, label, "Added label");
                applied += 1;
            }
            Err(e) => {
                warn!(org, repo, pr = number, label, error = %e, "Could not add label");
            }
        }
    }

    applied
}
