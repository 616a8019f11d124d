//! Runtime Configuration
//!
//! CLI flags with environment variable fallbacks, shared by the binary.

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

use crate::auth::AppCredentials;
use crate::github::{RestClient, DEFAULT_API_URL};
use crate::retry::RetryPolicy;

/// How to reach and authenticate with GitHub.
///
/// A static `--token` wins; otherwise all three GitHub App settings are
/// required and an installation token is minted at startup.
#[derive(Args, Debug, Clone)]
pub struct GitHubConfig {
    /// GitHub API root
    #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// GitHub token (installation token or PAT)
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// GitHub App ID
    #[arg(long, env = "GITHUB_APP_ID")]
    pub app_id: Option<String>,

    /// Path to the GitHub App private key PEM file
    #[arg(long, env = "GITHUB_PRIVATE_KEY_PATH")]
    pub private_key_path: Option<PathBuf>,

    /// GitHub App installation ID
    #[arg(long, env = "GITHUB_INSTALLATION_ID")]
    pub installation_id: Option<u64>,
}

impl GitHubConfig {
    pub fn app_credentials(&self) -> Option<AppCredentials> {
        Some(AppCredentials {
            app_id: self.app_id.clone()?,
            private_key_path: self.private_key_path.clone()?,
            installation_id: self.installation_id?,
        })
    }

    /// Build an authenticated REST client
    pub async fn client(&self) -> Result<RestClient> {
        let token = match (&self.token, self.app_credentials()) {
            (Some(token), _) => token.clone(),
            (None, Some(creds)) => creds.token(&self.api_url).await?.token,
            (None, None) => anyhow::bail!(
                "No GitHub credentials: set GITHUB_TOKEN or GITHUB_APP_ID, \
                 GITHUB_PRIVATE_KEY_PATH and GITHUB_INSTALLATION_ID"
            ),
        };

        RestClient::with_base_url(token, &self.api_url).context("Failed to create GitHub client")
    }
}

/// PR search retry settings for status events
#[derive(Args, Debug, Clone)]
pub struct RetryConfig {
    /// Search attempts before giving up on finding the PR for a commit
    #[arg(long, env = "CLA_SEARCH_ATTEMPTS", default_value_t = 5)]
    pub search_attempts: u32,

    /// Seconds to wait between search attempts
    #[arg(long, env = "CLA_SEARCH_DELAY_SECS", default_value_t = 10)]
    pub search_delay_secs: u64,
}

impl RetryConfig {
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.search_attempts,
            Duration::from_secs(self.search_delay_secs),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}
