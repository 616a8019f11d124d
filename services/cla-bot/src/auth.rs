//! GitHub App Authentication
//!
//! Authenticates the bot as a GitHub App: sign a short-lived RS256 JWT, then
//! exchange it for an installation access token.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::info;

/// JWT claims for GitHub App authentication
#[derive(Debug, Serialize)]
pub struct GitHubAppClaims {
    /// Issued at time (Unix timestamp)
    pub iat: u64,
    /// Expiration time (Unix timestamp)
    pub exp: u64,
    /// Issuer (GitHub App ID)
    pub iss: String,
}

impl GitHubAppClaims {
    fn at(app_id: &str, now: u64) -> Self {
        Self {
            iat: now.saturating_sub(60), // clock skew
            exp: now + 600,
            iss: app_id.to_string(),
        }
    }
}

/// Response from the installation token endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct InstallationToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Generate a JWT for GitHub App authentication, valid for 10 minutes
pub fn generate_jwt(app_id: &str, private_key_pem: &[u8]) -> Result<String> {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .context("Failed to get current time")?
        .as_secs();

    let encoding_key =
        EncodingKey::from_rsa_pem(private_key_pem).context("Failed to parse private key")?;

    encode(
        &Header::new(Algorithm::RS256),
        &GitHubAppClaims::at(app_id, now),
        &encoding_key,
    )
    .context("Failed to encode JWT")
}

/// Exchange an app JWT for an installation access token
pub async fn installation_token(
    api_url: &str,
    jwt: &str,
    installation_id: u64,
) -> Result<InstallationToken> {
    let url = format!(
        "{}/app/installations/{}/access_tokens",
        api_url.trim_end_matches('/'),
        installation_id
    );

    let response = reqwest::Client::new()
        .post(&url)
        .bearer_auth(jwt)
        .header("Accept", "application/vnd.github+json")
        .header("User-Agent", "lornu-ai-cla-bot")
        .header("X-GitHub-Api-Version", "2022-11-28")
        .send()
        .await
        .context("Failed to send request to GitHub API")?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        anyhow::bail!("GitHub API error ({}): {}", status, body);
    }

    response
        .json::<InstallationToken>()
        .await
        .context("Failed to parse installation token response")
}

/// Credentials of the GitHub App the bot runs as
#[derive(Debug, Clone)]
pub struct AppCredentials {
    pub app_id: String,
    pub private_key_path: PathBuf,
    pub installation_id: u64,
}

impl AppCredentials {
    /// Mint a fresh installation token
    pub async fn token(&self, api_url: &str) -> Result<InstallationToken> {
        let key = std::fs::read(&self.private_key_path).with_context(|| {
            format!(
                "Failed to read private key: {}",
                self.private_key_path.display()
            )
        })?;

        let jwt = generate_jwt(&self.app_id, &key)?;
        let token = installation_token(api_url, &jwt, self.installation_id).await?;

        info!(
            app_id = %self.app_id,
            installation_id = self.installation_id,
            expires_at = %token.expires_at,
            "Obtained installation token"
        );
        Ok(token)
    }
}
