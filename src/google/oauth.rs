//! OAuth refresh token grant for Google APIs.

use anyhow::Result;
use reqwest::Client;
use serde::Deserialize;

use crate::core::GoogleCredentials;

#[derive(Debug, Deserialize)]
pub struct OAuthToken {
    pub access_token: String,
    pub expires_in: Option<i64>,
    pub token_type: Option<String>,
}

/// Exchange the long lived refresh token for a short lived access
/// token.
pub async fn refresh_access_token(
    client: &Client,
    token_url: &str,
    client_id: &str,
    client_secret: &str,
    refresh_token: &str,
) -> Result<OAuthToken> {
    let res = client
        .post(token_url)
        .form(&[
            ("client_id", client_id),
            ("client_secret", client_secret),
            ("refresh_token", refresh_token),
            ("grant_type", "refresh_token"),
        ])
        .send()
        .await?;
    let status = res.status();
    let text = res.text().await.unwrap_or_default();
    if !status.is_success() {
        anyhow::bail!("Token refresh failed: {} ({})", status, text);
    }
    let token: OAuthToken = serde_json::from_str(&text)?;
    Ok(token)
}

/// Credentials plus the endpoint to redeem them at. Shared by every
/// Google API client in the crate.
#[derive(Clone, Debug)]
pub struct GoogleAuth {
    pub token_url: String,
    pub credentials: GoogleCredentials,
}

impl GoogleAuth {
    pub fn new(token_url: &str, credentials: GoogleCredentials) -> Self {
        Self {
            token_url: token_url.to_string(),
            credentials,
        }
    }

    pub async fn access_token(&self, client: &Client) -> Result<String> {
        let GoogleCredentials {
            client_id,
            client_secret,
            refresh_token,
        } = &self.credentials;
        let token =
            refresh_access_token(client, &self.token_url, client_id, client_secret, refresh_token)
                .await?;
        Ok(token.access_token)
    }
}
