//! HTTP client for the dashboard's own calls to the notes server.
//!
//! Unlike the widget, the dashboard talks to the server directly.

use anyhow::{Context, Result};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use url::Url;

use crate::api::{AuthResponse, ErrorResponse, StatusResponse};
use crate::config::RelayConfig;
use crate::models::Note;

/// The server no longer accepts the stored token.
#[derive(Debug, Error)]
#[error("Token rejected by server; log in again")]
pub struct TokenRejected;

#[derive(Clone)]
pub struct DashboardClient {
    client: Client,
    base_url: Url,
}

impl DashboardClient {
    pub fn new(config: &RelayConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_seconds))
            .user_agent(config.user_agent.clone())
            .build()
            .context("Failed to build dashboard HTTP client")?;

        let base_url = config.base_url()?;

        Ok(Self { client, base_url })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .with_context(|| format!("Invalid endpoint path: {path}"))
    }

    /// GET /
    pub async fn ping(&self) -> Result<StatusResponse> {
        let response = self
            .client
            .get(self.endpoint("")?)
            .send()
            .await
            .context("Status request failed")?;

        parse(response).await
    }

    /// POST /auth
    pub async fn login(&self, username: &str) -> Result<String> {
        let response = self
            .client
            .post(self.endpoint("auth")?)
            .json(&serde_json::json!({ "username": username }))
            .send()
            .await
            .context("Login request failed")?;

        let auth: AuthResponse = parse(response).await.context("Login failed")?;
        Ok(auth.token)
    }

    /// GET /notes
    pub async fn fetch_notes(&self, token: &str) -> Result<Vec<Note>> {
        let response = self
            .client
            .get(self.endpoint("notes")?)
            .header("Authorization", token)
            .send()
            .await
            .context("Notes request failed")?;

        if response.status() == StatusCode::UNAUTHORIZED {
            return Err(TokenRejected.into());
        }

        parse(response).await.context("Failed to fetch notes")
    }
}

async fn parse<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status();

    if !status.is_success() {
        let message = response
            .json::<ErrorResponse>()
            .await
            .map_or_else(|_| status.to_string(), |e| e.error);
        anyhow::bail!("HTTP {}: {}", status.as_u16(), message);
    }

    response
        .json::<T>()
        .await
        .context("Failed to parse server response")
}
