//! Privileged network relay.
//!
//! The widget runs inside arbitrary pages and cannot make cross-origin calls
//! itself, so it hands a fully-formed request to the [`Relay`]. The relay adds
//! nothing (no auth, no routing) and folds every outcome into a
//! [`RelayResponse`]: callers branch on `success` and never see an `Err`.

use std::collections::HashMap;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

use crate::config::RelayConfig;

/// Uniform result handed back across the relay boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelayResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RelayResponse {
    #[must_use]
    pub const fn success(data: Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            success: false,
            data: None,
            error: Some(if message.is_empty() {
                "Unknown error".to_string()
            } else {
                message
            }),
        }
    }
}

/// Messages the widget sends to the relay, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RelayMessage {
    SaveNote {
        token: String,
        domain: String,
        content: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        url: Option<String>,
    },

    /// Pass-through call to an LLM provider; the caller builds the request.
    #[serde(alias = "GROQ_API")]
    LlmApi {
        url: String,
        #[serde(default)]
        headers: HashMap<String, String>,
        body: String,
    },
}

/// One outbound request, exactly as the caller specified it.
#[derive(Debug, Clone)]
pub struct RelayRequest {
    pub method: Method,
    pub url: String,
    pub headers: HashMap<String, String>,
    pub body: Option<String>,
}

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Malformed response body: {0}")]
    MalformedBody(String),
}

impl From<reqwest::Error> for RelayError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(error_chain(&err))
    }
}

fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

#[derive(Clone)]
pub struct Relay {
    client: Client,
    server_url: Url,
}

impl Relay {
    pub fn new(config: &RelayConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build relay HTTP client: {e}"))?;

        let server_url = config.base_url()?;

        Ok(Self::with_client(client, server_url))
    }

    #[must_use]
    pub const fn with_client(client: Client, server_url: Url) -> Self {
        Self { client, server_url }
    }

    /// Dispatches a widget message.
    pub async fn handle(&self, message: RelayMessage) -> RelayResponse {
        match message {
            RelayMessage::SaveNote {
                token,
                domain,
                content,
                url,
            } => {
                let target = match self.server_url.join("notes") {
                    Ok(target) => target,
                    Err(e) => return RelayResponse::failure(format!("Invalid server URL: {e}")),
                };

                let body = serde_json::json!({
                    "token": token,
                    "domain": domain,
                    "content": content,
                    "url": url,
                });

                self.forward(RelayRequest {
                    method: Method::POST,
                    url: target.to_string(),
                    headers: HashMap::from([(
                        "Content-Type".to_string(),
                        "application/json".to_string(),
                    )]),
                    body: Some(body.to_string()),
                })
                .await
            }
            RelayMessage::LlmApi { url, headers, body } => {
                self.forward(RelayRequest {
                    method: Method::POST,
                    url,
                    headers,
                    body: Some(body),
                })
                .await
            }
        }
    }

    /// Performs one request. Never fails; failures come back as
    /// `success: false` with a non-empty message.
    pub async fn forward(&self, request: RelayRequest) -> RelayResponse {
        let method = request.method.clone();
        let url = request.url.clone();

        match self.try_forward(request).await {
            Ok(data) => {
                debug!(%method, %url, "Relay request succeeded");
                RelayResponse::success(data)
            }
            Err(e) => {
                warn!(%method, %url, "Relay request failed: {}", e);
                RelayResponse::failure(e.to_string())
            }
        }
    }

    async fn try_forward(&self, request: RelayRequest) -> Result<Value, RelayError> {
        let url = Url::parse(&request.url)
            .map_err(|e| RelayError::InvalidRequest(format!("bad URL {}: {e}", request.url)))?;

        let mut headers = HeaderMap::new();
        for (name, value) in &request.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| RelayError::InvalidRequest(format!("bad header {name}: {e}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| RelayError::InvalidRequest(format!("bad header value: {e}")))?;
            headers.insert(name, value);
        }

        let mut builder = self.client.request(request.method, url).headers(headers);
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            return Err(RelayError::Status {
                status: status.as_u16(),
                message: failure_message(status, &bytes),
            });
        }

        serde_json::from_slice(&bytes).map_err(|e| RelayError::MalformedBody(e.to_string()))
    }
}

/// Prefer the server's `{ "error": ... }` message, fall back to the raw body.
fn failure_message(status: reqwest::StatusCode, body: &[u8]) -> String {
    if let Ok(Value::Object(map)) = serde_json::from_slice::<Value>(body)
        && let Some(Value::String(message)) = map.get("error")
    {
        return message.clone();
    }

    let text = String::from_utf8_lossy(body).trim().to_string();
    if text.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    } else {
        text
    }
}
