//! Client side of the relay contract

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a relay call failed, as shown to the user
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// The relay could not be reached at all
    #[error("Cannot connect to server. Make sure the backend is running on {base_url}")]
    Transport { base_url: String, detail: String },

    /// The relay was reached but the exchange broke off (timeout, dropped
    /// connection, unreadable body)
    #[error("Request to server failed: {0}")]
    Network(String),

    /// The relay answered with a non-2xx status
    #[error("HTTP error! status: {status} - {detail}")]
    Status { status: u16, detail: String },

    /// 2xx response whose body could not be read
    #[error("Invalid response from server: {0}")]
    Decode(String),

    /// The request could not be built (bad relay URL)
    #[error("Invalid relay request: {0}")]
    Request(String),
}

impl ClientError {
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, ClientError::Transport { .. })
    }
}

/// Sends one user message to the relay and returns its reply
#[async_trait]
pub trait RelayClient: Send + Sync {
    async fn send(&self, message: &str) -> Result<String, ClientError>;
}

#[async_trait]
impl<T: RelayClient + ?Sized> RelayClient for std::sync::Arc<T> {
    async fn send(&self, message: &str) -> Result<String, ClientError> {
        (**self).send(message).await
    }
}

/// Relay client over plain HTTP
///
/// No timeout is set: a call lasts until the relay answers or the
/// connection fails.
pub struct HttpRelayClient {
    client: Client,
    base_url: String,
    endpoint: String,
}

impl HttpRelayClient {
    /// # Errors
    ///
    /// Returns [`ClientError::Request`] if the HTTP client cannot be built.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let client = Client::builder()
            .build()
            .map_err(|e| ClientError::Request(format!("Failed to create HTTP client: {e}")))?;
        let base_url = base_url.trim_end_matches('/').to_string();

        Ok(Self {
            client,
            endpoint: format!("{base_url}/chat"),
            base_url,
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

}

fn classify_send_error(base_url: &str, e: &reqwest::Error) -> ClientError {
    if e.is_builder() {
        ClientError::Request(e.to_string())
    } else if e.is_connect() {
        ClientError::Transport {
            base_url: base_url.to_string(),
            detail: e.to_string(),
        }
    } else if e.is_timeout() {
        ClientError::Network(format!("Request timeout: {e}"))
    } else {
        ClientError::Network(e.to_string())
    }
}

#[async_trait]
impl RelayClient for HttpRelayClient {
    async fn send(&self, message: &str) -> Result<String, ClientError> {
        tracing::debug!(endpoint = %self.endpoint, chars = message.chars().count(), "Sending to relay");

        let response = self
            .client
            .post(&self.endpoint)
            .json(&OutgoingMessage { message })
            .send()
            .await
            .map_err(|e| {
                let err = classify_send_error(&self.base_url, &e);
                tracing::error!(error = %e, connect = e.is_connect(), "Relay call failed");
                err
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            tracing::error!(error = %e, "Relay response cut off");
            ClientError::Network(format!("Failed to read response: {e}"))
        })?;

        tracing::debug!(status = status.as_u16(), "Relay responded");

        if !status.is_success() {
            let detail = serde_json::from_str::<IncomingError>(&body)
                .ok()
                .and_then(|err| err.details.or(err.error))
                .unwrap_or_else(|| "Unknown error".to_string());
            tracing::error!(status = status.as_u16(), detail = %detail, "Relay returned an error");
            return Err(ClientError::Status {
                status: status.as_u16(),
                detail,
            });
        }

        let reply: IncomingReply =
            serde_json::from_str(&body).map_err(|e| ClientError::Decode(e.to_string()))?;

        Ok(reply.reply.unwrap_or_default())
    }
}

#[derive(Debug, Serialize)]
struct OutgoingMessage<'a> {
    message: &'a str,
}

#[derive(Debug, Deserialize)]
struct IncomingReply {
    #[serde(default)]
    reply: Option<String>,
}

#[derive(Debug, Deserialize)]
struct IncomingError {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    details: Option<String>,
}
