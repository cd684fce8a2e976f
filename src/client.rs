use crate::queue::QueuedMessage;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tokio::time::Duration;

const DEFAULT_TIMEOUT_SECONDS: u64 = 20;

/// Result of one webhook send attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Success,
    RateLimited,
    Error { status: Option<u16>, detail: String },
}

impl DeliveryOutcome {
    /// Whether the destination should be considered healthy after this
    /// attempt. Both rate limiting and hard errors degrade the connection;
    /// only a following successful probe restores it.
    pub fn is_healthy(&self) -> bool {
        matches!(self, DeliveryOutcome::Success)
    }
}

/// Performs a single webhook delivery. The queue worker is generic over this
/// so tests can drive the state machine with a scripted double.
#[async_trait]
pub trait Deliver: Send + Sync {
    async fn send(&self, message: &QueuedMessage) -> DeliveryOutcome;
}

#[derive(Debug, Serialize)]
struct DiscordMessage<'a> {
    content: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    username: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    avatar_url: Option<&'a str>,
}

/// HTTP client for Discord-compatible webhook endpoints.
#[derive(Debug, Clone)]
pub struct WebhookClient {
    client: Client,
    username: Option<String>,
    avatar_url: Option<String>,
}

impl WebhookClient {
    pub fn new(username: Option<String>, avatar_url: Option<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECONDS))
            .build()
            .context("build reqwest client")?;

        Ok(Self {
            client,
            username,
            avatar_url,
        })
    }
}

#[async_trait]
impl Deliver for WebhookClient {
    async fn send(&self, message: &QueuedMessage) -> DeliveryOutcome {
        let payload = DiscordMessage {
            content: &message.body,
            username: self.username.as_deref(),
            avatar_url: self.avatar_url.as_deref(),
        };

        let response = match self
            .client
            .post(&message.webhook_url)
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .await
        {
            Ok(response) => response,
            Err(error) => {
                return DeliveryOutcome::Error {
                    status: None,
                    detail: error.to_string(),
                };
            }
        };

        let status = response.status();
        if status.is_success() {
            return DeliveryOutcome::Success;
        }

        if status.as_u16() == 429 {
            return DeliveryOutcome::RateLimited;
        }

        let detail = response.text().await.unwrap_or_default();
        DeliveryOutcome::Error {
            status: Some(status.as_u16()),
            detail,
        }
    }
}
