//! Discord REST sink — posts notifications and strips their embeds.
//!
//! One request per call: no rate-limit handling and no retries. A failed
//! send or edit comes back as an error for the notifier to log.

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use threadwatch_core::{MessageSink, OutboundMessage, SentMessage};

/// Discord REST API base URL.
const DISCORD_API_BASE: &str = "https://discord.com/api/v10";

/// Message flag that hides link previews.
const SUPPRESS_EMBEDS: u64 = 1 << 2;

/// REST client for the two calls the notifier needs.
pub struct DiscordRest {
    http: reqwest::Client,
    token: String,
    api_base: String,
}

impl std::fmt::Debug for DiscordRest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscordRest")
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl DiscordRest {
    pub fn new(token: String) -> anyhow::Result<Self> {
        Self::with_api_base(token, DISCORD_API_BASE)
    }

    /// Point the client at another API base (used by tests).
    pub fn with_api_base(token: String, api_base: impl Into<String>) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!("DiscordBot (threadwatch, ", env!("CARGO_PKG_VERSION"), ")"))
            .build()
            .context("failed to create HTTP client")?;

        Ok(Self {
            http,
            token,
            api_base: api_base.into().trim_end_matches('/').to_string(),
        })
    }

    fn messages_url(&self, channel_id: &str) -> String {
        format!("{}/channels/{channel_id}/messages", self.api_base)
    }

    fn auth(&self) -> String {
        format!("Bot {}", self.token)
    }

    /// Turn a non-2xx response into an error carrying status and body.
    async fn check(resp: reqwest::Response, what: &str) -> anyhow::Result<reqwest::Response> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        Err(anyhow::anyhow!("discord {what} failed (HTTP {status}): {body}"))
    }
}

#[async_trait]
impl MessageSink for DiscordRest {
    async fn send(&self, msg: &OutboundMessage) -> anyhow::Result<SentMessage> {
        let resp = self
            .http
            .post(self.messages_url(&msg.channel_id))
            .header("Authorization", self.auth())
            .json(&json!({ "content": msg.content }))
            .send()
            .await?;
        let resp = Self::check(resp, "send").await?;

        let body: Value = resp.json().await.context("discord send returned invalid json")?;
        let message_id = body["id"]
            .as_str()
            .ok_or_else(|| anyhow::anyhow!("discord send response has no message id"))?
            .to_string();

        debug!(channel = %msg.channel_id, message = %message_id, "discord message sent");
        Ok(SentMessage {
            channel_id: msg.channel_id.clone(),
            message_id,
        })
    }

    async fn suppress_embeds(&self, sent: &SentMessage) -> anyhow::Result<()> {
        let url = format!("{}/{}", self.messages_url(&sent.channel_id), sent.message_id);
        let resp = self
            .http
            .patch(url)
            .header("Authorization", self.auth())
            .json(&json!({ "flags": SUPPRESS_EMBEDS }))
            .send()
            .await?;
        Self::check(resp, "edit").await?;

        debug!(channel = %sent.channel_id, message = %sent.message_id, "discord embeds suppressed");
        Ok(())
    }
}
