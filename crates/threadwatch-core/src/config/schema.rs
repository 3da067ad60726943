//! Configuration schema — the routing table as it appears in `config.json`.
//!
//! Hierarchy: `RoutingConfig` → `SourceConfig`, `DestinationConfig`,
//! `NotifierSettings`.
//!
//! JSON on disk uses **camelCase** keys; Rust uses snake_case.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

// ─────────────────────────────────────────────
// Root Config
// ─────────────────────────────────────────────

/// Root configuration, loaded once at startup and never mutated.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutingConfig {
    /// Channels whose new threads trigger a notification.
    #[serde(default)]
    pub sources: Vec<SourceConfig>,
    /// Channels that receive the notification.
    #[serde(default)]
    pub destinations: Vec<DestinationConfig>,
    /// Message wording and embed handling.
    #[serde(default)]
    pub notifier: NotifierSettings,
}

// ─────────────────────────────────────────────
// Sources / destinations
// ─────────────────────────────────────────────

/// A watched guild and the parent channels inside it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceConfig {
    pub guild_id: String,
    #[serde(default)]
    pub channels: Vec<String>,
}

/// A guild whose channels receive notifications.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DestinationConfig {
    pub guild_id: String,
    #[serde(default)]
    pub channels: Vec<DestinationChannel>,
}

/// One destination channel plus the users to mention there.
///
/// Older configs call the mention list `voterIds`; both spellings load.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DestinationChannel {
    pub channel_id: String,
    #[serde(default, alias = "voterIds")]
    pub user_ids: Vec<String>,
}

// ─────────────────────────────────────────────
// Notifier
// ─────────────────────────────────────────────

/// Which wording the notification uses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageTemplate {
    /// "New thread: ..."
    #[default]
    Thread,
    /// "New proposal up for a vote: ..."
    Vote,
}

impl MessageTemplate {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageTemplate::Thread => "thread",
            MessageTemplate::Vote => "vote",
        }
    }
}

impl FromStr for MessageTemplate {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "thread" => Ok(MessageTemplate::Thread),
            "vote" => Ok(MessageTemplate::Vote),
            other => Err(format!("unknown message template: {other}")),
        }
    }
}

/// Notifier behaviour switches.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NotifierSettings {
    /// Message wording.
    pub template: MessageTemplate,
    /// Edit each sent message to strip link previews.
    pub suppress_embeds: bool,
}

impl Default for NotifierSettings {
    fn default() -> Self {
        Self {
            template: MessageTemplate::Thread,
            suppress_embeds: true,
        }
    }
}
