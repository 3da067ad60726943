//! Notifier — turns a thread event into per-destination messages and
//! delivers them.
//!
//! Planning (`plan`) is a pure function of the routing table and the event.
//! Delivery (`Notifier::notify`) walks the plan sequentially:
//! 1. send the message through the `MessageSink`
//! 2. if embed suppression is on, edit that same message to drop previews
//!
//! Every destination is an independent attempt. Failures are logged and
//! counted, never retried, and never stop the remaining destinations.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error, info, warn};

use crate::bus::types::{OutboundMessage, ThreadCreatedEvent};
use crate::formatting;
use crate::routing::RoutingTable;

// ─────────────────────────────────────────────
// MessageSink
// ─────────────────────────────────────────────

/// A message that made it to the platform.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SentMessage {
    pub channel_id: String,
    pub message_id: String,
}

/// Outbound side of the platform: send a message, then edit it.
#[async_trait]
pub trait MessageSink: Send + Sync {
    /// Post `msg` to its channel and return the created message.
    async fn send(&self, msg: &OutboundMessage) -> anyhow::Result<SentMessage>;

    /// Strip link-preview embeds from a previously sent message.
    async fn suppress_embeds(&self, sent: &SentMessage) -> anyhow::Result<()>;
}

// ─────────────────────────────────────────────
// Planning
// ─────────────────────────────────────────────

/// Build one message per destination channel, or nothing if the event's
/// parent channel isn't a configured source.
pub fn plan(table: &RoutingTable, event: &ThreadCreatedEvent) -> Vec<OutboundMessage> {
    if !table.matches(event) {
        return Vec::new();
    }

    let body = formatting::render(table.settings().template, event);

    table
        .destinations()
        .map(|(_, ch)| {
            OutboundMessage::new(
                ch.channel_id.clone(),
                formatting::with_mentions(&body, &ch.user_ids),
            )
        })
        .collect()
}

// ─────────────────────────────────────────────
// Delivery
// ─────────────────────────────────────────────

/// Outcome counters for one event.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    /// Messages planned (one per destination channel).
    pub attempted: usize,
    /// Sends that succeeded.
    pub sent: usize,
    /// Embed-suppression edits that succeeded.
    pub suppressed: usize,
    /// Sends or edits that failed.
    pub failed: usize,
}

/// Routes thread events to destination channels.
pub struct Notifier {
    table: Arc<RoutingTable>,
    sink: Arc<dyn MessageSink>,
}

impl Notifier {
    pub fn new(table: Arc<RoutingTable>, sink: Arc<dyn MessageSink>) -> Self {
        Self { table, sink }
    }

    pub fn table(&self) -> &RoutingTable {
        &self.table
    }

    /// Handle one thread event end to end.
    pub async fn notify(&self, event: &ThreadCreatedEvent) -> DeliveryReport {
        let messages = plan(&self.table, event);
        if messages.is_empty() {
            debug!(
                guild = %event.guild_id,
                parent = %event.parent_id,
                thread = %event.thread_id,
                "thread not from a watched channel, ignoring"
            );
            return DeliveryReport::default();
        }

        info!(
            guild = %event.guild_id,
            parent = %event.parent_id,
            thread = %event.thread_id,
            name = %event.name,
            destinations = messages.len(),
            "new thread in watched channel"
        );

        let suppress = self.table.settings().suppress_embeds;
        let mut report = DeliveryReport {
            attempted: messages.len(),
            ..Default::default()
        };

        for msg in &messages {
            let sent = match self.sink.send(msg).await {
                Ok(sent) => sent,
                Err(e) => {
                    error!(channel = %msg.channel_id, error = %e, "could not message channel");
                    report.failed += 1;
                    continue;
                }
            };
            report.sent += 1;
            debug!(
                channel = %sent.channel_id,
                message = %sent.message_id,
                "notification sent"
            );

            if !suppress {
                continue;
            }
            match self.sink.suppress_embeds(&sent).await {
                Ok(()) => report.suppressed += 1,
                Err(e) => {
                    warn!(
                        channel = %sent.channel_id,
                        message = %sent.message_id,
                        error = %e,
                        "could not suppress embeds"
                    );
                    report.failed += 1;
                }
            }
        }

        report
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
